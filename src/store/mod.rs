//! Persistence seam for the attendance logic.
//!
//! The reconciliation rules in `crate::attendance` only ever read and write
//! through [`AttendanceStore`]; production wires in [`SqliteStore`], tests use
//! the in-memory fake.

#[cfg(test)]
pub mod memory;
pub mod sqlite;

pub use sqlite::SqliteStore;

use crate::database::models::{
    AttendanceFilter, AttendanceRecord, AttendanceUpdate, NewOvertime, OvertimeRecord,
    ScheduleEntry,
};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait AttendanceStore: Send + Sync {
    /// Attendance rows matching `filter`, ordered by `clock_in` then `id`.
    async fn query_attendance(&self, filter: &AttendanceFilter) -> Result<Vec<AttendanceRecord>>;

    /// Inserts an `Active` record and returns it with its generated id.
    async fn insert_attendance(&self, user_id: i64, clock_in: DateTime<Utc>) -> Result<AttendanceRecord>;

    async fn update_attendance(&self, id: i64, update: &AttendanceUpdate) -> Result<AttendanceRecord>;

    /// Entries for one worker and one lowercase weekday name, in stored order.
    async fn schedule_entries(&self, staff_id: i64, day_of_week: &str) -> Result<Vec<ScheduleEntry>>;

    async fn insert_overtime(&self, overtime: &NewOvertime) -> Result<OvertimeRecord>;
}
