use crate::database::models::{
    AttendanceFilter, AttendanceRecord, AttendanceUpdate, NewOvertime, OvertimeRecord,
    ScheduleEntry,
};
use crate::database::queries;
use crate::store::AttendanceStore;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AttendanceStore for SqliteStore {
    async fn query_attendance(&self, filter: &AttendanceFilter) -> Result<Vec<AttendanceRecord>> {
        queries::query_attendance(&self.pool, filter).await
    }

    async fn insert_attendance(&self, user_id: i64, clock_in: DateTime<Utc>) -> Result<AttendanceRecord> {
        queries::create_attendance(&self.pool, user_id, clock_in).await
    }

    async fn update_attendance(&self, id: i64, update: &AttendanceUpdate) -> Result<AttendanceRecord> {
        queries::update_attendance(&self.pool, id, update).await
    }

    async fn schedule_entries(&self, staff_id: i64, day_of_week: &str) -> Result<Vec<ScheduleEntry>> {
        queries::get_schedules_for_day(&self.pool, staff_id, day_of_week).await
    }

    async fn insert_overtime(&self, overtime: &NewOvertime) -> Result<OvertimeRecord> {
        queries::create_overtime(&self.pool, overtime).await
    }
}
