use crate::database::models::{
    AttendanceFilter, AttendanceRecord, AttendanceStatus, AttendanceUpdate, NewOvertime,
    OvertimeRecord, ScheduleEntry, SortOrder,
};
use crate::store::AttendanceStore;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Mutex;

/// In-memory store for exercising the attendance rules without SQLite.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    next_id: i64,
    attendance: Vec<AttendanceRecord>,
    schedules: Vec<ScheduleEntry>,
    overtime: Vec<OvertimeRecord>,
    writes: usize,
    fail_reads: bool,
    fail_updates: bool,
    fail_overtime: bool,
}

impl Inner {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_schedule(&self, staff_id: i64, day: &str, start: Option<&str>, end: Option<&str>) -> i64 {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.next_id();
        inner.schedules.push(ScheduleEntry {
            id,
            staff_id,
            day_of_week: day.to_string(),
            shift_start: start.map(str::to_string),
            shift_end: end.map(str::to_string),
            department: None,
        });
        id
    }

    /// Seeds an attendance row directly, bypassing the clock-in rules.
    pub fn seed_active(&self, user_id: i64, clock_in: DateTime<Utc>) -> AttendanceRecord {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.next_id();
        let record = AttendanceRecord {
            id,
            user_id,
            clock_in,
            clock_out: None,
            status: AttendanceStatus::Active,
            total_hours: None,
            created_at: clock_in,
            updated_at: clock_in,
        };
        inner.attendance.push(record.clone());
        record
    }

    pub fn attendance(&self) -> Vec<AttendanceRecord> {
        self.inner.lock().unwrap().attendance.clone()
    }

    pub fn record(&self, id: i64) -> Option<AttendanceRecord> {
        self.inner.lock().unwrap().attendance.iter().find(|r| r.id == id).cloned()
    }

    pub fn overtime(&self) -> Vec<OvertimeRecord> {
        self.inner.lock().unwrap().overtime.clone()
    }

    /// Number of successful insert/update calls so far.
    pub fn writes(&self) -> usize {
        self.inner.lock().unwrap().writes
    }

    pub fn fail_reads(&self) {
        self.inner.lock().unwrap().fail_reads = true;
    }

    pub fn fail_updates(&self) {
        self.inner.lock().unwrap().fail_updates = true;
    }

    pub fn fail_overtime(&self) {
        self.inner.lock().unwrap().fail_overtime = true;
    }
}

#[async_trait]
impl AttendanceStore for MemoryStore {
    async fn query_attendance(&self, filter: &AttendanceFilter) -> Result<Vec<AttendanceRecord>> {
        let inner = self.inner.lock().unwrap();
        if inner.fail_reads {
            return Err(anyhow::anyhow!("connection reset"));
        }

        let mut records: Vec<AttendanceRecord> = inner
            .attendance
            .iter()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect();
        records.sort_by(|a, b| a.clock_in.cmp(&b.clock_in).then(a.id.cmp(&b.id)));
        if filter.order == SortOrder::Descending {
            records.reverse();
        }
        Ok(records)
    }

    async fn insert_attendance(&self, user_id: i64, clock_in: DateTime<Utc>) -> Result<AttendanceRecord> {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.next_id();
        let record = AttendanceRecord {
            id,
            user_id,
            clock_in,
            clock_out: None,
            status: AttendanceStatus::Active,
            total_hours: None,
            created_at: clock_in,
            updated_at: clock_in,
        };
        inner.attendance.push(record.clone());
        inner.writes += 1;
        Ok(record)
    }

    async fn update_attendance(&self, id: i64, update: &AttendanceUpdate) -> Result<AttendanceRecord> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_updates {
            return Err(anyhow::anyhow!("update rejected"));
        }

        let record = inner
            .attendance
            .iter_mut()
            .find(|record| record.id == id)
            .ok_or_else(|| anyhow::anyhow!("Attendance record {} not found", id))?;
        record.clock_out = Some(update.clock_out);
        record.status = update.status;
        record.total_hours = Some(update.total_hours);
        record.updated_at = update.clock_out;
        let updated = record.clone();
        inner.writes += 1;
        Ok(updated)
    }

    async fn schedule_entries(&self, staff_id: i64, day_of_week: &str) -> Result<Vec<ScheduleEntry>> {
        let inner = self.inner.lock().unwrap();
        if inner.fail_reads {
            return Err(anyhow::anyhow!("connection reset"));
        }

        Ok(inner
            .schedules
            .iter()
            .filter(|entry| entry.staff_id == staff_id && entry.day_of_week == day_of_week)
            .cloned()
            .collect())
    }

    async fn insert_overtime(&self, overtime: &NewOvertime) -> Result<OvertimeRecord> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_overtime {
            return Err(anyhow::anyhow!("overtime table unavailable"));
        }

        let id = inner.next_id();
        let record = OvertimeRecord {
            id,
            user_id: overtime.user_id,
            attendance_id: overtime.attendance_id,
            start_time: overtime.start_time,
            end_time: overtime.end_time,
            hours: overtime.hours,
            notes: Some(overtime.notes.clone()),
            status: overtime.status,
            created_at: overtime.end_time,
        };
        inner.overtime.push(record.clone());
        inner.writes += 1;
        Ok(record)
    }
}
