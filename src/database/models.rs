use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub discord_id: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Active,
    Completed,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Active => "active",
            AttendanceStatus::Completed => "completed",
        }
    }
}

impl FromStr for AttendanceStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(AttendanceStatus::Active),
            "completed" => Ok(AttendanceStatus::Completed),
            _ => Err(anyhow::anyhow!("Invalid attendance status: {}", s)),
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: i64,
    pub user_id: i64,
    pub clock_in: DateTime<Utc>,
    pub clock_out: Option<DateTime<Utc>>,
    pub status: AttendanceStatus,
    pub total_hours: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AttendanceRecord {
    pub fn is_active(&self) -> bool {
        self.status == AttendanceStatus::Active
    }
}

/// Fields written when a session is closed or corrected.
#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceUpdate {
    pub clock_out: DateTime<Utc>,
    pub status: AttendanceStatus,
    pub total_hours: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

/// Attendance query; every `None` means "don't filter on this".
/// Results are ordered by `clock_in` and then `id` in `order`.
#[derive(Debug, Clone, Default)]
pub struct AttendanceFilter {
    pub user_id: Option<i64>,
    pub status: Option<AttendanceStatus>,
    pub clock_in_from: Option<DateTime<Utc>>,
    pub clock_in_before: Option<DateTime<Utc>>,
    pub order: SortOrder,
}

impl AttendanceFilter {
    /// Active sessions of one user, newest clock-in first.
    pub fn active_for(user_id: i64) -> Self {
        Self {
            user_id: Some(user_id),
            status: Some(AttendanceStatus::Active),
            order: SortOrder::Descending,
            ..Default::default()
        }
    }

    pub fn matches(&self, record: &AttendanceRecord) -> bool {
        self.user_id.is_none_or(|id| record.user_id == id)
            && self.status.is_none_or(|status| record.status == status)
            && self.clock_in_from.is_none_or(|from| record.clock_in >= from)
            && self.clock_in_before.is_none_or(|before| record.clock_in < before)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub id: i64,
    pub staff_id: i64,
    pub day_of_week: String,
    pub shift_start: Option<String>,
    pub shift_end: Option<String>,
    pub department: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewScheduleEntry {
    pub staff_id: i64,
    pub day_of_week: String,
    pub shift_start: String,
    pub shift_end: String,
    pub department: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OvertimeStatus {
    Pending,
    Approved,
    Rejected,
}

impl OvertimeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OvertimeStatus::Pending => "pending",
            OvertimeStatus::Approved => "approved",
            OvertimeStatus::Rejected => "rejected",
        }
    }
}

impl FromStr for OvertimeStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OvertimeStatus::Pending),
            "approved" => Ok(OvertimeStatus::Approved),
            "rejected" => Ok(OvertimeStatus::Rejected),
            _ => Err(anyhow::anyhow!("Invalid overtime status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OvertimeRecord {
    pub id: i64,
    pub user_id: i64,
    pub attendance_id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub hours: f64,
    pub notes: Option<String>,
    pub status: OvertimeStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewOvertime {
    pub user_id: i64,
    pub attendance_id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub hours: f64,
    pub notes: String,
    pub status: OvertimeStatus,
}
