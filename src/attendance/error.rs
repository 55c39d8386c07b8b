use thiserror::Error;

/// Why a clock-in or clock-out was refused. `Display` is the message shown to
/// the staff member as-is.
#[derive(Debug, Error)]
pub enum AttendanceError {
    #[error("You already have an active attendance record for today. Please clock out first.")]
    AlreadyActiveToday,

    #[error("You have no scheduled shift today.")]
    NoScheduledShiftToday,

    #[error("No schedule found for user on this day")]
    NoScheduleForDay,

    #[error("You are not allowed to clock in outside your scheduled shift hours.")]
    OutsideShiftHours,

    #[error("No active attendance record found")]
    NoActiveRecord,

    #[error("Invalid shift_end in schedule.")]
    InvalidScheduleShiftEnd,

    #[error("{action}")]
    Store {
        action: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl AttendanceError {
    pub fn store(action: &'static str) -> impl FnOnce(anyhow::Error) -> Self {
        move |source| AttendanceError::Store { action, source }
    }

    /// Failures the user can fix by waiting or asking an admin, as opposed to
    /// backend trouble.
    pub fn is_user_error(&self) -> bool {
        !matches!(self, AttendanceError::Store { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn store_failure_keeps_its_cause() {
        let err = AttendanceError::store("Failed to clock in")(anyhow::anyhow!("disk full"));

        assert_eq!(err.to_string(), "Failed to clock in");
        assert_eq!(err.source().unwrap().to_string(), "disk full");
        assert!(!err.is_user_error());
        assert!(AttendanceError::OutsideShiftHours.is_user_error());
    }
}
