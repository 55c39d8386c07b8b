use crate::attendance::AttendanceError;
use crate::attendance::shift_matcher::{ShiftMatch, match_shift};
use crate::database::models::{
    AttendanceFilter, AttendanceRecord, AttendanceStatus, AttendanceUpdate, NewOvertime,
    OvertimeRecord, OvertimeStatus,
};
use crate::store::AttendanceStore;
use crate::utils::time::{LocalCalendar, hours_between};
use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

/// Overtime shorter than this (36 seconds) is not recorded.
pub const OVERTIME_THRESHOLD_HOURS: f64 = 0.01;

pub const OVERTIME_NOTE: &str = "Overtime: clocked out late, pending approval";

#[derive(Debug, Clone)]
pub struct ClockInOutcome {
    pub record: AttendanceRecord,
    /// A session left open on an earlier day that was closed at its scheduled end.
    pub closed_stale: Option<AttendanceRecord>,
}

#[derive(Debug, Clone)]
pub struct ClockOutOutcome {
    pub record: AttendanceRecord,
    /// Present only when the overtime row was actually written.
    pub overtime: Option<OvertimeRecord>,
}

#[derive(Clone)]
pub struct AttendanceService<S> {
    store: S,
    calendar: LocalCalendar,
}

impl<S: AttendanceStore> AttendanceService<S> {
    pub fn new(store: S, calendar: LocalCalendar) -> Self {
        Self { store, calendar }
    }

    #[cfg(test)]
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn calendar(&self) -> &LocalCalendar {
        &self.calendar
    }

    /// Newest active record of the user, if any.
    pub async fn current_status(&self, user_id: i64) -> Result<Option<AttendanceRecord>, AttendanceError> {
        self.latest_active(user_id, "Failed to get current status").await
    }

    pub async fn clock_in(&self, user_id: i64, now: DateTime<Utc>) -> Result<ClockInOutcome, AttendanceError> {
        info!(user_id, "Attempting to clock in");

        let mut closed_stale = None;
        if let Some(active) = self
            .latest_active(user_id, "Failed to check active attendance records")
            .await?
        {
            if self.calendar.same_day(active.clock_in, now) {
                return Err(AttendanceError::AlreadyActiveToday);
            }

            info!(
                user_id,
                record_id = active.id,
                "Found active record from a previous day, closing it at the scheduled end"
            );
            closed_stale = Some(self.close_stale_session(&active).await?);
        }

        let shift = match self.match_shift_at(user_id, now).await {
            Ok(shift) => shift,
            Err(AttendanceError::NoScheduleForDay) => return Err(AttendanceError::NoScheduledShiftToday),
            Err(e) => return Err(e),
        };

        if !shift.is_within() {
            return Err(AttendanceError::OutsideShiftHours);
        }

        let record = self
            .store
            .insert_attendance(user_id, now)
            .await
            .map_err(AttendanceError::store("Failed to clock in"))?;

        info!(user_id, record_id = record.id, schedule_id = shift.entry().id, "Clocked in");
        Ok(ClockInOutcome { record, closed_stale })
    }

    /// Completes an active record from an earlier day at that day's scheduled
    /// shift end. Never books overtime.
    pub async fn close_stale_session(
        &self,
        record: &AttendanceRecord,
    ) -> Result<AttendanceRecord, AttendanceError> {
        let clock_in = record.clock_in;
        let shift = self.match_shift_at(record.user_id, clock_in).await?;
        let scheduled_end =
            clamp_to_clock_in(&shift, shift.scheduled_end(clock_in, &self.calendar)?, clock_in);

        let update = AttendanceUpdate {
            clock_out: scheduled_end,
            status: AttendanceStatus::Completed,
            total_hours: hours_between(clock_in, scheduled_end),
        };

        let closed = self
            .store
            .update_attendance(record.id, &update)
            .await
            .map_err(AttendanceError::store("Failed to auto-clock out previous record"))?;

        info!(
            user_id = record.user_id,
            record_id = record.id,
            total_hours = update.total_hours,
            "Auto-clocked out stale session"
        );
        Ok(closed)
    }

    pub async fn clock_out(&self, user_id: i64, now: DateTime<Utc>) -> Result<ClockOutOutcome, AttendanceError> {
        info!(user_id, "Attempting to clock out");

        let active = self
            .latest_active(user_id, "Failed to find active attendance record")
            .await?
            .ok_or(AttendanceError::NoActiveRecord)?;

        let clock_in = active.clock_in;
        let shift = self.match_shift_at(user_id, clock_in).await?;
        let scheduled_end = shift.scheduled_end(clock_in, &self.calendar)?;

        let clock_out_time = clamp_to_clock_in(&shift, now.min(scheduled_end), clock_in);
        let overtime_hours = if now > scheduled_end {
            hours_between(scheduled_end, now)
        } else {
            0.0
        };

        let update = AttendanceUpdate {
            clock_out: clock_out_time,
            status: AttendanceStatus::Completed,
            total_hours: hours_between(clock_in, clock_out_time),
        };

        let record = self
            .store
            .update_attendance(active.id, &update)
            .await
            .map_err(AttendanceError::store("Failed to clock out"))?;

        info!(
            user_id,
            record_id = record.id,
            total_hours = update.total_hours,
            overtime_hours,
            "Clocked out"
        );

        let overtime = if overtime_hours > OVERTIME_THRESHOLD_HOURS {
            self.record_overtime(&record, scheduled_end, now, overtime_hours).await
        } else {
            None
        };

        Ok(ClockOutOutcome { record, overtime })
    }

    async fn record_overtime(
        &self,
        record: &AttendanceRecord,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        hours: f64,
    ) -> Option<OvertimeRecord> {
        let overtime = NewOvertime {
            user_id: record.user_id,
            attendance_id: record.id,
            start_time,
            end_time,
            hours,
            notes: OVERTIME_NOTE.to_string(),
            status: OvertimeStatus::Pending,
        };

        // The clock-out already stands; a lost overtime row is only logged.
        match self.store.insert_overtime(&overtime).await {
            Ok(created) => Some(created),
            Err(e) => {
                error!(
                    user_id = record.user_id,
                    record_id = record.id,
                    hours,
                    "Failed to create overtime record: {:?}",
                    e
                );
                None
            }
        }
    }

    /// Most recent active record by clock-in. Extra active rows are a data
    /// anomaly and are left for the next operation.
    async fn latest_active(
        &self,
        user_id: i64,
        action: &'static str,
    ) -> Result<Option<AttendanceRecord>, AttendanceError> {
        let mut records = self
            .store
            .query_attendance(&AttendanceFilter::active_for(user_id))
            .await
            .map_err(AttendanceError::store(action))?;

        if records.len() > 1 {
            warn!(
                user_id,
                count = records.len(),
                "Multiple active attendance records, using the most recent"
            );
        }

        Ok(if records.is_empty() {
            None
        } else {
            Some(records.swap_remove(0))
        })
    }

    async fn match_shift_at(
        &self,
        user_id: i64,
        reference: DateTime<Utc>,
    ) -> Result<ShiftMatch, AttendanceError> {
        let day = self.calendar.weekday_name_of(reference);
        let entries = self
            .store
            .schedule_entries(user_id, day)
            .await
            .map_err(AttendanceError::store("Failed to find schedule for user"))?;

        match_shift(&entries, reference, &self.calendar)
    }
}

/// Recorded clock-out for a session, never earlier than its clock-in so hours
/// stay non-negative. Overtime is still measured from the real scheduled end.
fn clamp_to_clock_in(
    shift: &ShiftMatch,
    clock_out: DateTime<Utc>,
    clock_in: DateTime<Utc>,
) -> DateTime<Utc> {
    if clock_out < clock_in {
        warn!(
            schedule_id = shift.entry().id,
            "Scheduled end precedes clock-in, closing at clock-in"
        );
        return clock_in;
    }
    clock_out
}
