use crate::attendance::AttendanceError;
use crate::database::models::ScheduleEntry;
use crate::utils::time::{LocalCalendar, parse_time_string};
use chrono::{DateTime, NaiveTime, Timelike, Utc};

/// A schedule entry's bounds pinned to one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ShiftWindow {
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ShiftMatch {
    /// `entry` has a window that contains the reference time.
    Within { entry: ScheduleEntry, window: ShiftWindow },
    /// Nothing contains the reference time; first entry of the day as best guess.
    Fallback { entry: ScheduleEntry },
}

impl ShiftMatch {
    pub fn entry(&self) -> &ScheduleEntry {
        match self {
            ShiftMatch::Within { entry, .. } | ShiftMatch::Fallback { entry } => entry,
        }
    }

    pub fn is_within(&self) -> bool {
        matches!(self, ShiftMatch::Within { .. })
    }

    /// End of the matched shift on `reference`'s local calendar day.
    pub fn scheduled_end(
        &self,
        reference: DateTime<Utc>,
        calendar: &LocalCalendar,
    ) -> Result<DateTime<Utc>, AttendanceError> {
        match self {
            ShiftMatch::Within { window, .. } => Ok(window.end),
            ShiftMatch::Fallback { entry } => {
                let end = entry
                    .shift_end
                    .as_deref()
                    .and_then(shift_time)
                    .ok_or_else(|| {
                        tracing::error!(
                            schedule_id = entry.id,
                            shift_end = ?entry.shift_end,
                            "Fallback schedule has invalid shift_end"
                        );
                        AttendanceError::InvalidScheduleShiftEnd
                    })?;
                Ok(calendar.anchor(reference, end))
            }
        }
    }
}

/// Pins an entry's start and end to `reference`'s local day. `None` when either
/// bound is missing or unparseable.
pub fn shift_window(
    entry: &ScheduleEntry,
    reference: DateTime<Utc>,
    calendar: &LocalCalendar,
) -> Option<ShiftWindow> {
    let start = shift_time(entry.shift_start.as_deref()?)?;
    let end = shift_time(entry.shift_end.as_deref()?)?;

    // Both bounds share one date, so a shift like 22:00-02:00 never matches.
    Some(ShiftWindow {
        start: calendar.anchor(reference, start),
        end: calendar.anchor(reference, end),
    })
}

/// Stored shift bound as hour and minute of day. Seconds are dropped.
fn shift_time(raw: &str) -> Option<NaiveTime> {
    parse_time_string(raw).ok()?.with_second(0)
}

/// Picks the schedule entry covering `reference` from the entries of
/// `reference`'s weekday, in stored order.
pub fn match_shift(
    entries: &[ScheduleEntry],
    reference: DateTime<Utc>,
    calendar: &LocalCalendar,
) -> Result<ShiftMatch, AttendanceError> {
    let mut usable = 0usize;

    for entry in entries {
        let Some(window) = shift_window(entry, reference, calendar) else {
            tracing::warn!(
                schedule_id = entry.id,
                shift_start = ?entry.shift_start,
                shift_end = ?entry.shift_end,
                "Skipping schedule entry with invalid shift times"
            );
            continue;
        };
        usable += 1;

        if window.contains(reference) {
            return Ok(ShiftMatch::Within {
                entry: entry.clone(),
                window,
            });
        }
    }

    match entries.first() {
        Some(first) if usable > 0 => Ok(ShiftMatch::Fallback {
            entry: first.clone(),
        }),
        _ => Err(AttendanceError::NoScheduleForDay),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn calendar() -> LocalCalendar {
        LocalCalendar::fixed(FixedOffset::east_opt(0).unwrap())
    }

    fn utc(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    fn entry(id: i64, start: Option<&str>, end: Option<&str>) -> ScheduleEntry {
        ScheduleEntry {
            id,
            staff_id: 7,
            day_of_week: "monday".to_string(),
            shift_start: start.map(str::to_string),
            shift_end: end.map(str::to_string),
            department: None,
        }
    }

    #[test]
    fn seconds_in_stored_bounds_are_ignored() {
        let entries = [entry(1, Some("09:00:45"), Some("17:00:30"))];

        let at_end = match_shift(&entries, utc("2024-01-08T17:00:00Z"), &calendar()).unwrap();
        assert!(at_end.is_within());
        assert_eq!(
            at_end.scheduled_end(utc("2024-01-08T09:00:00Z"), &calendar()).unwrap(),
            utc("2024-01-08T17:00:00Z")
        );

        let after_end = match_shift(&entries, utc("2024-01-08T17:00:15Z"), &calendar()).unwrap();
        assert!(!after_end.is_within());
        assert_eq!(
            after_end.scheduled_end(utc("2024-01-08T09:00:00Z"), &calendar()).unwrap(),
            utc("2024-01-08T17:00:00Z")
        );
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let entries = [entry(1, Some("09:00"), Some("17:00"))];

        for at in ["2024-01-01T09:00:00Z", "2024-01-01T17:00:00Z", "2024-01-01T12:34:56Z"] {
            let matched = match_shift(&entries, utc(at), &calendar()).unwrap();
            assert!(matched.is_within(), "{} should be inside the shift", at);
        }
    }

    #[test]
    fn split_shift_picks_the_covering_entry() {
        let entries = [
            entry(1, Some("08:00"), Some("12:00")),
            entry(2, Some("16:00"), Some("20:00")),
        ];

        let matched = match_shift(&entries, utc("2024-01-01T17:15:00Z"), &calendar()).unwrap();

        assert_eq!(matched.entry().id, 2);
        match matched {
            ShiftMatch::Within { window, .. } => {
                assert_eq!(window.start, utc("2024-01-01T16:00:00Z"));
                assert_eq!(window.end, utc("2024-01-01T20:00:00Z"));
            }
            other => panic!("expected a window match, got {:?}", other),
        }
    }

    #[test]
    fn first_match_in_stored_order_wins() {
        let entries = [
            entry(1, Some("10:00"), Some("14:00")),
            entry(2, Some("09:00"), Some("17:00")),
        ];

        let matched = match_shift(&entries, utc("2024-01-01T11:00:00Z"), &calendar()).unwrap();
        assert_eq!(matched.entry().id, 1);
    }

    #[test]
    fn outside_every_window_falls_back_to_first_entry() {
        let entries = [
            entry(1, Some("08:00"), Some("12:00")),
            entry(2, Some("16:00"), Some("20:00")),
        ];

        let reference = utc("2024-01-01T13:00:00Z");
        let matched = match_shift(&entries, reference, &calendar()).unwrap();

        assert_eq!(matched, ShiftMatch::Fallback { entry: entries[0].clone() });
        assert_eq!(
            matched.scheduled_end(reference, &calendar()).unwrap(),
            utc("2024-01-01T12:00:00Z")
        );
    }

    #[test]
    fn no_entries_means_no_schedule() {
        let err = match_shift(&[], utc("2024-01-01T09:00:00Z"), &calendar()).unwrap_err();
        assert!(matches!(err, AttendanceError::NoScheduleForDay));
    }

    #[test]
    fn all_entries_unusable_means_no_schedule() {
        let entries = [
            entry(1, None, Some("17:00")),
            entry(2, Some("9:00 AM"), Some("5:00 PM")),
        ];

        let err = match_shift(&entries, utc("2024-01-01T10:00:00Z"), &calendar()).unwrap_err();
        assert!(matches!(err, AttendanceError::NoScheduleForDay));
    }

    #[test]
    fn invalid_entries_are_skipped() {
        let entries = [
            entry(1, Some("nonsense"), Some("17:00")),
            entry(2, Some("09:00"), Some("17:00")),
        ];

        let matched = match_shift(&entries, utc("2024-01-01T10:00:00Z"), &calendar()).unwrap();
        assert_eq!(matched.entry().id, 2);
        assert!(matched.is_within());
    }

    #[test]
    fn fallback_with_broken_end_cannot_produce_an_end() {
        let entries = [
            entry(1, Some("08:00"), None),
            entry(2, Some("18:00"), Some("20:00")),
        ];

        let reference = utc("2024-01-01T10:00:00Z");
        let matched = match_shift(&entries, reference, &calendar()).unwrap();

        let err = matched.scheduled_end(reference, &calendar()).unwrap_err();
        assert!(matches!(err, AttendanceError::InvalidScheduleShiftEnd));
    }

    #[test]
    fn overnight_shift_never_contains_late_evening() {
        let entries = [entry(1, Some("22:00"), Some("02:00"))];

        let matched = match_shift(&entries, utc("2024-01-01T23:00:00Z"), &calendar()).unwrap();
        assert!(!matched.is_within());
    }

    #[test]
    fn windows_follow_the_local_day() {
        let tokyo = LocalCalendar::fixed(FixedOffset::east_opt(9 * 3600).unwrap());
        let entries = [entry(1, Some("09:00"), Some("17:00"))];

        // 00:30 UTC is 09:30 in Tokyo.
        let matched = match_shift(&entries, utc("2024-01-01T00:30:00Z"), &tokyo).unwrap();
        match matched {
            ShiftMatch::Within { window, .. } => {
                assert_eq!(window.start, utc("2024-01-01T00:00:00Z"));
                assert_eq!(window.end, utc("2024-01-01T08:00:00Z"));
            }
            other => panic!("expected a window match, got {:?}", other),
        }
    }
}
