use anyhow::Result;
use chrono::{
    DateTime, Datelike, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeDelta,
    TimeZone, Utc, Weekday,
};
use chrono_tz::Tz;

/// Clock that decides which calendar day an instant belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarZone {
    /// The host's local time zone, including its DST rules.
    Host,
    /// An IANA zone such as `Asia/Tokyo`.
    Named(Tz),
    Fixed(FixedOffset),
}

/// Local calendar-day arithmetic.
///
/// Every "which day is this" question (stale-session detection, weekday lookup
/// for the schedule table, anchoring a shift's HH:MM to a concrete instant)
/// goes through here so clock-in, clock-out and auto-closure agree on where a
/// day starts. The UTC offset is looked up per instant, so records from either
/// side of a DST change land on their own local day.
#[derive(Debug, Clone, Copy)]
pub struct LocalCalendar {
    zone: CalendarZone,
}

impl LocalCalendar {
    pub fn new(zone: CalendarZone) -> Self {
        Self { zone }
    }

    pub fn fixed(offset: FixedOffset) -> Self {
        Self::new(CalendarZone::Fixed(offset))
    }

    /// Offset in force at `timestamp`.
    pub fn offset_at(&self, timestamp: DateTime<Utc>) -> FixedOffset {
        let naive = timestamp.naive_utc();
        match self.zone {
            CalendarZone::Host => Local.offset_from_utc_datetime(&naive).fix(),
            CalendarZone::Named(tz) => tz.offset_from_utc_datetime(&naive).fix(),
            CalendarZone::Fixed(offset) => offset,
        }
    }

    pub fn now(&self) -> DateTime<FixedOffset> {
        self.to_local(Utc::now())
    }

    pub fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    pub fn to_local(&self, timestamp: DateTime<Utc>) -> DateTime<FixedOffset> {
        timestamp.with_timezone(&self.offset_at(timestamp))
    }

    /// Local calendar date of a UTC instant.
    pub fn date_of(&self, timestamp: DateTime<Utc>) -> NaiveDate {
        self.to_local(timestamp).date_naive()
    }

    pub fn same_day(&self, a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
        self.date_of(a) == self.date_of(b)
    }

    /// Lowercase weekday name of the local date, as stored in `schedules.day_of_week`.
    pub fn weekday_name_of(&self, timestamp: DateTime<Utc>) -> &'static str {
        weekday_name(self.date_of(timestamp).weekday())
    }

    /// The instant at which the local clock shows `time` on `date`.
    pub fn combine(&self, date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
        let local = date.and_time(time);
        match self.zone {
            CalendarZone::Host => resolve_local(&Local, local),
            CalendarZone::Named(tz) => resolve_local(&tz, local),
            CalendarZone::Fixed(offset) => resolve_local(&offset, local),
        }
    }

    /// `time` on the same local calendar day as `reference`.
    pub fn anchor(&self, reference: DateTime<Utc>, time: NaiveTime) -> DateTime<Utc> {
        self.combine(self.date_of(reference), time)
    }
}

/// A repeated wall-clock time (DST fall-back) resolves to its first
/// occurrence. A skipped one (spring-forward) is read with the offset of the
/// day before, which lands just after the jump.
fn resolve_local<Z: TimeZone>(zone: &Z, local: NaiveDateTime) -> DateTime<Utc> {
    if let Some(resolved) = zone.from_local_datetime(&local).earliest() {
        return resolved.with_timezone(&Utc);
    }

    let before = zone
        .offset_from_utc_datetime(&(local - TimeDelta::days(1)))
        .fix();
    Utc.from_utc_datetime(&(local - TimeDelta::seconds(i64::from(before.local_minus_utc()))))
}

pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

pub fn parse_time_string(time_str: &str) -> Result<NaiveTime> {
    let time_str = time_str.trim();

    if let Ok(time) = NaiveTime::parse_from_str(time_str, "%H:%M") {
        return Ok(time);
    }

    if let Ok(time) = NaiveTime::parse_from_str(time_str, "%H:%M:%S") {
        return Ok(time);
    }

    Err(anyhow::anyhow!("Invalid time format. Use HH:MM or HH:MM:SS"))
}

/// Accepts either 24-hour (`14:15`) or 12-hour (`2:15 PM`) input.
pub fn parse_flexible_time(time_str: &str) -> Result<NaiveTime> {
    parse_time_string(time_str).or_else(|_| parse_twelve_hour(time_str))
}

fn parse_twelve_hour(time_str: &str) -> Result<NaiveTime> {
    let upper = time_str.trim().to_ascii_uppercase();
    let (clock, is_pm) = if let Some(rest) = upper.strip_suffix("PM") {
        (rest.trim_end(), true)
    } else if let Some(rest) = upper.strip_suffix("AM") {
        (rest.trim_end(), false)
    } else {
        return Err(anyhow::anyhow!("Invalid 12-hour time: {}", time_str));
    };

    let (hours, minutes) = clock
        .split_once(':')
        .ok_or_else(|| anyhow::anyhow!("Invalid 12-hour time: {}", time_str))?;
    let hours: u32 = hours.parse()?;
    let minutes: u32 = minutes.parse()?;

    if !(1..=12).contains(&hours) || minutes > 59 || clock.len() > 5 {
        return Err(anyhow::anyhow!("Invalid 12-hour time: {}", time_str));
    }

    let hours = match (hours, is_pm) {
        (12, false) => 0,
        (12, true) => 12,
        (h, true) => h + 12,
        (h, false) => h,
    };

    NaiveTime::from_hms_opt(hours, minutes, 0)
        .ok_or_else(|| anyhow::anyhow!("Invalid 12-hour time: {}", time_str))
}

/// Rewrites a stored shift time as `HH:MM`. Returns `None` when the value is
/// already canonical or cannot be understood.
pub fn convert_to_24_hour(time_str: &str) -> Option<String> {
    let time = parse_flexible_time(time_str).ok()?;
    let canonical = time.format("%H:%M").to_string();
    if canonical == time_str.trim() {
        None
    } else {
        Some(canonical)
    }
}

/// Elapsed hours as a float, from whole milliseconds. No rounding.
pub fn hours_between(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    end.signed_duration_since(start).num_milliseconds() as f64 / 3_600_000.0
}

pub fn format_hours(hours: f64) -> String {
    let whole = hours.floor();
    let mut h = whole as i64;
    let mut m = ((hours - whole) * 60.0).round() as i64;
    if m == 60 {
        h += 1;
        m = 0;
    }
    format!("{} hr {} min", h, m)
}

pub fn format_time_local(calendar: &LocalCalendar, datetime: DateTime<Utc>) -> String {
    calendar.to_local(datetime).format("%H:%M").to_string()
}

pub fn format_datetime_local(calendar: &LocalCalendar, datetime: DateTime<Utc>) -> String {
    calendar
        .to_local(datetime)
        .format("%Y-%m-%d %H:%M:%S %:z")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jst() -> LocalCalendar {
        LocalCalendar::fixed(FixedOffset::east_opt(9 * 3600).unwrap())
    }

    fn new_york() -> LocalCalendar {
        LocalCalendar::new(CalendarZone::Named(chrono_tz::America::New_York))
    }

    fn utc(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn local_date_crosses_utc_midnight() {
        let calendar = jst();
        // 2024-01-07 15:30 UTC is already Monday in Tokyo.
        let ts = utc("2024-01-07T15:30:00Z");
        assert_eq!(calendar.date_of(ts), NaiveDate::from_ymd_opt(2024, 1, 8).unwrap());
        assert_eq!(calendar.weekday_name_of(ts), "monday");
        assert!(!calendar.same_day(ts, utc("2024-01-07T14:59:00Z")));
    }

    #[test]
    fn anchor_uses_local_date() {
        let calendar = jst();
        let reference = utc("2024-01-07T15:30:00Z");
        let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        assert_eq!(calendar.anchor(reference, nine), utc("2024-01-08T00:00:00Z"));
    }

    #[test]
    fn each_dst_season_uses_its_own_offset() {
        let calendar = new_york();

        // Monday 23:30 EST and Sunday 23:30 EDT.
        let winter = utc("2026-01-06T04:30:00Z");
        let summer = utc("2026-07-06T03:30:00Z");
        assert_eq!(calendar.date_of(winter), NaiveDate::from_ymd_opt(2026, 1, 5).unwrap());
        assert_eq!(calendar.weekday_name_of(winter), "monday");
        assert_eq!(calendar.date_of(summer), NaiveDate::from_ymd_opt(2026, 7, 5).unwrap());
        assert_eq!(calendar.offset_at(winter).local_minus_utc(), -5 * 3600);
        assert_eq!(calendar.offset_at(summer).local_minus_utc(), -4 * 3600);

        let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        assert_eq!(calendar.anchor(winter, nine), utc("2026-01-05T14:00:00Z"));
        assert_eq!(calendar.anchor(summer, nine), utc("2026-07-05T13:00:00Z"));
    }

    #[test]
    fn dst_gaps_and_repeats_resolve() {
        let calendar = new_york();

        // 02:30 does not exist on 2026-03-08; it reads as 03:30 EDT.
        let skipped = calendar.combine(
            NaiveDate::from_ymd_opt(2026, 3, 8).unwrap(),
            NaiveTime::from_hms_opt(2, 30, 0).unwrap(),
        );
        assert_eq!(skipped, utc("2026-03-08T07:30:00Z"));

        // 01:30 happens twice on 2026-11-01; the EDT one comes first.
        let repeated = calendar.combine(
            NaiveDate::from_ymd_opt(2026, 11, 1).unwrap(),
            NaiveTime::from_hms_opt(1, 30, 0).unwrap(),
        );
        assert_eq!(repeated, utc("2026-11-01T05:30:00Z"));
    }

    #[test]
    fn host_zone_follows_the_host_clock_per_instant() {
        let calendar = LocalCalendar::new(CalendarZone::Host);

        for ts in [utc("2026-01-06T04:30:00Z"), utc("2026-07-06T03:30:00Z")] {
            assert_eq!(calendar.date_of(ts), ts.with_timezone(&Local).date_naive());
            assert_eq!(
                calendar.offset_at(ts).local_minus_utc(),
                ts.with_timezone(&Local).offset().local_minus_utc()
            );
        }
    }

    #[test]
    fn parses_24_hour_forms() {
        assert_eq!(parse_time_string("09:05").unwrap(), NaiveTime::from_hms_opt(9, 5, 0).unwrap());
        assert_eq!(parse_time_string("17:00:30").unwrap(), NaiveTime::from_hms_opt(17, 0, 30).unwrap());
        assert!(parse_time_string("25:00").is_err());
        assert!(parse_time_string("").is_err());
        assert!(parse_time_string("9:30 AM").is_err());
    }

    #[test]
    fn parses_12_hour_forms() {
        assert_eq!(parse_flexible_time("9:30 AM").unwrap(), NaiveTime::from_hms_opt(9, 30, 0).unwrap());
        assert_eq!(parse_flexible_time("2:15 pm").unwrap(), NaiveTime::from_hms_opt(14, 15, 0).unwrap());
        assert_eq!(parse_flexible_time("12:00 AM").unwrap(), NaiveTime::from_hms_opt(0, 0, 0).unwrap());
        assert_eq!(parse_flexible_time("12:45 PM").unwrap(), NaiveTime::from_hms_opt(12, 45, 0).unwrap());
        assert!(parse_flexible_time("13:00 PM").is_err());
        assert!(parse_flexible_time("--:-- --").is_err());
    }

    #[test]
    fn converts_only_when_needed() {
        assert_eq!(convert_to_24_hour("2:15 PM").as_deref(), Some("14:15"));
        assert_eq!(convert_to_24_hour("09:00:00").as_deref(), Some("09:00"));
        assert_eq!(convert_to_24_hour("09:00"), None);
        assert_eq!(convert_to_24_hour("whenever"), None);
    }

    #[test]
    fn hours_are_exact_milliseconds() {
        let start = utc("2024-01-01T09:05:00Z");
        let end = utc("2024-01-01T17:30:00Z");
        let hours = hours_between(start, end);
        assert!((hours - 8.0 - 25.0 / 60.0).abs() < 1e-12);
        assert_eq!(hours_between(end, end), 0.0);
    }

    #[test]
    fn formats_hours_for_display() {
        assert_eq!(format_hours(8.4167), "8 hr 25 min");
        assert_eq!(format_hours(0.5), "0 hr 30 min");
        assert_eq!(format_hours(1.9999), "2 hr 0 min");
    }
}
