use crate::utils::time::parse_flexible_time;
use anyhow::Result;
use chrono::{DateTime, NaiveTime, Utc};

pub fn validate_time_format(time_str: &str) -> Result<NaiveTime> {
    parse_flexible_time(time_str)
        .map_err(|_| anyhow::anyhow!("Invalid time '{}'. Use HH:MM or h:MM AM/PM", time_str.trim()))
}

pub fn validate_time_order(start_time: NaiveTime, end_time: NaiveTime) -> Result<()> {
    if end_time <= start_time {
        return Err(anyhow::anyhow!(
            "Shift end must be after shift start (shifts past midnight are not supported)"
        ));
    }
    Ok(())
}

pub fn validate_reasonable_shift_length(start_time: NaiveTime, end_time: NaiveTime) -> Result<()> {
    let hours = end_time.signed_duration_since(start_time).num_hours();

    if hours > 16 {
        return Err(anyhow::anyhow!(
            "A shift longer than 16 hours is not allowed"
        ));
    }

    Ok(())
}

/// Parses and checks a shift, returning both bounds as canonical `HH:MM`.
pub fn validate_shift(start: &str, end: &str) -> Result<(String, String)> {
    let start_time = validate_time_format(start)?;
    let end_time = validate_time_format(end)?;
    validate_time_order(start_time, end_time)?;
    validate_reasonable_shift_length(start_time, end_time)?;

    Ok((
        start_time.format("%H:%M").to_string(),
        end_time.format("%H:%M").to_string(),
    ))
}

/// A manual clock-out correction must fall after the clock-in and not in the future.
pub fn validate_corrected_clock_out(
    clock_in: DateTime<Utc>,
    clock_out: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<()> {
    if clock_out < clock_in {
        return Err(anyhow::anyhow!("Clock-out cannot be earlier than clock-in"));
    }

    if clock_out > now {
        return Err(anyhow::anyhow!("Clock-out cannot be in the future"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_is_normalised_to_24_hour() {
        let (start, end) = validate_shift("9:00 AM", "5:30 PM").unwrap();
        assert_eq!(start, "09:00");
        assert_eq!(end, "17:30");
    }

    #[test]
    fn shift_must_end_after_it_starts() {
        assert!(validate_shift("17:00", "09:00").is_err());
        assert!(validate_shift("09:00", "09:00").is_err());
        assert!(validate_shift("22:00", "02:00").is_err());
    }

    #[test]
    fn overly_long_shift_is_rejected() {
        assert!(validate_shift("05:00", "23:00").is_err());
        assert!(validate_shift("06:00", "22:00").is_ok());
    }

    #[test]
    fn garbage_time_is_rejected() {
        let err = validate_shift("noon", "17:00").unwrap_err();
        assert!(err.to_string().contains("noon"));
    }

    #[test]
    fn corrected_clock_out_bounds() {
        let clock_in: DateTime<Utc> = "2024-01-08T09:00:00Z".parse().unwrap();
        let now: DateTime<Utc> = "2024-01-08T20:00:00Z".parse().unwrap();

        assert!(validate_corrected_clock_out(clock_in, "2024-01-08T17:00:00Z".parse().unwrap(), now).is_ok());
        assert!(validate_corrected_clock_out(clock_in, "2024-01-08T08:00:00Z".parse().unwrap(), now).is_err());
        assert!(validate_corrected_clock_out(clock_in, "2024-01-08T21:00:00Z".parse().unwrap(), now).is_err());
    }
}
