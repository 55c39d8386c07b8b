use crate::utils::time::CalendarZone;
use anyhow::Result;
use chrono::FixedOffset;
use chrono_tz::Tz;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    pub database_url: String,
    pub admin_role_id: Option<u64>,
    /// Zone used to decide which calendar day a timestamp belongs to.
    pub timezone: CalendarZone,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let discord_token = env::var("DISCORD_TOKEN")
            .map_err(|_| anyhow::anyhow!("DISCORD_TOKEN environment variable is required"))?;

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:attendance.db".to_string());

        let admin_role_id = env::var("ADMIN_ROLE_ID")
            .ok()
            .map(|raw| parse_admin_role_id(&raw))
            .transpose()?;

        let timezone = calendar_zone(
            env::var("TIMEZONE").ok().as_deref(),
            env::var("UTC_OFFSET").ok().as_deref(),
        )?;

        Ok(Config {
            discord_token,
            database_url,
            admin_role_id,
            timezone,
        })
    }
}

/// `TIMEZONE` wins over `UTC_OFFSET`. With neither set the host's zone is used.
fn calendar_zone(timezone: Option<&str>, utc_offset: Option<&str>) -> Result<CalendarZone> {
    match (timezone, utc_offset) {
        (Some(name), _) => parse_timezone(name).map(CalendarZone::Named),
        (None, Some(offset)) => parse_utc_offset(offset).map(CalendarZone::Fixed),
        (None, None) => Ok(CalendarZone::Host),
    }
}

fn parse_timezone(raw: &str) -> Result<Tz> {
    raw.trim()
        .parse::<Tz>()
        .map_err(|e| anyhow::anyhow!("TIMEZONE must be an IANA zone like Asia/Tokyo ({}): {}", raw, e))
}

fn parse_utc_offset(raw: &str) -> Result<FixedOffset> {
    raw.trim()
        .parse::<FixedOffset>()
        .map_err(|e| anyhow::anyhow!("UTC_OFFSET must look like +09:00 or -05:00 ({}): {}", raw, e))
}

fn parse_admin_role_id(raw: &str) -> Result<u64> {
    raw.trim()
        .parse::<u64>()
        .map_err(|e| anyhow::anyhow!("ADMIN_ROLE_ID must be a numeric Discord role id ({}): {}", raw, e))
}
