use crate::bot::commands::{resolve_author, send_error};
use crate::bot::{Context, Error};
use crate::database::models::{AttendanceFilter, SortOrder};
use crate::database::queries;
use crate::utils::format::{create_report_embed, format_attendance_history};
use crate::utils::time::LocalCalendar;
use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, poise::ChoiceParameter)]
pub enum Period {
    #[name = "Today"]
    Today,
    #[name = "This week"]
    Week,
    #[name = "This month"]
    Month,
}

impl Period {
    fn title(&self) -> &'static str {
        match self {
            Period::Today => "Daily report",
            Period::Week => "Weekly report",
            Period::Month => "Monthly report",
        }
    }

    /// First and last local dates covered, ending today.
    fn dates(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        let start = match self {
            Period::Today => today,
            Period::Week => {
                let days_since_monday = today.weekday().num_days_from_monday() as u64;
                today
                    .checked_sub_days(Days::new(days_since_monday))
                    .unwrap_or(today)
            }
            Period::Month => today.with_day(1).unwrap_or(today),
        };
        (start, today)
    }
}

/// Clock-in range `[from, before)` for the local dates `start..=end`.
fn clock_in_range(
    calendar: &LocalCalendar,
    start: NaiveDate,
    end: NaiveDate,
) -> (DateTime<Utc>, DateTime<Utc>) {
    let after_end = end.checked_add_days(Days::new(1)).unwrap_or(end);
    (
        calendar.combine(start, NaiveTime::MIN),
        calendar.combine(after_end, NaiveTime::MIN),
    )
}

/// Show your attendance history and total hours
#[poise::command(slash_command)]
pub async fn history(
    ctx: Context<'_>,
    #[description = "Period to report"] period: Option<Period>,
) -> Result<(), Error> {
    let Some(user) = resolve_author(ctx).await? else {
        return Ok(());
    };
    let data = ctx.data();
    let calendar = data.calendar();
    let period = period.unwrap_or(Period::Week);

    let (start, end) = period.dates(calendar.today());
    let (from, before) = clock_in_range(calendar, start, end);
    let filter = AttendanceFilter {
        user_id: Some(user.id),
        clock_in_from: Some(from),
        clock_in_before: Some(before),
        order: SortOrder::Ascending,
        ..Default::default()
    };

    match queries::query_attendance(&data.pool, &filter).await {
        Ok(records) => {
            let date_range = if start == end {
                start.format("%Y-%m-%d").to_string()
            } else {
                format!("{} ~ {}", start.format("%Y-%m-%d"), end.format("%Y-%m-%d"))
            };
            let text = format_attendance_history(calendar, &records);
            let embed = create_report_embed(&user.username, period.title(), &date_range, text);

            ctx.send(poise::CreateReply::default().embed(embed)).await?;
        }
        Err(e) => {
            tracing::error!(user_id = user.id, "Get attendance history error: {:?}", e);
            send_error(ctx, "Failed to get attendance history").await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn week_starts_on_monday() {
        // 2024-01-10 is a Wednesday.
        assert_eq!(Period::Week.dates(date(2024, 1, 10)), (date(2024, 1, 8), date(2024, 1, 10)));
        assert_eq!(Period::Week.dates(date(2024, 1, 8)), (date(2024, 1, 8), date(2024, 1, 8)));
    }

    #[test]
    fn month_starts_on_the_first() {
        assert_eq!(Period::Month.dates(date(2024, 2, 29)), (date(2024, 2, 1), date(2024, 2, 29)));
        assert_eq!(Period::Today.dates(date(2024, 2, 29)), (date(2024, 2, 29), date(2024, 2, 29)));
    }

    #[test]
    fn range_covers_whole_local_days() {
        let tokyo = LocalCalendar::fixed(FixedOffset::east_opt(9 * 3600).unwrap());
        let (from, before) = clock_in_range(&tokyo, date(2024, 1, 8), date(2024, 1, 8));

        assert_eq!(from, "2024-01-07T15:00:00Z".parse::<DateTime<Utc>>().unwrap());
        assert_eq!(before, "2024-01-08T15:00:00Z".parse::<DateTime<Utc>>().unwrap());
    }
}
