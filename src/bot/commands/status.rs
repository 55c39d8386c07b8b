use crate::bot::commands::{resolve_author, send_error};
use crate::bot::{Context, Error};
use crate::database::models::{AttendanceFilter, SortOrder};
use crate::database::queries;
use crate::utils::format::{create_status_embed, format_attendance_status};
use chrono::{NaiveTime, TimeDelta};

/// Show whether you are clocked in and today's sessions
#[poise::command(slash_command)]
pub async fn status(ctx: Context<'_>) -> Result<(), Error> {
    let Some(user) = resolve_author(ctx).await? else {
        return Ok(());
    };
    let data = ctx.data();
    let calendar = data.calendar();
    let now = chrono::Utc::now();

    let active = match data.attendance.current_status(user.id).await {
        Ok(active) => active,
        Err(e) => {
            tracing::error!(user_id = user.id, "Status lookup failed: {:?}", e);
            send_error(ctx, &e.to_string()).await?;
            return Ok(());
        }
    };

    let start_of_day = calendar.anchor(now, NaiveTime::MIN);
    let filter = AttendanceFilter {
        user_id: Some(user.id),
        clock_in_from: Some(start_of_day),
        clock_in_before: Some(start_of_day + TimeDelta::days(1)),
        order: SortOrder::Ascending,
        ..Default::default()
    };

    match queries::query_attendance(&data.pool, &filter).await {
        Ok(today) => {
            let text = format_attendance_status(calendar, active.as_ref(), &today, now);
            let embed = create_status_embed(&user.username, calendar.date_of(now), text);
            ctx.send(poise::CreateReply::default().embed(embed)).await?;
        }
        Err(e) => {
            tracing::error!(user_id = user.id, "Failed to load today's records: {:?}", e);
            send_error(ctx, "Failed to get attendance history").await?;
        }
    }

    Ok(())
}
