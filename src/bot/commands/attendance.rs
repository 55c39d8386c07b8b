use crate::bot::commands::{resolve_author, send_error};
use crate::bot::{Context, Error};
use crate::utils::format::format_success_message;
use crate::utils::time::{format_datetime_local, format_hours, format_time_local};

/// Clock in for your scheduled shift
#[poise::command(slash_command)]
pub async fn clock_in(ctx: Context<'_>) -> Result<(), Error> {
    let Some(user) = resolve_author(ctx).await? else {
        return Ok(());
    };
    let data = ctx.data();
    let calendar = data.calendar();

    match data.attendance.clock_in(user.id, chrono::Utc::now()).await {
        Ok(outcome) => {
            let mut msg = format!(
                "Clocked in at {}",
                format_time_local(calendar, outcome.record.clock_in)
            );
            if let Some(closed) = outcome.closed_stale {
                if let Some(clock_out) = closed.clock_out {
                    msg.push_str(&format!(
                        "\nYour open session from {} was closed at its scheduled end ({}).",
                        format_datetime_local(calendar, closed.clock_in),
                        format_time_local(calendar, clock_out)
                    ));
                }
            }
            ctx.say(format_success_message(&msg)).await?;
        }
        Err(e) => {
            if !e.is_user_error() {
                tracing::error!(user_id = user.id, "Clock in failed: {:?}", e);
            }
            send_error(ctx, &e.to_string()).await?;
        }
    }

    Ok(())
}

/// Clock out of your current session
#[poise::command(slash_command)]
pub async fn clock_out(ctx: Context<'_>) -> Result<(), Error> {
    let Some(user) = resolve_author(ctx).await? else {
        return Ok(());
    };
    let data = ctx.data();
    let calendar = data.calendar();

    match data.attendance.clock_out(user.id, chrono::Utc::now()).await {
        Ok(outcome) => {
            let record = outcome.record;
            let mut msg = format!(
                "Clocked out at {}\nHours worked: {}",
                record
                    .clock_out
                    .map(|t| format_time_local(calendar, t))
                    .unwrap_or_else(|| "--:--".to_string()),
                format_hours(record.total_hours.unwrap_or(0.0))
            );
            if let Some(overtime) = outcome.overtime {
                msg.push_str(&format!(
                    "\nOvertime of {} recorded and pending approval.",
                    format_hours(overtime.hours)
                ));
            }
            ctx.say(format_success_message(&msg)).await?;
        }
        Err(e) => {
            if !e.is_user_error() {
                tracing::error!(user_id = user.id, "Clock out failed: {:?}", e);
            }
            send_error(ctx, &e.to_string()).await?;
        }
    }

    Ok(())
}
