use crate::bot::commands::{is_admin, resolve_author, send_error, staff_name};
use crate::bot::{Context, Error};
use crate::database::models::NewScheduleEntry;
use crate::database::queries;
use crate::utils::format::{
    create_info_embed, create_success_embed, format_schedule_list, format_weekly_schedule,
};
use crate::utils::schedule_normalizer::ScheduleNormalizer;
use crate::utils::time::weekday_name;
use crate::utils::validation::validate_shift;
use chrono::Weekday;
use poise::serenity_prelude as serenity;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl From<Day> for Weekday {
    fn from(day: Day) -> Self {
        match day {
            Day::Monday => Weekday::Mon,
            Day::Tuesday => Weekday::Tue,
            Day::Wednesday => Weekday::Wed,
            Day::Thursday => Weekday::Thu,
            Day::Friday => Weekday::Fri,
            Day::Saturday => Weekday::Sat,
            Day::Sunday => Weekday::Sun,
        }
    }
}

/// Manage the weekly shift schedule
#[poise::command(
    slash_command,
    subcommands("add", "list", "remove", "normalize"),
    check = "is_admin"
)]
pub async fn schedule(_ctx: Context<'_>) -> Result<(), Error> {
    Ok(())
}

/// Add a shift for a staff member
#[poise::command(slash_command, check = "is_admin")]
pub async fn add(
    ctx: Context<'_>,
    #[description = "Staff member"] staff: serenity::User,
    #[description = "Day of the week"] day: Day,
    #[description = "Shift start, e.g. 09:00 or 9:00 AM"] start: String,
    #[description = "Shift end, e.g. 17:00 or 5:00 PM"] end: String,
    #[description = "Department"] department: Option<String>,
) -> Result<(), Error> {
    let (shift_start, shift_end) = match validate_shift(&start, &end) {
        Ok(times) => times,
        Err(e) => {
            send_error(ctx, &e.to_string()).await?;
            return Ok(());
        }
    };

    let pool = &ctx.data().pool;
    let user = match queries::create_or_get_user(pool, &staff.id.to_string(), &staff.name).await {
        Ok(user) => user,
        Err(e) => {
            tracing::error!("Failed to load staff {}: {:?}", staff.id, e);
            send_error(ctx, "Failed to load the staff profile").await?;
            return Ok(());
        }
    };

    let entry = NewScheduleEntry {
        staff_id: user.id,
        day_of_week: weekday_name(day.into()).to_string(),
        shift_start,
        shift_end,
        department: department.filter(|d| !d.trim().is_empty()),
    };

    match queries::create_schedule(pool, &entry).await {
        Ok(created) => {
            tracing::info!(schedule_id = created.id, staff_id = user.id, "Schedule added");
            let embed = create_success_embed(
                "Shift added",
                &format_schedule_list(&[(user.username, created)]),
            );
            ctx.send(poise::CreateReply::default().embed(embed)).await?;
        }
        Err(e) => {
            tracing::error!("Failed to add schedule: {:?}", e);
            send_error(ctx, "Failed to add schedule").await?;
        }
    }

    Ok(())
}

/// List scheduled shifts
#[poise::command(slash_command, check = "is_admin")]
pub async fn list(
    ctx: Context<'_>,
    #[description = "Only this staff member"] staff: Option<serenity::User>,
) -> Result<(), Error> {
    let pool = &ctx.data().pool;

    let staff_id = match &staff {
        Some(member) => match queries::find_user_by_discord_id(pool, &member.id.to_string()).await {
            Ok(Some(user)) => Some(user.id),
            Ok(None) => {
                let embed = create_info_embed("Schedule", "No shifts scheduled");
                ctx.send(poise::CreateReply::default().embed(embed)).await?;
                return Ok(());
            }
            Err(e) => {
                tracing::error!("Failed to load staff: {:?}", e);
                send_error(ctx, "Failed to load the staff profile").await?;
                return Ok(());
            }
        },
        None => None,
    };

    let schedules = match queries::get_schedules(pool, staff_id).await {
        Ok(schedules) => schedules,
        Err(e) => {
            tracing::error!("Failed to list schedules: {:?}", e);
            send_error(ctx, "Failed to load schedules").await?;
            return Ok(());
        }
    };

    let mut names: HashMap<i64, String> = HashMap::new();
    let mut rows = Vec::with_capacity(schedules.len());
    for entry in schedules {
        let name = staff_name(pool, &mut names, entry.staff_id).await;
        rows.push((name, entry));
    }

    let embed = create_info_embed("🗓️ Schedule", &format_schedule_list(&rows));
    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Remove a shift by its id
#[poise::command(slash_command, check = "is_admin")]
pub async fn remove(
    ctx: Context<'_>,
    #[description = "Schedule id (shown in /schedule list)"] id: i64,
) -> Result<(), Error> {
    match queries::delete_schedule(&ctx.data().pool, id).await {
        Ok(true) => {
            tracing::info!(schedule_id = id, "Schedule removed");
            let embed = create_success_embed("Shift removed", &format!("Schedule `#{}` deleted", id));
            ctx.send(poise::CreateReply::default().embed(embed)).await?;
        }
        Ok(false) => send_error(ctx, &format!("Schedule #{} not found", id)).await?,
        Err(e) => {
            tracing::error!("Failed to delete schedule {}: {:?}", id, e);
            send_error(ctx, "Failed to delete schedule").await?;
        }
    }

    Ok(())
}

/// Convert shift times saved in AM/PM form to 24-hour form
#[poise::command(slash_command, check = "is_admin")]
pub async fn normalize(ctx: Context<'_>) -> Result<(), Error> {
    let normalizer = ScheduleNormalizer::new(ctx.data().pool.clone());

    match normalizer.normalize_all().await {
        Ok(report) => {
            let embed = create_success_embed(
                "Schedule times normalized",
                &format!(
                    "Updated: {}\nErrors: {}\nTotal processed: {}",
                    report.updated, report.errors, report.total
                ),
            );
            ctx.send(poise::CreateReply::default().embed(embed)).await?;
        }
        Err(e) => {
            tracing::error!("Schedule normalization failed: {:?}", e);
            send_error(ctx, "Failed to fetch schedules").await?;
        }
    }

    Ok(())
}

/// Show your own weekly shifts
#[poise::command(slash_command)]
pub async fn my_schedule(ctx: Context<'_>) -> Result<(), Error> {
    let Some(user) = resolve_author(ctx).await? else {
        return Ok(());
    };

    match queries::get_schedules(&ctx.data().pool, Some(user.id)).await {
        Ok(schedules) => {
            let embed = create_info_embed(
                &format!("🗓️ {}'s shifts", user.username),
                &format_weekly_schedule(&schedules),
            );
            ctx.send(poise::CreateReply::default().embed(embed).ephemeral(true))
                .await?;
        }
        Err(e) => {
            tracing::error!(user_id = user.id, "Failed to load own schedule: {:?}", e);
            send_error(ctx, "Failed to load schedules").await?;
        }
    }

    Ok(())
}
