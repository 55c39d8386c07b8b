use crate::bot::commands::{is_admin, send_error, staff_name};
use crate::bot::{Context, Error};
use crate::database::models::{
    AttendanceFilter, AttendanceStatus, AttendanceUpdate, OvertimeStatus, SortOrder,
};
use crate::database::queries;
use crate::utils::format::{
    create_info_embed, create_success_embed, format_active_staff, format_correction_summary,
    format_overtime_list,
};
use crate::utils::time::{hours_between, parse_flexible_time};
use crate::utils::validation::validate_corrected_clock_out;
use std::collections::HashMap;

/// List staff who are currently clocked in
#[poise::command(slash_command, check = "is_admin")]
pub async fn active_staff(ctx: Context<'_>) -> Result<(), Error> {
    let data = ctx.data();
    let filter = AttendanceFilter {
        status: Some(AttendanceStatus::Active),
        order: SortOrder::Ascending,
        ..Default::default()
    };

    let records = match queries::query_attendance(&data.pool, &filter).await {
        Ok(records) => records,
        Err(e) => {
            tracing::error!("Failed to list active staff: {:?}", e);
            send_error(ctx, "Failed to get active staff").await?;
            return Ok(());
        }
    };

    let mut names = HashMap::new();
    let mut rows = Vec::with_capacity(records.len());
    for record in records {
        let name = staff_name(&data.pool, &mut names, record.user_id).await;
        rows.push((name, record));
    }

    let text = format_active_staff(data.calendar(), &rows, chrono::Utc::now());
    let embed = create_info_embed("👥 Clocked in now", &text);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// List overtime waiting for approval
#[poise::command(slash_command, check = "is_admin")]
pub async fn overtime(ctx: Context<'_>) -> Result<(), Error> {
    let data = ctx.data();

    let records = match queries::get_overtime_by_status(&data.pool, OvertimeStatus::Pending).await {
        Ok(records) => records,
        Err(e) => {
            tracing::error!("Failed to list overtime: {:?}", e);
            send_error(ctx, "Failed to get overtime records").await?;
            return Ok(());
        }
    };

    let mut names = HashMap::new();
    let mut rows = Vec::with_capacity(records.len());
    for record in records {
        let name = staff_name(&data.pool, &mut names, record.user_id).await;
        rows.push((name, record));
    }

    let text = format_overtime_list(data.calendar(), &rows);
    let embed = create_info_embed("⏱️ Pending overtime", &text);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Set the clock-out time of an attendance record
#[poise::command(slash_command, check = "is_admin")]
pub async fn attendance_fix(
    ctx: Context<'_>,
    #[description = "Attendance record id"] id: i64,
    #[description = "Clock-out time on the clock-in day, e.g. 17:30"] clock_out: String,
) -> Result<(), Error> {
    let data = ctx.data();
    let calendar = data.calendar();

    let record = match queries::find_attendance_by_id(&data.pool, id).await {
        Ok(Some(record)) => record,
        Ok(None) => {
            send_error(ctx, &format!("Attendance record #{} not found", id)).await?;
            return Ok(());
        }
        Err(e) => {
            tracing::error!(record_id = id, "Failed to load attendance: {:?}", e);
            send_error(ctx, "Failed to load attendance record").await?;
            return Ok(());
        }
    };

    let time = match parse_flexible_time(&clock_out) {
        Ok(time) => time,
        Err(e) => {
            send_error(ctx, &e.to_string()).await?;
            return Ok(());
        }
    };
    let corrected = calendar.anchor(record.clock_in, time);

    if let Err(e) = validate_corrected_clock_out(record.clock_in, corrected, chrono::Utc::now()) {
        send_error(ctx, &e.to_string()).await?;
        return Ok(());
    }

    let update = AttendanceUpdate {
        clock_out: corrected,
        status: AttendanceStatus::Completed,
        total_hours: hours_between(record.clock_in, corrected),
    };

    match queries::update_attendance(&data.pool, id, &update).await {
        Ok(updated) => {
            tracing::info!(
                record_id = id,
                user_id = updated.user_id,
                total_hours = update.total_hours,
                "Attendance corrected"
            );
            let overtime = match queries::get_overtime_for_attendance(&data.pool, id).await {
                Ok(overtime) => overtime,
                Err(e) => {
                    tracing::warn!(record_id = id, "Failed to load overtime for record: {:?}", e);
                    Vec::new()
                }
            };
            if overtime.iter().any(|o| o.status == OvertimeStatus::Pending) {
                tracing::warn!(record_id = id, "Corrected record still has pending overtime");
            }
            let embed = create_success_embed(
                "Attendance corrected",
                &format_correction_summary(calendar, &updated, &overtime),
            );
            ctx.send(poise::CreateReply::default().embed(embed)).await?;
        }
        Err(e) => {
            tracing::error!(record_id = id, "Failed to correct attendance: {:?}", e);
            send_error(ctx, "Failed to update attendance record").await?;
        }
    }

    Ok(())
}

/// Delete an attendance record and its overtime
#[poise::command(slash_command, check = "is_admin")]
pub async fn attendance_delete(
    ctx: Context<'_>,
    #[description = "Attendance record id"] id: i64,
) -> Result<(), Error> {
    match queries::delete_attendance(&ctx.data().pool, id).await {
        Ok(true) => {
            tracing::info!(record_id = id, "Attendance deleted");
            let embed =
                create_success_embed("Attendance deleted", &format!("Record `#{}` removed", id));
            ctx.send(poise::CreateReply::default().embed(embed)).await?;
        }
        Ok(false) => send_error(ctx, &format!("Attendance record #{} not found", id)).await?,
        Err(e) => {
            tracing::error!(record_id = id, "Failed to delete attendance: {:?}", e);
            send_error(ctx, "Failed to delete attendance record").await?;
        }
    }

    Ok(())
}
