use crate::database::models::{AttendanceRecord, OvertimeRecord, OvertimeStatus, ScheduleEntry};
use crate::utils::time::{
    LocalCalendar, format_hours, format_time_local, hours_between, weekday_name,
};
use chrono::{DateTime, NaiveDate, Utc, Weekday};
use poise::serenity_prelude as serenity;

pub fn format_attendance_status(
    calendar: &LocalCalendar,
    active: Option<&AttendanceRecord>,
    today: &[AttendanceRecord],
    now: DateTime<Utc>,
) -> String {
    let mut status = String::new();

    match active {
        Some(record) => {
            status.push_str(&format!(
                "🟢 **Clocked in** since {} ({} so far)\n",
                format_time_local(calendar, record.clock_in),
                format_hours(hours_between(record.clock_in, now))
            ));
            if !calendar.same_day(record.clock_in, now) {
                status.push_str("⚠️ This session started on an earlier day and will be closed at its scheduled end on your next clock-in\n");
            }
        }
        None => status.push_str("⚪ **Not clocked in**\n"),
    }

    let completed: Vec<&AttendanceRecord> = today.iter().filter(|r| !r.is_active()).collect();
    if completed.is_empty() {
        return status;
    }

    status.push_str("\n**Today's sessions:**\n");
    let mut total_hours = 0.0;
    for (i, record) in completed.iter().enumerate() {
        status.push_str(&format!("#{} {}\n", i + 1, format_session_line(calendar, record)));
        total_hours += record.total_hours.unwrap_or(0.0);
    }
    status.push_str(&format!("\n📊 **Total today**: {}", format_hours(total_hours)));

    status
}

fn format_session_line(calendar: &LocalCalendar, record: &AttendanceRecord) -> String {
    let clock_in = format_time_local(calendar, record.clock_in);
    match (record.clock_out, record.total_hours) {
        (Some(clock_out), Some(hours)) => format!(
            "🟢 {} → 🔴 {} ({})",
            clock_in,
            format_time_local(calendar, clock_out),
            format_hours(hours)
        ),
        _ => format!("🟢 {} → ⚠️ **still open**", clock_in),
    }
}

/// Records grouped by local day, with per-day and grand totals.
pub fn format_attendance_history(calendar: &LocalCalendar, records: &[AttendanceRecord]) -> String {
    if records.is_empty() {
        return "No attendance records in this period".to_string();
    }

    let mut summary = String::new();
    let mut total_hours = 0.0;
    let mut current_date: Option<NaiveDate> = None;
    let mut daily_hours = 0.0;

    for record in records {
        let date = calendar.date_of(record.clock_in);

        if current_date != Some(date) {
            if let Some(prev_date) = current_date {
                push_daily_total(&mut summary, prev_date, daily_hours);
            }

            current_date = Some(date);
            daily_hours = 0.0;
            summary.push_str(&format!("📅 **{}**\n", date.format("%Y-%m-%d (%a)")));
        }

        summary.push_str(&format!("   `#{}` {}\n", record.id, format_session_line(calendar, record)));
        let hours = record.total_hours.unwrap_or(0.0);
        total_hours += hours;
        daily_hours += hours;
    }

    if let Some(last_date) = current_date {
        push_daily_total(&mut summary, last_date, daily_hours);
    }

    summary.push_str(&format!("🎯 **Total hours for period**: {}", format_hours(total_hours)));
    summary
}

fn push_daily_total(summary: &mut String, date: NaiveDate, hours: f64) {
    if hours > 0.0 {
        summary.push_str(&format!(
            "   📊 **{} total**: {}\n\n",
            date.format("%m/%d"),
            format_hours(hours)
        ));
    } else {
        summary.push('\n');
    }
}

pub fn format_active_staff(
    calendar: &LocalCalendar,
    staff: &[(String, AttendanceRecord)],
    now: DateTime<Utc>,
) -> String {
    if staff.is_empty() {
        return "Nobody is clocked in right now".to_string();
    }

    staff
        .iter()
        .map(|(name, record)| {
            format!(
                "🟢 **{}** since {} ({}) `#{}`",
                name,
                format_time_local(calendar, record.clock_in),
                format_hours(hours_between(record.clock_in, now)),
                record.id
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_schedule_list(schedules: &[(String, ScheduleEntry)]) -> String {
    if schedules.is_empty() {
        return "No shifts scheduled".to_string();
    }

    schedules
        .iter()
        .map(|(name, entry)| {
            let department = entry
                .department
                .as_deref()
                .map(|d| format!(" [{}]", d))
                .unwrap_or_default();
            format!(
                "`#{}` **{}** {}: {} - {}{}",
                entry.id,
                name,
                entry.day_of_week,
                entry.shift_start.as_deref().unwrap_or("--:--"),
                entry.shift_end.as_deref().unwrap_or("--:--"),
                department
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// One staff member's shifts grouped Monday to Sunday, each day in stored order.
pub fn format_weekly_schedule(entries: &[ScheduleEntry]) -> String {
    if entries.is_empty() {
        return "No shifts scheduled".to_string();
    }

    let mut week = String::new();
    for day in WEEK {
        let name = weekday_name(day);
        let shifts: Vec<String> = entries
            .iter()
            .filter(|e| e.day_of_week.eq_ignore_ascii_case(name))
            .map(|e| {
                let department = e
                    .department
                    .as_deref()
                    .map(|d| format!(" [{}]", d))
                    .unwrap_or_default();
                format!(
                    "{} - {}{}",
                    e.shift_start.as_deref().unwrap_or("--:--"),
                    e.shift_end.as_deref().unwrap_or("--:--"),
                    department
                )
            })
            .collect();

        let line = if shifts.is_empty() {
            "Off".to_string()
        } else {
            shifts.join(", ")
        };
        week.push_str(&format!("**{}**: {}\n", day, line));
    }

    week.trim_end().to_string()
}

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

pub fn format_overtime_list(calendar: &LocalCalendar, overtime: &[(String, OvertimeRecord)]) -> String {
    if overtime.is_empty() {
        return "No pending overtime".to_string();
    }

    overtime
        .iter()
        .map(|(name, record)| {
            format!(
                "⏱️ **{}** {} {} → {} ({}) attendance `#{}`",
                name,
                calendar.date_of(record.start_time).format("%Y-%m-%d"),
                format_time_local(calendar, record.start_time),
                format_time_local(calendar, record.end_time),
                format_hours(record.hours),
                record.attendance_id
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Reply for an admin clock-out correction. Overtime rows are not changed by
/// a correction, so any still pending are listed for review.
pub fn format_correction_summary(
    calendar: &LocalCalendar,
    record: &AttendanceRecord,
    overtime: &[OvertimeRecord],
) -> String {
    let mut summary = format!(
        "Record `#{}`: {} → {} ({})",
        record.id,
        format_time_local(calendar, record.clock_in),
        record
            .clock_out
            .map(|t| format_time_local(calendar, t))
            .unwrap_or_else(|| "--:--".to_string()),
        format_hours(record.total_hours.unwrap_or(0.0))
    );

    let pending: Vec<&OvertimeRecord> = overtime
        .iter()
        .filter(|o| o.status == OvertimeStatus::Pending)
        .collect();
    if !pending.is_empty() {
        summary.push_str("\n⚠️ Pending overtime for this record was not changed:");
        for o in pending {
            summary.push_str(&format!(
                "\n   {} → {} ({})",
                format_time_local(calendar, o.start_time),
                format_time_local(calendar, o.end_time),
                format_hours(o.hours)
            ));
        }
        summary.push_str("\nReview it with /overtime.");
    }

    summary
}

pub fn format_error_message(error: &str) -> String {
    format!("❌ **Error**: {}", error)
}

pub fn format_success_message(message: &str) -> String {
    format!("✅ {}", message)
}

// Embed utility functions
pub fn create_success_embed(title: &str, description: &str) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title(title)
        .description(description)
        .color(0x00ff00) // Green
        .timestamp(chrono::Utc::now())
}

pub fn create_error_embed(title: &str, description: &str) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title(title)
        .description(description)
        .color(0xff0000) // Red
        .timestamp(chrono::Utc::now())
}

pub fn create_info_embed(title: &str, description: &str) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title(title)
        .description(description)
        .color(0x3498db) // Blue
        .timestamp(chrono::Utc::now())
}

pub fn create_status_embed(username: &str, date: NaiveDate, status_text: String) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title("📊 Attendance status")
        .description(status_text)
        .color(0x3498db) // Blue
        .author(serenity::CreateEmbedAuthor::new(username))
        .footer(serenity::CreateEmbedFooter::new(date.format("%Y-%m-%d").to_string()))
        .timestamp(chrono::Utc::now())
}

pub fn create_report_embed(username: &str, title: &str, date_range: &str, report_text: String) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title(format!("📅 {}", title))
        .description(report_text)
        .color(0x9b59b6) // Purple
        .author(serenity::CreateEmbedAuthor::new(format!("{}'s attendance", username)))
        .footer(serenity::CreateEmbedFooter::new(date_range))
        .timestamp(chrono::Utc::now())
}
