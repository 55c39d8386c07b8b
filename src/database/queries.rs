use crate::database::models::{
    AttendanceFilter, AttendanceRecord, AttendanceUpdate, NewOvertime, NewScheduleEntry,
    OvertimeRecord, OvertimeStatus, ScheduleEntry, SortOrder, User,
};
use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};

const ATTENDANCE_COLUMNS: &str =
    "id, user_id, clock_in, clock_out, status, total_hours, created_at, updated_at";
const SCHEDULE_COLUMNS: &str = "id, staff_id, day_of_week, shift_start, shift_end, department";
const OVERTIME_COLUMNS: &str =
    "id, user_id, attendance_id, start_time, end_time, hours, notes, status, created_at";

// User queries
pub async fn create_or_get_user(
    pool: &SqlitePool,
    discord_id: &str,
    username: &str,
) -> Result<User> {
    // Try to get existing user first
    if let Some(user) = find_user_by_discord_id(pool, discord_id).await? {
        return Ok(user);
    }

    let result = sqlx::query(
        "INSERT INTO users (discord_id, username) VALUES (?, ?)"
    )
    .bind(discord_id)
    .bind(username)
    .execute(pool)
    .await?;

    let user_id = result.last_insert_rowid();
    get_user_by_id(pool, user_id).await
}

pub async fn find_user_by_discord_id(pool: &SqlitePool, discord_id: &str) -> Result<Option<User>> {
    let row = sqlx::query(
        "SELECT id, discord_id, username, created_at FROM users WHERE discord_id = ?"
    )
    .bind(discord_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| user_from_row(&row)))
}

pub async fn get_user_by_id(pool: &SqlitePool, user_id: i64) -> Result<User> {
    let row = sqlx::query(
        "SELECT id, discord_id, username, created_at FROM users WHERE id = ?"
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(user_from_row(&row))
}

fn user_from_row(row: &SqliteRow) -> User {
    User {
        id: row.get("id"),
        discord_id: row.get("discord_id"),
        username: row.get("username"),
        created_at: row.get("created_at"),
    }
}

// Attendance queries
pub async fn create_attendance(
    pool: &SqlitePool,
    user_id: i64,
    clock_in: DateTime<Utc>,
) -> Result<AttendanceRecord> {
    let result = sqlx::query(
        "INSERT INTO attendance (user_id, clock_in, status) VALUES (?, ?, 'active')"
    )
    .bind(user_id)
    .bind(clock_in)
    .execute(pool)
    .await?;

    let record_id = result.last_insert_rowid();
    get_attendance_by_id(pool, record_id).await
}

pub async fn get_attendance_by_id(pool: &SqlitePool, record_id: i64) -> Result<AttendanceRecord> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM attendance WHERE id = ?",
        ATTENDANCE_COLUMNS
    ))
    .bind(record_id)
    .fetch_one(pool)
    .await?;

    attendance_from_row(&row)
}

pub async fn find_attendance_by_id(
    pool: &SqlitePool,
    record_id: i64,
) -> Result<Option<AttendanceRecord>> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM attendance WHERE id = ?",
        ATTENDANCE_COLUMNS
    ))
    .bind(record_id)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(attendance_from_row).transpose()
}

pub async fn query_attendance(
    pool: &SqlitePool,
    filter: &AttendanceFilter,
) -> Result<Vec<AttendanceRecord>> {
    let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
        "SELECT {} FROM attendance WHERE 1 = 1",
        ATTENDANCE_COLUMNS
    ));

    if let Some(user_id) = filter.user_id {
        builder.push(" AND user_id = ").push_bind(user_id);
    }
    if let Some(status) = filter.status {
        builder.push(" AND status = ").push_bind(status.as_str());
    }
    if let Some(from) = filter.clock_in_from {
        builder.push(" AND clock_in >= ").push_bind(from);
    }
    if let Some(before) = filter.clock_in_before {
        builder.push(" AND clock_in < ").push_bind(before);
    }

    // id breaks ties between identical clock-ins: later insert wins.
    builder.push(match filter.order {
        SortOrder::Ascending => " ORDER BY clock_in ASC, id ASC",
        SortOrder::Descending => " ORDER BY clock_in DESC, id DESC",
    });

    let rows = builder.build().fetch_all(pool).await?;
    rows.iter().map(attendance_from_row).collect()
}

pub async fn update_attendance(
    pool: &SqlitePool,
    record_id: i64,
    update: &AttendanceUpdate,
) -> Result<AttendanceRecord> {
    let result = sqlx::query(
        "UPDATE attendance
         SET clock_out = ?, status = ?, total_hours = ?, updated_at = CURRENT_TIMESTAMP
         WHERE id = ?"
    )
    .bind(update.clock_out)
    .bind(update.status.as_str())
    .bind(update.total_hours)
    .bind(record_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(anyhow::anyhow!("Attendance record {} not found", record_id));
    }

    get_attendance_by_id(pool, record_id).await
}

/// Removes a record together with any overtime that points at it.
pub async fn delete_attendance(pool: &SqlitePool, record_id: i64) -> Result<bool> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM overtime WHERE attendance_id = ?")
        .bind(record_id)
        .execute(&mut *tx)
        .await?;

    let result = sqlx::query("DELETE FROM attendance WHERE id = ?")
        .bind(record_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(result.rows_affected() > 0)
}

fn attendance_from_row(row: &SqliteRow) -> Result<AttendanceRecord> {
    let status: String = row.get("status");
    Ok(AttendanceRecord {
        id: row.get("id"),
        user_id: row.get("user_id"),
        clock_in: row.get("clock_in"),
        clock_out: row.get("clock_out"),
        status: status.parse()?,
        total_hours: row.get("total_hours"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

// Schedule queries
pub async fn create_schedule(pool: &SqlitePool, entry: &NewScheduleEntry) -> Result<ScheduleEntry> {
    let result = sqlx::query(
        "INSERT INTO schedules (staff_id, day_of_week, shift_start, shift_end, department)
         VALUES (?, ?, ?, ?, ?)"
    )
    .bind(entry.staff_id)
    .bind(&entry.day_of_week)
    .bind(&entry.shift_start)
    .bind(&entry.shift_end)
    .bind(&entry.department)
    .execute(pool)
    .await?;

    let schedule_id = result.last_insert_rowid();
    let row = sqlx::query(&format!(
        "SELECT {} FROM schedules WHERE id = ?",
        SCHEDULE_COLUMNS
    ))
    .bind(schedule_id)
    .fetch_one(pool)
    .await?;

    Ok(schedule_from_row(&row))
}

/// Entries of one worker for one weekday, in insertion order.
pub async fn get_schedules_for_day(
    pool: &SqlitePool,
    staff_id: i64,
    day_of_week: &str,
) -> Result<Vec<ScheduleEntry>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM schedules WHERE staff_id = ? AND day_of_week = ? ORDER BY id ASC",
        SCHEDULE_COLUMNS
    ))
    .bind(staff_id)
    .bind(day_of_week)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(schedule_from_row).collect())
}

pub async fn get_schedules(pool: &SqlitePool, staff_id: Option<i64>) -> Result<Vec<ScheduleEntry>> {
    let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
        "SELECT {} FROM schedules",
        SCHEDULE_COLUMNS
    ));
    if let Some(staff_id) = staff_id {
        builder.push(" WHERE staff_id = ").push_bind(staff_id);
    }
    builder.push(" ORDER BY staff_id ASC, id ASC");

    let rows = builder.build().fetch_all(pool).await?;
    Ok(rows.iter().map(schedule_from_row).collect())
}

pub async fn update_schedule_times(
    pool: &SqlitePool,
    schedule_id: i64,
    shift_start: &str,
    shift_end: &str,
) -> Result<()> {
    sqlx::query("UPDATE schedules SET shift_start = ?, shift_end = ? WHERE id = ?")
        .bind(shift_start)
        .bind(shift_end)
        .bind(schedule_id)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn delete_schedule(pool: &SqlitePool, schedule_id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM schedules WHERE id = ?")
        .bind(schedule_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

fn schedule_from_row(row: &SqliteRow) -> ScheduleEntry {
    ScheduleEntry {
        id: row.get("id"),
        staff_id: row.get("staff_id"),
        day_of_week: row.get("day_of_week"),
        shift_start: row.get("shift_start"),
        shift_end: row.get("shift_end"),
        department: row.get("department"),
    }
}

// Overtime queries
pub async fn create_overtime(pool: &SqlitePool, overtime: &NewOvertime) -> Result<OvertimeRecord> {
    let result = sqlx::query(
        "INSERT INTO overtime (user_id, attendance_id, start_time, end_time, hours, notes, status)
         VALUES (?, ?, ?, ?, ?, ?, ?)"
    )
    .bind(overtime.user_id)
    .bind(overtime.attendance_id)
    .bind(overtime.start_time)
    .bind(overtime.end_time)
    .bind(overtime.hours)
    .bind(&overtime.notes)
    .bind(overtime.status.as_str())
    .execute(pool)
    .await?;

    let overtime_id = result.last_insert_rowid();
    let row = sqlx::query(&format!(
        "SELECT {} FROM overtime WHERE id = ?",
        OVERTIME_COLUMNS
    ))
    .bind(overtime_id)
    .fetch_one(pool)
    .await?;

    overtime_from_row(&row)
}

pub async fn get_overtime_by_status(
    pool: &SqlitePool,
    status: OvertimeStatus,
) -> Result<Vec<OvertimeRecord>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM overtime WHERE status = ? ORDER BY start_time ASC",
        OVERTIME_COLUMNS
    ))
    .bind(status.as_str())
    .fetch_all(pool)
    .await?;

    rows.iter().map(overtime_from_row).collect()
}

pub async fn get_overtime_for_attendance(
    pool: &SqlitePool,
    attendance_id: i64,
) -> Result<Vec<OvertimeRecord>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM overtime WHERE attendance_id = ? ORDER BY id ASC",
        OVERTIME_COLUMNS
    ))
    .bind(attendance_id)
    .fetch_all(pool)
    .await?;

    rows.iter().map(overtime_from_row).collect()
}

fn overtime_from_row(row: &SqliteRow) -> Result<OvertimeRecord> {
    let status: String = row.get("status");
    Ok(OvertimeRecord {
        id: row.get("id"),
        user_id: row.get("user_id"),
        attendance_id: row.get("attendance_id"),
        start_time: row.get("start_time"),
        end_time: row.get("end_time"),
        hours: row.get("hours"),
        notes: row.get("notes"),
        status: status.parse()?,
        created_at: row.get("created_at"),
    })
}
