use crate::database::models::ScheduleEntry;
use crate::database::queries;
use crate::utils::time::convert_to_24_hour;
use anyhow::Result;
use sqlx::SqlitePool;

/// Rewrites schedule rows whose shift times were saved in 12-hour form
/// (`9:30 AM`) so the shift matcher can read them.
pub struct ScheduleNormalizer {
    pool: SqlitePool,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeReport {
    pub updated: usize,
    pub errors: usize,
    pub total: usize,
}

impl ScheduleNormalizer {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn normalize_all(&self) -> Result<NormalizeReport> {
        let schedules = queries::get_schedules(&self.pool, None).await?;
        tracing::info!("Found {} schedules to process", schedules.len());

        let mut report = NormalizeReport {
            total: schedules.len(),
            ..Default::default()
        };

        for schedule in &schedules {
            let Some((start, end)) = normalized_times(schedule) else {
                continue;
            };

            match queries::update_schedule_times(&self.pool, schedule.id, &start, &end).await {
                Ok(()) => {
                    tracing::info!(
                        "Updated schedule {}: {:?} -> {}, {:?} -> {}",
                        schedule.id, schedule.shift_start, start, schedule.shift_end, end
                    );
                    report.updated += 1;
                }
                Err(e) => {
                    tracing::error!("Error updating schedule {}: {:?}", schedule.id, e);
                    report.errors += 1;
                }
            }
        }

        tracing::info!(
            updated = report.updated,
            errors = report.errors,
            total = report.total,
            "Schedule normalization finished"
        );
        Ok(report)
    }
}

/// New `(start, end)` when at least one bound changes. Bounds that cannot be
/// converted are kept as they are; rows missing a bound are skipped.
fn normalized_times(schedule: &ScheduleEntry) -> Option<(String, String)> {
    let start = schedule.shift_start.clone()?;
    let end = schedule.shift_end.clone()?;

    let new_start = convert_to_24_hour(&start);
    let new_end = convert_to_24_hour(&end);
    if new_start.is_none() && new_end.is_none() {
        return None;
    }

    Some((new_start.unwrap_or(start), new_end.unwrap_or(end)))
}
