//! Heatmap aggregation helpers.

use crate::calendar::CalendarDate;
use crate::error::{AppError, AppResult};
use crate::models::stats::DailyActivity;

pub const MAX_LEVEL: u8 = 4;

/// Heatmap intensity for a day's entry count, saturating at [`MAX_LEVEL`].
pub fn level(count: i64) -> u8 {
    count.clamp(0, i64::from(MAX_LEVEL)) as u8
}

pub fn daily_activity(counts: Vec<(CalendarDate, i64)>) -> Vec<DailyActivity> {
    counts
        .into_iter()
        .map(|(date, count)| DailyActivity {
            date,
            count,
            level: level(count),
        })
        .collect()
}

pub fn check_range(start: Option<CalendarDate>, end: Option<CalendarDate>) -> AppResult<()> {
    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            return Err(AppError::Validation(format!(
                "start ({start}) must not be after end ({end})"
            )));
        }
    }
    Ok(())
}
