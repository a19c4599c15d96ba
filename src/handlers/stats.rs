use axum::extract::State;
use axum::Json;

use crate::calendar::{CalendarDate, YearMonth};
use crate::error::{AppError, AppResult};
use crate::extract::AppQuery;
use crate::models::stats::{ActivityQuery, DailyActivity, MonthQuery, StreakStats};
use crate::services::{activity, streak};
use crate::AppState;

pub async fn get_stats(State(state): State<AppState>) -> AppResult<Json<StreakStats>> {
    let dates = state.store.distinct_dates().await?;
    let total = state.store.count().await?;

    Ok(Json(streak::calculate(&dates, total, CalendarDate::today())))
}

/// Heatmap data: one row per day that has wins.
pub async fn get_activity(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ActivityQuery>,
) -> AppResult<Json<Vec<DailyActivity>>> {
    activity::check_range(query.start, query.end)?;

    let counts = state.store.daily_counts(query.start, query.end).await?;
    Ok(Json(activity::daily_activity(counts)))
}

/// Days in a month that have wins, for marking a calendar picker.
pub async fn get_month_dates(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<MonthQuery>,
) -> AppResult<Json<Vec<CalendarDate>>> {
    let month = query
        .month
        .as_deref()
        .filter(|m| !m.is_empty())
        .ok_or_else(|| AppError::Validation("Month parameter is required (YYYY-MM)".into()))?;
    let month = YearMonth::parse(month)?;

    let dates = state.store.dates_in_month(month).await?;
    Ok(Json(dates))
}
