use serde::{Deserialize, Serialize};

use crate::calendar::CalendarDate;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakStats {
    pub current_streak: u32,
    pub best_streak: u32,
    pub total_entries: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyActivity {
    pub date: CalendarDate,
    pub count: i64,
    pub level: u8,
}

/// Inclusive bounds; either may be omitted.
#[derive(Debug, Default, Deserialize)]
pub struct ActivityQuery {
    pub start: Option<CalendarDate>,
    pub end: Option<CalendarDate>,
}

#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    pub month: Option<String>,
}
