//! Streak calculation over the days that have at least one win.

use std::collections::BTreeSet;

use crate::calendar::CalendarDate;
use crate::models::stats::StreakStats;

/// Derive current and best streaks from the set of days with entries.
///
/// `dates` may contain duplicates and arrive in any order. The current streak
/// is anchored on `today` if it has an entry, otherwise on yesterday, and is
/// zero when neither day has one. `total_entries` is passed through unchanged
/// since it counts entries rather than days.
pub fn calculate(dates: &[CalendarDate], total_entries: i64, today: CalendarDate) -> StreakStats {
    let days: BTreeSet<CalendarDate> = dates.iter().copied().collect();

    StreakStats {
        current_streak: current_streak(&days, today),
        best_streak: best_streak(&days),
        total_entries,
    }
}

fn current_streak(days: &BTreeSet<CalendarDate>, today: CalendarDate) -> u32 {
    let yesterday = today.sub_days(1);
    let mut cursor = if days.contains(&today) {
        today
    } else if days.contains(&yesterday) {
        yesterday
    } else {
        return 0;
    };

    let mut streak = 0;
    while days.contains(&cursor) {
        streak += 1;
        cursor = cursor.sub_days(1);
    }
    streak
}

fn best_streak(days: &BTreeSet<CalendarDate>) -> u32 {
    let mut best = 0;
    let mut run = 0;
    let mut prev: Option<CalendarDate> = None;

    for &day in days {
        run = match prev {
            Some(p) if day.days_since(p) == 1 => run + 1,
            _ => 1,
        };
        best = best.max(run);
        prev = Some(day);
    }
    best
}
