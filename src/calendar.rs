//! Calendar-day arithmetic for entry dates.
//!
//! Entries belong to a day, not an instant. Everything that groups, filters
//! or walks over entry dates goes through [`CalendarDate`] so no timezone
//! conversion ever sneaks into streak or heatmap logic.

use std::fmt;

use chrono::{Duration, Local, Months, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{AppError, AppResult};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A day on the calendar, stored and serialized as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, sqlx::Type)]
#[sqlx(transparent)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    /// Strict `YYYY-MM-DD` parse; unpadded or trailing input is rejected.
    pub fn parse(s: &str) -> AppResult<Self> {
        let invalid = || AppError::Validation(format!("Invalid date '{s}', expected YYYY-MM-DD"));
        if s.len() != 10 {
            return Err(invalid());
        }
        let date = NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|_| invalid())?;
        Ok(Self(date))
    }

    /// Today on the local calendar.
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    pub fn add_days(self, days: i64) -> Self {
        Self(self.0 + Duration::days(days))
    }

    pub fn sub_days(self, days: i64) -> Self {
        Self(self.0 - Duration::days(days))
    }

    /// Whole days from `earlier` to `self`; negative when `earlier` is later.
    pub fn days_since(self, earlier: CalendarDate) -> i64 {
        (self.0 - earlier.0).num_days()
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

impl Serialize for CalendarDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CalendarDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        CalendarDate::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// A calendar month, written `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearMonth {
    first: NaiveDate,
}

impl YearMonth {
    pub fn parse(s: &str) -> AppResult<Self> {
        let invalid = || AppError::Validation(format!("Invalid month '{s}', expected YYYY-MM"));
        let (year, month) = s.split_once('-').ok_or_else(invalid)?;
        let digits = |part: &str, len: usize| part.len() == len && part.bytes().all(|b| b.is_ascii_digit());
        if !digits(year, 4) || !digits(month, 2) {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
        Ok(Self { first })
    }

    pub fn first_day(self) -> CalendarDate {
        CalendarDate(self.first)
    }

    pub fn next_month_first_day(self) -> CalendarDate {
        CalendarDate(
            self.first
                .checked_add_months(Months::new(1))
                .unwrap_or(NaiveDate::MAX),
        )
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.first.format("%Y-%m"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> CalendarDate {
        CalendarDate::parse(s).unwrap()
    }

    #[test]
    fn test_parse_is_strict() {
        assert_eq!(d("2024-01-05").to_string(), "2024-01-05");
        assert!(CalendarDate::parse("2024-1-5").is_err());
        assert!(CalendarDate::parse("2024-02-30").is_err());
        assert!(CalendarDate::parse("2024-01-05T10:00:00").is_err());
        assert!(CalendarDate::parse("").is_err());
    }

    #[test]
    fn test_day_arithmetic_crosses_month_and_leap_day() {
        assert_eq!(d("2024-02-28").add_days(1), d("2024-02-29"));
        assert_eq!(d("2024-03-01").sub_days(1), d("2024-02-29"));
        assert_eq!(d("2023-12-31").add_days(1), d("2024-01-01"));
        assert_eq!(d("2024-03-01").days_since(d("2024-02-28")), 2);
        assert_eq!(d("2024-02-28").days_since(d("2024-03-01")), -2);
    }

    #[test]
    fn test_serde_uses_plain_date_string() {
        let json = serde_json::to_string(&d("2024-07-04")).unwrap();
        assert_eq!(json, "\"2024-07-04\"");
        let back: CalendarDate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, d("2024-07-04"));
        assert!(serde_json::from_str::<CalendarDate>("\"07/04/2024\"").is_err());
    }

    #[test]
    fn test_year_month_bounds() {
        let month = YearMonth::parse("2024-12").unwrap();
        assert_eq!(month.first_day(), d("2024-12-01"));
        assert_eq!(month.next_month_first_day(), d("2025-01-01"));
        assert_eq!(month.to_string(), "2024-12");

        for bad in ["2024-13", "2024-00", "2024-1", "24-01", "2024/01", "", "abcd-ef", "2024-+1"] {
            assert!(YearMonth::parse(bad).is_err(), "{bad} should be rejected");
        }
    }
}
