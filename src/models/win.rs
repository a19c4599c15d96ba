use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

use crate::calendar::CalendarDate;
use crate::error::{AppError, AppResult};

pub const DEFAULT_COLOR: &str = "yellow";

/// Largest manual order magnitude accepted from clients. Orders this far
/// inside i64 leave room for `MIN(win_order) - 1` on later creates.
pub const MAX_WIN_ORDER: i64 = 1 << 62;

/// General, Personal/Health, Work, Creative/Fun.
pub const CATEGORY_COLORS: [&str; 4] = ["yellow", "green", "blue", "pink"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Win {
    pub id: i64,
    pub content: String,
    pub date_created: CalendarDate,
    pub is_starred: bool,
    pub color: String,
    pub win_order: i64,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WinFilter {
    All,
    Date(CalendarDate),
    Starred,
}

/// `?date=` with no value means "all"; `starred` accepts `true`/`false`/`1`/`0`.
#[derive(Debug, Default, Deserialize)]
pub struct WinQuery {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub date: Option<CalendarDate>,
    #[serde(default, deserialize_with = "query_flag")]
    pub starred: Option<bool>,
}

impl From<WinQuery> for WinFilter {
    fn from(query: WinQuery) -> Self {
        match (query.starred, query.date) {
            (Some(true), _) => WinFilter::Starred,
            (_, Some(date)) => WinFilter::Date(date),
            _ => WinFilter::All,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateWinRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,

    /// Defaults to today when absent.
    pub date_created: Option<CalendarDate>,

    #[validate(custom = "validate_color")]
    pub color: Option<String>,

    /// Opaque reference to an attachment stored elsewhere.
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateWinRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "No content provided for update"))]
    pub content: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ReorderItem {
    pub id: i64,
    pub order: i64,
}

#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub items: Vec<ReorderItem>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

/// One record of an import snapshot. Snapshots written by older versions
/// stored `is_starred` as 0/1 and may lack the later columns entirely.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ImportedWin {
    #[validate(length(min = 1, message = "Imported win content must not be empty"))]
    pub content: String,
    pub date_created: CalendarDate,
    #[serde(default, deserialize_with = "bool_or_int")]
    pub is_starred: bool,
    #[serde(default)]
    #[validate(custom = "validate_color")]
    pub color: Option<String>,
    #[serde(default)]
    pub win_order: Option<i64>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl ImportedWin {
    pub fn color(&self) -> &str {
        non_empty(self.color.as_deref()).unwrap_or(DEFAULT_COLOR)
    }

    pub fn image_url(&self) -> Option<&str> {
        non_empty(self.image_url.as_deref())
    }
}

impl From<Win> for ImportedWin {
    fn from(win: Win) -> Self {
        Self {
            content: win.content,
            date_created: win.date_created,
            is_starred: win.is_starred,
            color: Some(win.color),
            win_order: Some(win.win_order),
            image_url: win.image_url,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct ImportRequest {
    #[validate]
    pub wins: Vec<ImportedWin>,
    #[serde(default, rename = "clearExisting")]
    pub clear_existing: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ImportResponse {
    pub message: String,
    pub count: usize,
}

pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Empty means "use the default"; otherwise a category name or a `#rgb`/`#rrggbb` hex.
fn validate_color(color: &str) -> Result<(), ValidationError> {
    if color.is_empty() || CATEGORY_COLORS.contains(&color) {
        return Ok(());
    }
    if let Some(hex) = color.strip_prefix('#') {
        if matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Ok(());
        }
    }
    let mut err = ValidationError::new("color");
    err.message = Some(format!("Unknown color '{color}'").into());
    Err(err)
}

pub(crate) fn check_win_order(order: i64) -> AppResult<()> {
    if (-MAX_WIN_ORDER..=MAX_WIN_ORDER).contains(&order) {
        return Ok(());
    }
    Err(AppError::Validation(format!(
        "Order {order} is outside -{MAX_WIN_ORDER}..={MAX_WIN_ORDER}"
    )))
}

fn blank_as_none<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<CalendarDate>, D::Error> {
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.is_empty() => CalendarDate::parse(&raw)
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

fn query_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    match Option::<String>::deserialize(deserializer)?.as_deref() {
        None | Some("") => Ok(None),
        Some("true" | "1") => Ok(Some(true)),
        Some("false" | "0") => Ok(Some(false)),
        Some(other) => Err(serde::de::Error::custom(format!(
            "starred must be true/false or 1/0, got '{other}'"
        ))),
    }
}

fn bool_or_int<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(false),
        Some(serde_json::Value::Bool(b)) => Ok(b),
        Some(serde_json::Value::Number(n)) => Ok(n.as_f64().map_or(false, |v| v != 0.0)),
        Some(other) => Err(serde::de::Error::custom(format!(
            "is_starred must be a boolean or 0/1, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_prefers_starred_over_date() {
        let date = CalendarDate::parse("2024-01-02").unwrap();
        let query = WinQuery {
            date: Some(date),
            starred: Some(true),
        };
        assert_eq!(WinFilter::from(query), WinFilter::Starred);

        let query = WinQuery {
            date: Some(date),
            starred: Some(false),
        };
        assert_eq!(WinFilter::from(query), WinFilter::Date(date));
        assert_eq!(WinFilter::from(WinQuery::default()), WinFilter::All);
    }

    #[test]
    fn test_order_bounds() {
        assert!(check_win_order(0).is_ok());
        assert!(check_win_order(-MAX_WIN_ORDER).is_ok());
        assert!(check_win_order(MAX_WIN_ORDER).is_ok());
        assert!(matches!(check_win_order(i64::MIN), Err(AppError::Validation(_))));
        assert!(matches!(check_win_order(MAX_WIN_ORDER + 1), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_color_rules() {
        for ok in ["", "yellow", "green", "blue", "pink", "#fff", "#A1b2C3"] {
            assert!(validate_color(ok).is_ok(), "{ok} should be accepted");
        }
        for bad in ["purple", "#ffff", "#ggg", "fff", "Yellow"] {
            assert!(validate_color(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_create_request_requires_content() {
        let req: CreateWinRequest = serde_json::from_str(r#"{"color":"blue"}"#).unwrap();
        assert!(req.validate().is_err());

        let req: CreateWinRequest =
            serde_json::from_str(r##"{"content":"shipped it","color":"#123456"}"##).unwrap();
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_imported_win_defaults_and_legacy_star() {
        let win: ImportedWin =
            serde_json::from_str(r#"{"content":"a","date_created":"2024-01-01","is_starred":1}"#)
                .unwrap();
        assert!(win.is_starred);
        assert_eq!(win.color(), DEFAULT_COLOR);
        assert_eq!(win.win_order, None);
        assert_eq!(win.image_url(), None);

        let win: ImportedWin = serde_json::from_str(
            r#"{"id":9,"content":"b","date_created":"2024-01-01","is_starred":0,"color":"","image_url":""}"#,
        )
        .unwrap();
        assert!(!win.is_starred);
        assert_eq!(win.color(), DEFAULT_COLOR);
        assert_eq!(win.image_url(), None);

        let bad = serde_json::from_str::<ImportedWin>(
            r#"{"content":"c","date_created":"2024-01-01","is_starred":"yes"}"#,
        );
        assert!(bad.is_err());
    }

    #[test]
    fn test_import_request_validates_nested_records() {
        let req: ImportRequest = serde_json::from_str(
            r#"{"wins":[{"content":"ok","date_created":"2024-01-01"},{"content":"","date_created":"2024-01-02"}]}"#,
        )
        .unwrap();
        assert!(!req.clear_existing);
        assert!(req.validate().is_err());
    }
}
