//! Persisted wins and the queries derived state is computed from.
//!
//! `WinStore` is the only thing that touches the `wins` table. It is built
//! once at start-up from an open pool and shared through `AppState`.

use sqlx::SqlitePool;
use validator::Validate;

use crate::calendar::{CalendarDate, YearMonth};
use crate::error::{AppError, AppResult};
use crate::models::win::{
    check_win_order, non_empty, CreateWinRequest, ReorderItem, UpdateWinRequest, Win, WinFilter,
    DEFAULT_COLOR,
};

#[derive(Clone)]
pub struct WinStore {
    pub(super) pool: SqlitePool,
}

impl WinStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Insert a win ahead of every existing one in manual order.
    pub async fn create(&self, req: &CreateWinRequest) -> AppResult<Win> {
        req.validate()?;

        let date = req.date_created.unwrap_or_else(CalendarDate::today);
        let color = non_empty(req.color.as_deref()).unwrap_or(DEFAULT_COLOR);

        // Order is computed inside the INSERT so the read and write are one statement.
        // The floor keeps `MIN - 1` inside i64; past it SQLite would store a REAL.
        let win = sqlx::query_as::<_, Win>(
            r#"
            INSERT INTO wins (content, date_created, color, win_order, image_url)
            VALUES (?, ?, ?,
                    COALESCE(MAX((SELECT MIN(win_order) FROM wins), -9223372036854775807) - 1, 0),
                    ?)
            RETURNING *
            "#,
        )
        .bind(&req.content)
        .bind(date)
        .bind(color)
        .bind(non_empty(req.image_url.as_deref()))
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(id = win.id, date = %win.date_created, order = win.win_order, "Created win");
        Ok(win)
    }

    pub async fn get(&self, id: i64) -> AppResult<Win> {
        sqlx::query_as::<_, Win>("SELECT * FROM wins WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Manual order first, then most recent day, then newest id.
    pub async fn list(&self, filter: WinFilter) -> AppResult<Vec<Win>> {
        let wins = match filter {
            WinFilter::All => {
                sqlx::query_as::<_, Win>(
                    "SELECT * FROM wins ORDER BY win_order ASC, date_created DESC, id DESC",
                )
                .fetch_all(&self.pool)
                .await?
            }
            WinFilter::Date(date) => {
                sqlx::query_as::<_, Win>(
                    r#"
                    SELECT * FROM wins WHERE date_created = ?
                    ORDER BY win_order ASC, date_created DESC, id DESC
                    "#,
                )
                .bind(date)
                .fetch_all(&self.pool)
                .await?
            }
            WinFilter::Starred => {
                sqlx::query_as::<_, Win>(
                    r#"
                    SELECT * FROM wins WHERE is_starred = 1
                    ORDER BY win_order ASC, date_created DESC, id DESC
                    "#,
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(wins)
    }

    /// Replace content only; order, star and date are untouched.
    pub async fn update_content(&self, id: i64, req: &UpdateWinRequest) -> AppResult<Win> {
        req.validate()?;

        let win = sqlx::query_as::<_, Win>("UPDATE wins SET content = ? WHERE id = ? RETURNING *")
            .bind(&req.content)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found(id))?;

        tracing::debug!(id, "Updated win content");
        Ok(win)
    }

    pub async fn toggle_star(&self, id: i64) -> AppResult<Win> {
        let win = sqlx::query_as::<_, Win>(
            "UPDATE wins SET is_starred = NOT is_starred WHERE id = ? RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| not_found(id))?;

        tracing::debug!(id, starred = win.is_starred, "Toggled star");
        Ok(win)
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM wins WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }

        tracing::debug!(id, "Deleted win");
        Ok(())
    }

    /// Apply every order assignment in one transaction. Ids with no row are
    /// skipped; any database failure rolls the whole batch back. Returns the
    /// number of rows actually updated.
    pub async fn reorder(&self, items: &[ReorderItem]) -> AppResult<u64> {
        for item in items {
            check_win_order(item.order)?;
        }

        let mut tx = self.pool.begin().await?;
        let mut updated = 0;

        for item in items {
            updated += sqlx::query("UPDATE wins SET win_order = ? WHERE id = ?")
                .bind(item.order)
                .bind(item.id)
                .execute(&mut *tx)
                .await?
                .rows_affected();
        }

        tx.commit().await?;

        tracing::debug!(requested = items.len(), updated, "Reordered wins");
        Ok(updated)
    }

    /// Substring match on content, newest day first. Matching ignores case
    /// for ASCII letters only; other scripts compare exactly.
    pub async fn search(&self, query: &str) -> AppResult<Vec<Win>> {
        if query.is_empty() {
            return Err(AppError::Validation(
                "Query parameter \"q\" is required".into(),
            ));
        }

        let pattern = format!("%{}%", escape_like(query));
        let wins = sqlx::query_as::<_, Win>(
            r#"
            SELECT * FROM wins
            WHERE content LIKE ? ESCAPE '\'
            ORDER BY date_created DESC, id DESC
            "#,
        )
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(wins)
    }

    pub async fn count(&self) -> AppResult<i64> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM wins")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    /// Days with at least one win, ascending.
    pub async fn distinct_dates(&self) -> AppResult<Vec<CalendarDate>> {
        let dates = sqlx::query_scalar::<_, CalendarDate>(
            "SELECT DISTINCT date_created FROM wins ORDER BY date_created ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(dates)
    }

    /// Per-day win counts, ascending, optionally bounded (inclusive).
    pub async fn daily_counts(
        &self,
        start: Option<CalendarDate>,
        end: Option<CalendarDate>,
    ) -> AppResult<Vec<(CalendarDate, i64)>> {
        let rows = sqlx::query_as::<_, (CalendarDate, i64)>(
            r#"
            SELECT date_created, COUNT(*) AS count
            FROM wins
            WHERE (? IS NULL OR date_created >= ?)
              AND (? IS NULL OR date_created <= ?)
            GROUP BY date_created
            ORDER BY date_created ASC
            "#,
        )
        .bind(start)
        .bind(start)
        .bind(end)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Days inside `month` that have at least one win, ascending.
    pub async fn dates_in_month(&self, month: YearMonth) -> AppResult<Vec<CalendarDate>> {
        let dates = sqlx::query_scalar::<_, CalendarDate>(
            r#"
            SELECT DISTINCT date_created FROM wins
            WHERE date_created >= ? AND date_created < ?
            ORDER BY date_created ASC
            "#,
        )
        .bind(month.first_day())
        .bind(month.next_month_first_day())
        .fetch_all(&self.pool)
        .await?;

        tracing::debug!(month = %month, days = dates.len(), "Loaded month dates");
        Ok(dates)
    }
}

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Win {id} not found"))
}

fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
