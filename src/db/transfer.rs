//! Snapshot export and all-or-nothing import.

use validator::Validate;

use super::store::WinStore;
use crate::error::AppResult;
use crate::models::win::{check_win_order, ImportRequest, Win};

impl WinStore {
    /// Every win with every column, newest day first.
    pub async fn export(&self) -> AppResult<Vec<Win>> {
        let wins = sqlx::query_as::<_, Win>(
            "SELECT * FROM wins ORDER BY date_created DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(wins)
    }

    /// Insert a snapshot, optionally wiping the table first. The payload is
    /// validated up front and written in one transaction, so either every
    /// record lands or nothing changes. Ids in the payload are ignored.
    pub async fn import(&self, req: &ImportRequest) -> AppResult<usize> {
        req.validate()?;
        for win in &req.wins {
            check_win_order(win.win_order.unwrap_or(0))?;
        }

        let mut tx = self.pool.begin().await?;

        if req.clear_existing {
            let cleared = sqlx::query("DELETE FROM wins")
                .execute(&mut *tx)
                .await?
                .rows_affected();
            tracing::info!(cleared, "Cleared wins before import");
        }

        for win in &req.wins {
            sqlx::query(
                r#"
                INSERT INTO wins (content, date_created, is_starred, color, win_order, image_url)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&win.content)
            .bind(win.date_created)
            .bind(win.is_starred)
            .bind(win.color())
            .bind(win.win_order.unwrap_or(0))
            .bind(win.image_url())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::info!(count = req.wins.len(), clear_existing = req.clear_existing, "Imported wins");
        Ok(req.wins.len())
    }
}
