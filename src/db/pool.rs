use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::error::AppResult;

/// `DB_PATH` value that selects a throwaway in-memory database.
pub const MEMORY_PATH: &str = ":memory:";

pub async fn create_pool(db_path: &Path) -> AppResult<SqlitePool> {
    if db_path == Path::new(MEMORY_PATH) {
        return create_memory_pool().await;
    }

    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create database directory {}", parent.display()))?;
    }

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(5))
        .connect_with(options)
        .await?;

    tracing::info!(path = %db_path.display(), "Database pool created");
    Ok(pool)
}

/// Every in-memory connection is a separate database, so the pool is pinned
/// to a single connection that is never reaped.
pub async fn create_memory_pool() -> AppResult<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(SqliteConnectOptions::from_str("sqlite::memory:")?)
        .await?;

    Ok(pool)
}

/// Apply the embedded migrations in version order. Already-applied versions
/// are skipped, so this is safe to run on every start.
pub async fn migrate(pool: &SqlitePool) -> AppResult<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Database migrations applied");
    Ok(())
}
