//! Database module for SQLite persistence.
//!
//! SQLite is the source of truth for topics and user preferences.

mod seed;
mod topic_dao;
mod user_data_store;

pub use seed::*;
pub use topic_dao::*;
pub use user_data_store::*;

use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::path::Path;
use std::str::FromStr;

use crate::errors::AppError;
use crate::models::RevisionInfo;

/// Initialize the database connection pool and run migrations.
pub async fn init_database(db_path: &Path) -> Result<SqlitePool, sqlx::Error> {
    // Ensure the parent directory exists
    if let Some(parent) = db_path.parent() {
        tokio::fs::create_dir_all(parent).await.ok();
    }

    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

    let options = SqliteConnectOptions::from_str(&db_url)?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;

    Ok(pool)
}

/// Run database migrations.
async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS meta (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            schema_version INTEGER NOT NULL DEFAULT 1,
            revision_id INTEGER NOT NULL DEFAULT 0,
            generated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        INSERT OR IGNORE INTO meta (id, schema_version, revision_id, generated_at)
        VALUES (1, 1, 0, datetime('now'));
        "#,
    )
    .execute(pool)
    .await?;

    // row_id is AUTOINCREMENT so identifiers handed out by inserts are never reused.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS topics (
            row_id INTEGER PRIMARY KEY AUTOINCREMENT,
            id TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            short_description TEXT NOT NULL,
            long_description TEXT NOT NULL,
            url TEXT NOT NULL,
            image_url TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user_data (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            payload TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_topics_name ON topics(name);")
        .execute(pool)
        .await?;

    Ok(())
}

/// Get the current revision ID.
pub async fn get_revision_id(pool: &SqlitePool) -> Result<i64, AppError> {
    let row = sqlx::query("SELECT revision_id FROM meta WHERE id = 1")
        .fetch_one(pool)
        .await?;
    Ok(row.get("revision_id"))
}

/// Get revision info.
pub async fn get_revision_info(pool: &SqlitePool) -> Result<RevisionInfo, AppError> {
    let row = sqlx::query("SELECT revision_id, generated_at FROM meta WHERE id = 1")
        .fetch_one(pool)
        .await?;
    Ok(RevisionInfo {
        revision_id: row.get("revision_id"),
        generated_at: row.get("generated_at"),
    })
}

/// Increment the revision inside the caller's transaction.
pub(crate) async fn bump_revision(conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    let now = Utc::now().to_rfc3339();
    sqlx::query("UPDATE meta SET revision_id = revision_id + 1, generated_at = ? WHERE id = 1")
        .bind(&now)
        .execute(conn)
        .await?;
    Ok(())
}
