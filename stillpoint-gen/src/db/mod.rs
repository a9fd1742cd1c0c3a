//! Database access for stillpoint-gen
//!
//! SQLite database in the root folder, one row per generation request
//! plus a key/value settings table.

pub mod meditations;
pub mod settings;

use anyhow::Result;
use sqlx::SqlitePool;
use std::path::Path;

/// Initialize database connection pool
pub async fn init_database_pool(db_path: &Path) -> Result<SqlitePool> {
    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Use proper SQLite URI with mode=rwc (read, write, create)
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    tracing::debug!("Connecting to database: {}", db_url);

    let pool = SqlitePool::connect(&db_url).await?;

    init_tables(&pool).await?;

    Ok(pool)
}

/// Initialize stillpoint-gen tables
///
/// Creates meditations and settings tables if they don't exist.
pub async fn init_tables(pool: &SqlitePool) -> Result<()> {
    // Key/value settings table for API key persistence
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // One row per generation request
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS meditations (
            meditation_id TEXT PRIMARY KEY,
            username TEXT NOT NULL,
            expertise TEXT NOT NULL,
            style TEXT NOT NULL,
            from_emotion TEXT NOT NULL,
            to_emotion TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'PENDING',
            script TEXT,
            audio_url TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("Database tables initialized (settings, meditations)");

    Ok(())
}
