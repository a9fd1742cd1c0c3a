//! Settings database operations
//!
//! Get/set accessors for the settings table following the key/value
//! pattern. The database is the authoritative API key source; env and
//! TOML are fallbacks resolved in crate::config.

use sqlx::{Pool, Sqlite};
use stillpoint_common::Result;

/// Get generative-text service API key from database
pub async fn get_gemini_api_key(db: &Pool<Sqlite>) -> Result<Option<String>> {
    get_setting(db, "gemini_api_key").await
}

/// Set generative-text service API key in database
pub async fn set_gemini_api_key(db: &Pool<Sqlite>, key: String) -> Result<()> {
    set_setting(db, "gemini_api_key", key).await
}

/// Get speech-synthesis service API key from database
pub async fn get_tts_api_key(db: &Pool<Sqlite>) -> Result<Option<String>> {
    get_setting(db, "tts_api_key").await
}

/// Set speech-synthesis service API key in database
pub async fn set_tts_api_key(db: &Pool<Sqlite>, key: String) -> Result<()> {
    set_setting(db, "tts_api_key", key).await
}

async fn get_setting(db: &Pool<Sqlite>, key: &str) -> Result<Option<String>> {
    let value: Option<String> =
        sqlx::query_scalar("SELECT value FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(db)
            .await?;
    Ok(value)
}

async fn set_setting(db: &Pool<Sqlite>, key: &str, value: String) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO settings (key, value) VALUES (?, ?)
        ON CONFLICT(key) DO UPDATE SET value = excluded.value
        "#,
    )
    .bind(key)
    .bind(value)
    .execute(db)
    .await?;
    Ok(())
}
