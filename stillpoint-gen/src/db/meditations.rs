//! Meditation record database operations
//!
//! Terminal status writes are guarded with `WHERE status = 'PENDING'`
//! so a duplicate or late pipeline write can never overwrite a terminal
//! state. Records are never deleted.

use sqlx::{Row, SqlitePool};
use uuid::Uuid;
use stillpoint_common::{Error, Result};

use crate::models::{
    Meditation, MeditationExpertise, MeditationStatus, MeditationStyle, NegativeEmotion,
    PositiveEmotion,
};

/// Insert a freshly created PENDING record
pub async fn insert_meditation(pool: &SqlitePool, meditation: &Meditation) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO meditations (
            meditation_id, username, expertise, style,
            from_emotion, to_emotion, status, script, audio_url,
            created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(meditation.meditation_id.to_string())
    .bind(&meditation.username)
    .bind(meditation.expertise.as_str())
    .bind(meditation.style.as_str())
    .bind(meditation.from_emotion.as_str())
    .bind(meditation.to_emotion.as_str())
    .bind(meditation.status.as_str())
    .bind(&meditation.script)
    .bind(&meditation.audio_url)
    .bind(meditation.created_at.to_rfc3339())
    .bind(meditation.updated_at.to_rfc3339())
    .execute(pool)
    .await?;

    Ok(())
}

/// Load a meditation record by id
pub async fn load_meditation(pool: &SqlitePool, meditation_id: Uuid) -> Result<Option<Meditation>> {
    let row = sqlx::query(
        r#"
        SELECT meditation_id, username, expertise, style,
               from_emotion, to_emotion, status, script, audio_url,
               created_at, updated_at
        FROM meditations
        WHERE meditation_id = ?
        "#,
    )
    .bind(meditation_id.to_string())
    .fetch_optional(pool)
    .await?;

    row.map(meditation_from_row).transpose()
}

/// Transition PENDING → COMPLETED, writing script and audio URL
///
/// Returns false (and changes nothing) when the record is already in a
/// terminal state or does not exist.
pub async fn complete_meditation(
    pool: &SqlitePool,
    meditation_id: Uuid,
    script: &str,
    audio_url: &str,
) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE meditations
        SET status = 'COMPLETED', script = ?, audio_url = ?, updated_at = ?
        WHERE meditation_id = ? AND status = 'PENDING'
        "#,
    )
    .bind(script)
    .bind(audio_url)
    .bind(chrono::Utc::now().to_rfc3339())
    .bind(meditation_id.to_string())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Transition PENDING → FAILED, clearing script and audio URL
///
/// Returns false (and changes nothing) when the record is already in a
/// terminal state or does not exist.
pub async fn fail_meditation(pool: &SqlitePool, meditation_id: Uuid) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE meditations
        SET status = 'FAILED', script = NULL, audio_url = NULL, updated_at = ?
        WHERE meditation_id = ? AND status = 'PENDING'
        "#,
    )
    .bind(chrono::Utc::now().to_rfc3339())
    .bind(meditation_id.to_string())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

fn meditation_from_row(row: sqlx::sqlite::SqliteRow) -> Result<Meditation> {
    let meditation_id: String = row.get("meditation_id");
    let meditation_id = Uuid::parse_str(&meditation_id)
        .map_err(|e| Error::Internal(format!("Failed to parse meditation_id: {}", e)))?;

    let expertise: String = row.get("expertise");
    let expertise = MeditationExpertise::parse(&expertise)
        .ok_or_else(|| Error::Internal(format!("Unknown expertise value: {}", expertise)))?;

    let style: String = row.get("style");
    let style = MeditationStyle::parse(&style)
        .ok_or_else(|| Error::Internal(format!("Unknown style value: {}", style)))?;

    let from_emotion: String = row.get("from_emotion");
    let from_emotion = NegativeEmotion::parse(&from_emotion)
        .ok_or_else(|| Error::Internal(format!("Unknown from_emotion value: {}", from_emotion)))?;

    let to_emotion: String = row.get("to_emotion");
    let to_emotion = PositiveEmotion::parse(&to_emotion)
        .ok_or_else(|| Error::Internal(format!("Unknown to_emotion value: {}", to_emotion)))?;

    let status: String = row.get("status");
    let status = MeditationStatus::parse(&status)
        .ok_or_else(|| Error::Internal(format!("Unknown status value: {}", status)))?;

    let created_at: String = row.get("created_at");
    let created_at = chrono::DateTime::parse_from_rfc3339(&created_at)
        .map_err(|e| Error::Internal(format!("Failed to parse created_at: {}", e)))?
        .with_timezone(&chrono::Utc);

    let updated_at: String = row.get("updated_at");
    let updated_at = chrono::DateTime::parse_from_rfc3339(&updated_at)
        .map_err(|e| Error::Internal(format!("Failed to parse updated_at: {}", e)))?
        .with_timezone(&chrono::Utc);

    Ok(Meditation {
        meditation_id,
        username: row.get("username"),
        expertise,
        style,
        from_emotion,
        to_emotion,
        status,
        script: row.get("script"),
        audio_url: row.get("audio_url"),
        created_at,
        updated_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CreateMeditationRequest;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        crate::db::init_tables(&pool).await.unwrap();
        pool
    }

    fn sample_meditation() -> Meditation {
        Meditation::new(&CreateMeditationRequest {
            username: "aruna".to_string(),
            expertise: MeditationExpertise::Beginner,
            style: MeditationStyle::Breath,
            from_emotion: NegativeEmotion::Anxiety,
            to_emotion: PositiveEmotion::Peace,
        })
    }

    #[tokio::test]
    async fn insert_and_load_round_trip() {
        let pool = test_pool().await;
        let meditation = sample_meditation();
        insert_meditation(&pool, &meditation).await.unwrap();

        let loaded = load_meditation(&pool, meditation.meditation_id)
            .await
            .unwrap()
            .expect("record should exist");

        assert_eq!(loaded.username, "aruna");
        assert_eq!(loaded.status, MeditationStatus::Pending);
        assert_eq!(loaded.style, MeditationStyle::Breath);
        assert!(loaded.script.is_none());
        assert!(loaded.audio_url.is_none());
    }

    #[tokio::test]
    async fn load_unknown_id_is_none() {
        let pool = test_pool().await;
        assert!(load_meditation(&pool, Uuid::new_v4())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn complete_sets_outputs() {
        let pool = test_pool().await;
        let meditation = sample_meditation();
        insert_meditation(&pool, &meditation).await.unwrap();

        let transitioned = complete_meditation(
            &pool,
            meditation.meditation_id,
            "<speak>breathe</speak>",
            "http://127.0.0.1:5750/media/track.wav",
        )
        .await
        .unwrap();
        assert!(transitioned);

        let loaded = load_meditation(&pool, meditation.meditation_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.status, MeditationStatus::Completed);
        assert_eq!(loaded.script.as_deref(), Some("<speak>breathe</speak>"));
        assert!(loaded.audio_url.is_some());
    }

    #[tokio::test]
    async fn fail_clears_outputs() {
        let pool = test_pool().await;
        let meditation = sample_meditation();
        insert_meditation(&pool, &meditation).await.unwrap();

        assert!(fail_meditation(&pool, meditation.meditation_id)
            .await
            .unwrap());

        let loaded = load_meditation(&pool, meditation.meditation_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.status, MeditationStatus::Failed);
        assert!(loaded.script.is_none());
        assert!(loaded.audio_url.is_none());
    }

    #[tokio::test]
    async fn terminal_status_never_reverts() {
        let pool = test_pool().await;
        let meditation = sample_meditation();
        insert_meditation(&pool, &meditation).await.unwrap();

        assert!(
            complete_meditation(&pool, meditation.meditation_id, "<speak/>", "url")
                .await
                .unwrap()
        );

        // Late failure write must be a no-op
        assert!(!fail_meditation(&pool, meditation.meditation_id)
            .await
            .unwrap());
        // Duplicate completion must be a no-op too
        assert!(
            !complete_meditation(&pool, meditation.meditation_id, "other", "other")
                .await
                .unwrap()
        );

        let loaded = load_meditation(&pool, meditation.meditation_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.status, MeditationStatus::Completed);
        assert_eq!(loaded.script.as_deref(), Some("<speak/>"));
    }
}
