//! Generation pipeline
//!
//! Five delegated steps in fixed order: script generation → speech
//! synthesis → background mix → media publication → status write-back.
//! Any failure aborts the remaining steps and transitions the record
//! to FAILED with null outputs; errors are never surfaced to the
//! original caller because the pipeline runs after the 201 response.

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::sync::Arc;
use stillpoint_common::events::{EventBus, StillpointEvent};

use crate::models::Meditation;
use crate::services::{MediaStore, ScriptGenerator, SpeechSynthesizer, TrackMixer};

/// Orchestrates one generation run per meditation record
pub struct GenerationPipeline {
    db: SqlitePool,
    event_bus: EventBus,
    script_generator: Arc<dyn ScriptGenerator>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    mixer: TrackMixer,
    media_store: MediaStore,
    work_dir: PathBuf,
    background_track: PathBuf,
}

impl GenerationPipeline {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        db: SqlitePool,
        event_bus: EventBus,
        script_generator: Arc<dyn ScriptGenerator>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        media_store: MediaStore,
        work_dir: PathBuf,
        background_track: PathBuf,
    ) -> Self {
        Self {
            db,
            event_bus,
            script_generator,
            synthesizer,
            mixer: TrackMixer::new(),
            media_store,
            work_dir,
            background_track,
        }
    }

    /// Run the pipeline for one record
    ///
    /// One top-level catch: any step error logs, writes the terminal
    /// FAILED status and emits MeditationFailed. No retry.
    pub async fn run(&self, meditation: Meditation) {
        let meditation_id = meditation.meditation_id;

        match self.execute(&meditation).await {
            Ok((script, audio_url)) => {
                match crate::db::meditations::complete_meditation(
                    &self.db,
                    meditation_id,
                    &script,
                    &audio_url,
                )
                .await
                {
                    Ok(true) => {
                        tracing::info!(
                            meditation_id = %meditation_id,
                            audio_url = %audio_url,
                            "Meditation processed successfully"
                        );
                        let _ = self.event_bus.emit(StillpointEvent::MeditationCompleted {
                            meditation_id,
                            audio_url,
                            timestamp: chrono::Utc::now(),
                        });
                    }
                    Ok(false) => {
                        // Terminal state already written by an earlier run
                        tracing::warn!(
                            meditation_id = %meditation_id,
                            "Completion skipped: record no longer PENDING"
                        );
                    }
                    Err(e) => {
                        tracing::error!(
                            meditation_id = %meditation_id,
                            error = %e,
                            "Failed to persist COMPLETED status"
                        );
                    }
                }
            }
            Err(e) => {
                tracing::error!(
                    meditation_id = %meditation_id,
                    error = %e,
                    "Error processing meditation"
                );
                mark_generation_failed(&self.db, &self.event_bus, meditation_id).await;
            }
        }

        self.cleanup_work_files(meditation_id);
    }

    /// The five steps, aborted at the first error
    async fn execute(&self, meditation: &Meditation) -> Result<(String, String)> {
        let meditation_id = meditation.meditation_id;

        // Step 1: generative-text service → SSML script
        let script = self
            .script_generator
            .generate_script(meditation)
            .await
            .context("Script generation failed")?;

        // Step 2: speech-synthesis service → voice track
        let audio = self
            .synthesizer
            .synthesize(&script)
            .await
            .context("Speech synthesis failed")?;

        let voice_path = self.work_dir.join(format!("{}-guided-track.mp3", meditation_id));
        std::fs::create_dir_all(&self.work_dir)
            .with_context(|| format!("Failed to create work dir: {}", self.work_dir.display()))?;
        std::fs::write(&voice_path, &audio)
            .with_context(|| format!("Failed to write voice track: {}", voice_path.display()))?;

        // Step 3: mix with the fixed background track
        let mixed_path = self.work_dir.join(format!("{}-mixed-track.wav", meditation_id));
        self.mixer
            .mix_to_file(&voice_path, &self.background_track, &mixed_path)
            .context("Audio mixing failed")?;

        // Step 4: publish into the media library → public URL
        let audio_url = self
            .media_store
            .publish(&mixed_path)
            .context("Media publication failed")?;

        // Step 5 (the status write-back) happens in run() so the
        // terminal transition and event emission stay in one place
        Ok((script, audio_url))
    }

    /// Best-effort removal of per-meditation scratch files
    fn cleanup_work_files(&self, meditation_id: uuid::Uuid) {
        for name in [
            format!("{}-guided-track.mp3", meditation_id),
            format!("{}-mixed-track.wav", meditation_id),
        ] {
            let path = self.work_dir.join(name);
            if path.exists() {
                if let Err(e) = std::fs::remove_file(&path) {
                    tracing::debug!(path = %path.display(), error = %e, "Work file cleanup failed");
                }
            }
        }
    }
}

/// Write the terminal FAILED status and emit the failure event
///
/// Shared between the pipeline's top-level catch and the spawn path
/// (which can fail before a pipeline exists, e.g. missing API keys).
/// A record already in a terminal state is left untouched.
pub async fn mark_generation_failed(
    db: &SqlitePool,
    event_bus: &EventBus,
    meditation_id: uuid::Uuid,
) {
    match crate::db::meditations::fail_meditation(db, meditation_id).await {
        Ok(true) => {
            let _ = event_bus.emit(StillpointEvent::MeditationFailed {
                meditation_id,
                message: "Meditation generation failed".to_string(),
                timestamp: chrono::Utc::now(),
            });
        }
        Ok(false) => {
            tracing::warn!(
                meditation_id = %meditation_id,
                "Failure skipped: record no longer PENDING"
            );
        }
        Err(e) => {
            tracing::error!(
                meditation_id = %meditation_id,
                error = %e,
                "Failed to persist FAILED status"
            );
        }
    }
}
