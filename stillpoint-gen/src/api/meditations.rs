//! Meditation API handlers
//!
//! POST /meditations, GET /meditations/{id}

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use stillpoint_common::events::StillpointEvent;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::{CreateMeditationRequest, Meditation};
use crate::services::{
    GeminiScriptClient, GenerationPipeline, GoogleTtsClient, MediaStore,
};
use crate::AppState;

/// POST /meditations
///
/// Validates the request, persists a PENDING record and returns it
/// with 201. The generation pipeline is spawned fire-and-forget; its
/// outcome reaches the client via the record and the SSE stream, never
/// via this response.
pub async fn create_meditation(
    State(state): State<AppState>,
    payload: Result<Json<CreateMeditationRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Meditation>)> {
    // Body problems (bad JSON, unknown enum value) surface as a
    // structured 400, same shape as the manual validation below
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    request.validate().map_err(ApiError::BadRequest)?;

    let meditation = Meditation::new(&request);
    crate::db::meditations::insert_meditation(&state.db, &meditation).await?;

    tracing::info!(
        meditation_id = %meditation.meditation_id,
        username = %meditation.username,
        from_emotion = meditation.from_emotion.as_str(),
        to_emotion = meditation.to_emotion.as_str(),
        "Meditation request created"
    );

    let _ = state.event_bus.emit(StillpointEvent::MeditationCreated {
        meditation_id: meditation.meditation_id,
        username: meditation.username.clone(),
        timestamp: meditation.created_at,
    });

    // Background generation task, fire-and-forget
    spawn_generation(state, meditation.clone());

    Ok((StatusCode::CREATED, Json(meditation)))
}

/// GET /meditations/{id}
///
/// Returns the persisted record, or 404 for an unknown identifier.
pub async fn get_meditation(
    State(state): State<AppState>,
    Path(meditation_id): Path<Uuid>,
) -> ApiResult<Json<Meditation>> {
    let meditation = crate::db::meditations::load_meditation(&state.db, meditation_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Meditation not found: {}", meditation_id)))?;

    Ok(Json(meditation))
}

/// Spawn the generation pipeline for a freshly created record
///
/// API clients are built per run so keys configured through the web
/// UI take effect without a restart. A failure to build the pipeline
/// (e.g. no key configured) is terminal for the record, like any
/// pipeline step failure.
fn spawn_generation(state: AppState, meditation: Meditation) {
    tokio::spawn(async move {
        let meditation_id = meditation.meditation_id;
        tracing::info!(meditation_id = %meditation_id, "Background generation task started");

        match build_pipeline(&state).await {
            Ok(pipeline) => pipeline.run(meditation).await,
            Err(e) => {
                tracing::error!(
                    meditation_id = %meditation_id,
                    error = %e,
                    "Generation pipeline could not be constructed"
                );
                *state.last_error.write().await = Some(e.to_string());
                crate::services::mark_generation_failed(
                    &state.db,
                    &state.event_bus,
                    meditation_id,
                )
                .await;
            }
        }
    });
}

async fn build_pipeline(state: &AppState) -> anyhow::Result<GenerationPipeline> {
    let gemini_key =
        crate::config::resolve_gemini_api_key(&state.db, &state.toml_config).await?;
    let tts_key = crate::config::resolve_tts_api_key(&state.db, &state.toml_config).await?;

    let script_generator = Arc::new(GeminiScriptClient::new(gemini_key)?);
    let synthesizer = Arc::new(GoogleTtsClient::new(tts_key)?);
    let media_store = MediaStore::new(state.config.media_dir(), state.config.base_url.clone());

    Ok(GenerationPipeline::new(
        state.db.clone(),
        state.event_bus.clone(),
        script_generator,
        synthesizer,
        media_store,
        state.config.work_dir(),
        state.config.background_track.clone(),
    ))
}

/// Build meditation routes
pub fn meditation_routes() -> Router<AppState> {
    Router::new()
        .route("/meditations", post(create_meditation))
        .route("/meditations/:id", get(get_meditation))
}
