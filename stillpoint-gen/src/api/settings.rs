//! Settings API endpoints
//!
//! Lets the web UI configure the generative-text and speech-synthesis
//! API keys. The database is authoritative; writes are synced to the
//! TOML config best-effort.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Request payload for setting an API key
#[derive(Debug, Deserialize)]
pub struct SetApiKeyRequest {
    pub api_key: String,
}

/// Response payload for API key configuration
#[derive(Debug, Serialize)]
pub struct SetApiKeyResponse {
    pub success: bool,
    pub message: String,
}

/// GET /api/settings response, keys masked for display
#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub gemini_api_key: Option<String>,
    pub tts_api_key: Option<String>,
}

/// GET /api/settings
///
/// Returns which keys are configured, masked to their last 4 chars.
pub async fn get_settings(State(state): State<AppState>) -> ApiResult<Json<SettingsResponse>> {
    let gemini = crate::db::settings::get_gemini_api_key(&state.db).await?;
    let tts = crate::db::settings::get_tts_api_key(&state.db).await?;

    Ok(Json(SettingsResponse {
        gemini_api_key: gemini.as_deref().map(mask_key),
        tts_api_key: tts.as_deref().map(mask_key),
    }))
}

/// POST /api/settings/{key}
///
/// Accepted keys: `gemini_api_key`, `tts_api_key`.
///
/// 1. Validate key (non-empty, non-whitespace)
/// 2. Write to database (authoritative)
/// 3. Sync to TOML (best-effort backup)
pub async fn set_api_key(
    State(state): State<AppState>,
    Path(setting): Path<String>,
    Json(payload): Json<SetApiKeyRequest>,
) -> ApiResult<Json<SetApiKeyResponse>> {
    if !crate::config::is_valid_key(&payload.api_key) {
        return Err(ApiError::BadRequest(
            "API key cannot be empty or whitespace-only".to_string(),
        ));
    }

    match setting.as_str() {
        "gemini_api_key" => {
            crate::db::settings::set_gemini_api_key(&state.db, payload.api_key.clone()).await?
        }
        "tts_api_key" => {
            crate::db::settings::set_tts_api_key(&state.db, payload.api_key.clone()).await?
        }
        other => {
            return Err(ApiError::BadRequest(format!("Unknown setting: {}", other)));
        }
    }

    info!(setting = %setting, "API key configured via Web UI");

    // Sync to TOML (best-effort backup)
    match stillpoint_common::config::config_file_path() {
        Ok(toml_path) => {
            if let Err(e) = crate::config::sync_key_to_toml(&setting, &payload.api_key, &toml_path)
            {
                warn!("TOML sync failed (database write succeeded): {}", e);
            }
        }
        Err(e) => warn!("Could not determine TOML path: {}", e),
    }

    Ok(Json(SetApiKeyResponse {
        success: true,
        message: format!("{} saved", setting),
    }))
}

/// Mask a key down to its length and last 4 characters
fn mask_key(key: &str) -> String {
    let visible: String = key
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("****{}", visible)
}

/// Build settings routes
pub fn settings_routes() -> Router<AppState> {
    Router::new()
        .route("/api/settings", get(get_settings))
        .route("/api/settings/:setting", post(set_api_key))
}
