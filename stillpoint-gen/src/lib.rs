//! stillpoint-gen library interface for testing
//!
//! Exposes public APIs for integration testing

pub mod api;
pub mod audio;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;
use stillpoint_common::config::TomlConfig;
use stillpoint_common::events::EventBus;
use tokio::sync::RwLock;
use tower_http::services::ServeDir;

use crate::config::ServiceConfig;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Event bus for SSE broadcasting
    pub event_bus: EventBus,
    /// Resolved service configuration
    pub config: Arc<ServiceConfig>,
    /// TOML config, kept as the lowest-priority API key source
    pub toml_config: Arc<TomlConfig>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Last error for diagnostic purposes
    pub last_error: Arc<RwLock<Option<String>>>,
}

impl AppState {
    pub fn new(
        db: SqlitePool,
        event_bus: EventBus,
        config: ServiceConfig,
        toml_config: TomlConfig,
    ) -> Self {
        Self {
            db,
            event_bus,
            config: Arc::new(config),
            toml_config: Arc::new(toml_config),
            startup_time: Utc::now(),
            last_error: Arc::new(RwLock::new(None)),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    let media_dir = state.config.media_dir();

    Router::new()
        // UI routes (HTML pages)
        .merge(api::ui_routes())
        // API routes
        .merge(api::meditation_routes())
        .route("/meditations/:id/events", get(api::meditation_event_stream))
        .merge(api::settings_routes())
        .merge(api::health_routes())
        // Media library (finished tracks)
        .nest_service("/media", ServeDir::new(media_dir))
        .with_state(state)
}
