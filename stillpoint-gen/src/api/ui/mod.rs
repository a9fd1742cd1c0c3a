//! UI Routes - HTML pages for the stillpoint-gen web interface
//!
//! Vanilla ES6+, no frameworks; pages are embedded in the binary.
//!
//! - **Request Form** (`form`): emotional-transition request form
//! - **Status Page** (`status`): real-time status via SSE + audio player
//! - **Settings Page** (`settings`): API key configuration

use axum::{routing::get, Router};

use crate::AppState;

mod form;
mod settings;
mod status;

use form::form_page;
use settings::settings_page;
use status::status_page;

/// Build UI routes
pub fn ui_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(form_page))
        .route("/meditations/:id/view", get(status_page))
        .route("/settings", get(settings_page))
}
