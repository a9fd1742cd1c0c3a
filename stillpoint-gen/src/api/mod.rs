//! HTTP API handlers for stillpoint-gen

pub mod health;
pub mod meditations;
pub mod settings;
pub mod sse;
pub mod ui;

pub use health::health_routes;
pub use meditations::meditation_routes;
pub use settings::settings_routes;
pub use sse::meditation_event_stream;
pub use ui::ui_routes;
