//! Server-Sent Events (SSE) for meditation status streaming
//!
//! One stream per record: the status page subscribes and re-renders
//! on each lifecycle event instead of polling.

use axum::{
    extract::{Path, State},
    response::sse::{Event, Sse},
};
use futures::stream::Stream;
use std::convert::Infallible;
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::AppState;

/// GET /meditations/{id}/events - SSE stream of lifecycle events
///
/// Streams events for exactly one record:
/// - MeditationCreated
/// - MeditationCompleted
/// - MeditationFailed
pub async fn meditation_event_stream(
    State(state): State<AppState>,
    Path(meditation_id): Path<Uuid>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    info!(meditation_id = %meditation_id, "New SSE client connected to meditation events");

    // Subscribe to event broadcast
    let mut rx = state.event_bus.subscribe();

    let stream = async_stream::stream! {
        // Send initial connected status so the page can show link state
        yield Ok(Event::default()
            .event("ConnectionStatus")
            .data("connected"));

        loop {
            tokio::select! {
                // Heartbeat every 15 seconds
                _ = tokio::time::sleep(Duration::from_secs(15)) => {
                    debug!("SSE: Sending heartbeat");
                    yield Ok(Event::default().comment("heartbeat"));
                }

                // Broadcast events, filtered to this record
                Ok(event) = rx.recv() => {
                    if event.meditation_id() != meditation_id {
                        continue;
                    }

                    let event_type = event.event_type().to_string();
                    match serde_json::to_string(&event) {
                        Ok(event_json) => {
                            debug!(meditation_id = %meditation_id, "SSE: Broadcasting event: {}", event_type);
                            yield Ok(Event::default()
                                .event(event_type)
                                .data(event_json));
                        }
                        Err(e) => {
                            warn!("SSE: Failed to serialize event {}: {}", event_type, e);
                        }
                    }
                }
            }
        }
    };

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("heartbeat"),
    )
}
