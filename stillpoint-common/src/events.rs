//! Event types for the Stillpoint event system
//!
//! Provides shared event definitions and the EventBus used to fan
//! lifecycle changes out to SSE subscribers.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Stillpoint event types
///
/// Events are broadcast via EventBus and serialized for SSE transmission.
/// One event fires per lifecycle transition of a meditation record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StillpointEvent {
    /// Meditation record created, pipeline about to start
    ///
    /// Triggers:
    /// - SSE: status page shows the in-progress indicator
    MeditationCreated {
        /// Record UUID
        meditation_id: Uuid,
        /// Requester name
        username: String,
        /// When the record was created
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Generation pipeline finished successfully
    ///
    /// Triggers:
    /// - SSE: status page swaps to the audio player
    MeditationCompleted {
        /// Record UUID
        meditation_id: Uuid,
        /// Public URL of the mixed track
        audio_url: String,
        /// When the pipeline finished
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Generation pipeline failed at some step
    ///
    /// Triggers:
    /// - SSE: status page shows the failure message
    MeditationFailed {
        /// Record UUID
        meditation_id: Uuid,
        /// Human-readable failure summary (not surfaced step-by-step)
        message: String,
        /// When the pipeline gave up
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

impl StillpointEvent {
    /// Event type name used as the SSE event field
    pub fn event_type(&self) -> &str {
        match self {
            StillpointEvent::MeditationCreated { .. } => "MeditationCreated",
            StillpointEvent::MeditationCompleted { .. } => "MeditationCompleted",
            StillpointEvent::MeditationFailed { .. } => "MeditationFailed",
        }
    }

    /// Record UUID this event belongs to
    pub fn meditation_id(&self) -> Uuid {
        match self {
            StillpointEvent::MeditationCreated { meditation_id, .. }
            | StillpointEvent::MeditationCompleted { meditation_id, .. }
            | StillpointEvent::MeditationFailed { meditation_id, .. } => *meditation_id,
        }
    }
}

/// Broadcast bus for StillpointEvent
///
/// Thin wrapper around tokio::sync::broadcast. Emitting with no
/// subscribers is not an error worth propagating; callers ignore the
/// returned count when nobody is listening.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<StillpointEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with the given channel capacity
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<StillpointEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns the subscriber count, or an error if nobody is listening.
    pub fn emit(
        &self,
        event: StillpointEvent,
    ) -> std::result::Result<usize, broadcast::error::SendError<StillpointEvent>> {
        self.tx.send(event)
    }

    /// Configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
