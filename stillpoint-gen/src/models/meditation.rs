//! Meditation record and its enumerated fields
//!
//! The record lifecycle is three linear statuses:
//! PENDING → COMPLETED | FAILED, never reversed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Minimum requester name length (characters)
pub const USERNAME_MIN_LEN: usize = 3;
/// Maximum requester name length (characters)
pub const USERNAME_MAX_LEN: usize = 20;

/// Requester experience level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MeditationExpertise {
    Beginner,
    Intermediate,
    Advanced,
}

impl MeditationExpertise {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeditationExpertise::Beginner => "BEGINNER",
            MeditationExpertise::Intermediate => "INTERMEDIATE",
            MeditationExpertise::Advanced => "ADVANCED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "BEGINNER" => Some(MeditationExpertise::Beginner),
            "INTERMEDIATE" => Some(MeditationExpertise::Intermediate),
            "ADVANCED" => Some(MeditationExpertise::Advanced),
            _ => None,
        }
    }

    /// Lowercase form used in prompt text
    pub fn label(&self) -> &'static str {
        match self {
            MeditationExpertise::Beginner => "beginner",
            MeditationExpertise::Intermediate => "intermediate",
            MeditationExpertise::Advanced => "advanced",
        }
    }
}

/// Meditation style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MeditationStyle {
    Breath,
    Sound,
    Form,
    Visualization,
}

impl MeditationStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeditationStyle::Breath => "BREATH",
            MeditationStyle::Sound => "SOUND",
            MeditationStyle::Form => "FORM",
            MeditationStyle::Visualization => "VISUALIZATION",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "BREATH" => Some(MeditationStyle::Breath),
            "SOUND" => Some(MeditationStyle::Sound),
            "FORM" => Some(MeditationStyle::Form),
            "VISUALIZATION" => Some(MeditationStyle::Visualization),
            _ => None,
        }
    }

    /// Anchor technique woven into the prompt for this style
    pub fn anchor_hint(&self) -> &'static str {
        match self {
            MeditationStyle::Breath => "the breath as the primary anchor",
            MeditationStyle::Sound => "ambient sound as the primary anchor",
            MeditationStyle::Form => "body sensations as the primary anchor",
            MeditationStyle::Visualization => "guided imagery as the primary anchor",
        }
    }
}

/// Source emotion the user wants to move away from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NegativeEmotion {
    Anxiety,
    Fear,
    Guilt,
    Anger,
    Sadness,
}

impl NegativeEmotion {
    pub fn as_str(&self) -> &'static str {
        match self {
            NegativeEmotion::Anxiety => "ANXIETY",
            NegativeEmotion::Fear => "FEAR",
            NegativeEmotion::Guilt => "GUILT",
            NegativeEmotion::Anger => "ANGER",
            NegativeEmotion::Sadness => "SADNESS",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ANXIETY" => Some(NegativeEmotion::Anxiety),
            "FEAR" => Some(NegativeEmotion::Fear),
            "GUILT" => Some(NegativeEmotion::Guilt),
            "ANGER" => Some(NegativeEmotion::Anger),
            "SADNESS" => Some(NegativeEmotion::Sadness),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            NegativeEmotion::Anxiety => "anxiety",
            NegativeEmotion::Fear => "fear",
            NegativeEmotion::Guilt => "guilt",
            NegativeEmotion::Anger => "anger",
            NegativeEmotion::Sadness => "sadness",
        }
    }
}

/// Target emotion the user wants to arrive at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PositiveEmotion {
    Joy,
    Love,
    Peace,
    Gratitude,
    Acceptance,
}

impl PositiveEmotion {
    pub fn as_str(&self) -> &'static str {
        match self {
            PositiveEmotion::Joy => "JOY",
            PositiveEmotion::Love => "LOVE",
            PositiveEmotion::Peace => "PEACE",
            PositiveEmotion::Gratitude => "GRATITUDE",
            PositiveEmotion::Acceptance => "ACCEPTANCE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "JOY" => Some(PositiveEmotion::Joy),
            "LOVE" => Some(PositiveEmotion::Love),
            "PEACE" => Some(PositiveEmotion::Peace),
            "GRATITUDE" => Some(PositiveEmotion::Gratitude),
            "ACCEPTANCE" => Some(PositiveEmotion::Acceptance),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PositiveEmotion::Joy => "joy",
            PositiveEmotion::Love => "love",
            PositiveEmotion::Peace => "peace",
            PositiveEmotion::Gratitude => "gratitude",
            PositiveEmotion::Acceptance => "acceptance",
        }
    }
}

/// Record lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MeditationStatus {
    /// Created, pipeline not yet finished
    Pending,
    /// Pipeline finished, script and audio_url populated
    Completed,
    /// Pipeline aborted, script and audio_url null
    Failed,
}

impl MeditationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeditationStatus::Pending => "PENDING",
            MeditationStatus::Completed => "COMPLETED",
            MeditationStatus::Failed => "FAILED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(MeditationStatus::Pending),
            "COMPLETED" => Some(MeditationStatus::Completed),
            "FAILED" => Some(MeditationStatus::Failed),
            _ => None,
        }
    }

    /// Whether the status is terminal (no further transitions allowed)
    pub fn is_terminal(&self) -> bool {
        !matches!(self, MeditationStatus::Pending)
    }
}

/// POST /meditations request body
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMeditationRequest {
    pub username: String,
    pub expertise: MeditationExpertise,
    pub style: MeditationStyle,
    pub from_emotion: NegativeEmotion,
    pub to_emotion: PositiveEmotion,
}

impl CreateMeditationRequest {
    /// Validate field constraints serde cannot express
    ///
    /// Enum membership is already enforced during deserialization;
    /// only the name length needs a manual check.
    pub fn validate(&self) -> Result<(), String> {
        let len = self.username.trim().chars().count();
        if len < USERNAME_MIN_LEN {
            return Err(format!(
                "username must be at least {} characters",
                USERNAME_MIN_LEN
            ));
        }
        if len > USERNAME_MAX_LEN {
            return Err(format!(
                "username must be at most {} characters",
                USERNAME_MAX_LEN
            ));
        }
        Ok(())
    }
}

/// Persisted meditation record (one row per generation request)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meditation {
    /// Unique record identifier
    pub meditation_id: Uuid,
    /// Requester name
    pub username: String,
    /// Experience level
    pub expertise: MeditationExpertise,
    /// Meditation style
    pub style: MeditationStyle,
    /// Source emotion
    pub from_emotion: NegativeEmotion,
    /// Target emotion
    pub to_emotion: PositiveEmotion,
    /// Lifecycle status
    pub status: MeditationStatus,
    /// Generated SSML script (null until COMPLETED)
    pub script: Option<String>,
    /// Public URL of the mixed track (null until COMPLETED)
    pub audio_url: Option<String>,
    /// Record creation time
    pub created_at: DateTime<Utc>,
    /// Last mutation time
    pub updated_at: DateTime<Utc>,
}

impl Meditation {
    /// Create a new PENDING record from a validated creation request
    pub fn new(request: &CreateMeditationRequest) -> Self {
        let now = Utc::now();
        Self {
            meditation_id: Uuid::new_v4(),
            username: request.username.trim().to_string(),
            expertise: request.expertise,
            style: request.style,
            from_emotion: request.from_emotion,
            to_emotion: request.to_emotion,
            status: MeditationStatus::Pending,
            script: None,
            audio_url: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> CreateMeditationRequest {
        CreateMeditationRequest {
            username: "aruna".to_string(),
            expertise: MeditationExpertise::Beginner,
            style: MeditationStyle::Breath,
            from_emotion: NegativeEmotion::Anxiety,
            to_emotion: PositiveEmotion::Peace,
        }
    }

    #[test]
    fn new_record_is_pending_with_null_outputs() {
        let meditation = Meditation::new(&valid_request());
        assert_eq!(meditation.status, MeditationStatus::Pending);
        assert!(meditation.script.is_none());
        assert!(meditation.audio_url.is_none());
    }

    #[test]
    fn username_length_bounds() {
        let mut request = valid_request();
        request.username = "ab".to_string();
        assert!(request.validate().is_err());

        request.username = "abc".to_string();
        assert!(request.validate().is_ok());

        request.username = "a".repeat(USERNAME_MAX_LEN);
        assert!(request.validate().is_ok());

        request.username = "a".repeat(USERNAME_MAX_LEN + 1);
        assert!(request.validate().is_err());
    }

    #[test]
    fn whitespace_padding_does_not_satisfy_minimum() {
        let mut request = valid_request();
        request.username = "  a  ".to_string();
        assert!(request.validate().is_err());
    }

    #[test]
    fn enums_deserialize_from_uppercase() {
        let body = serde_json::json!({
            "username": "aruna",
            "expertise": "ADVANCED",
            "style": "VISUALIZATION",
            "from_emotion": "SADNESS",
            "to_emotion": "GRATITUDE",
        });
        let request: CreateMeditationRequest = serde_json::from_value(body).unwrap();
        assert_eq!(request.expertise, MeditationExpertise::Advanced);
        assert_eq!(request.style, MeditationStyle::Visualization);
    }

    #[test]
    fn unknown_enum_value_is_rejected() {
        let body = serde_json::json!({
            "username": "aruna",
            "expertise": "GURU",
            "style": "BREATH",
            "from_emotion": "ANXIETY",
            "to_emotion": "PEACE",
        });
        assert!(serde_json::from_value::<CreateMeditationRequest>(body).is_err());
    }

    #[test]
    fn status_round_trips_through_str() {
        for status in [
            MeditationStatus::Pending,
            MeditationStatus::Completed,
            MeditationStatus::Failed,
        ] {
            assert_eq!(MeditationStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(MeditationStatus::parse("CANCELLED"), None);
    }

    #[test]
    fn terminal_statuses() {
        assert!(!MeditationStatus::Pending.is_terminal());
        assert!(MeditationStatus::Completed.is_terminal());
        assert!(MeditationStatus::Failed.is_terminal());
    }
}
