//! Generative-text API client
//!
//! Builds the meditation instruction from the record's enum fields and
//! calls the Gemini generateContent endpoint for an SSML script.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::models::Meditation;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const GEMINI_MODEL: &str = "gemini-1.5-flash-latest";
const USER_AGENT: &str = "Stillpoint/0.1.0 (https://github.com/stillpoint/stillpoint)";

/// Script generation errors
#[derive(Debug, Error)]
pub enum ScriptGenError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Empty response from model")]
    EmptyResponse,
}

/// Seam for the generative-text step so the pipeline can be exercised
/// without network access
#[async_trait]
pub trait ScriptGenerator: Send + Sync {
    /// Generate the SSML meditation script for one record
    async fn generate_script(&self, meditation: &Meditation) -> Result<String, ScriptGenError>;
}

// ----------------------------------------------------------------------------
// Request/response wire types
// ----------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Option<Vec<CandidatePart>>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Gemini generateContent client
pub struct GeminiScriptClient {
    http_client: reqwest::Client,
    api_key: String,
}

impl GeminiScriptClient {
    pub fn new(api_key: String) -> Result<Self, ScriptGenError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ScriptGenError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            api_key,
        })
    }
}

#[async_trait]
impl ScriptGenerator for GeminiScriptClient {
    async fn generate_script(&self, meditation: &Meditation) -> Result<String, ScriptGenError> {
        let prompt = build_script_prompt(meditation);
        let url = format!(
            "{}/{}:generateContent?key={}",
            GEMINI_BASE_URL, GEMINI_MODEL, self.api_key
        );

        tracing::debug!(
            meditation_id = %meditation.meditation_id,
            model = GEMINI_MODEL,
            "Querying generative-text API"
        );

        let response = self
            .http_client
            .post(&url)
            .json(&GenerateContentRequest {
                contents: vec![Content {
                    parts: vec![Part { text: prompt }],
                }],
            })
            .send()
            .await
            .map_err(|e| ScriptGenError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ScriptGenError::ApiError(status.as_u16(), error_text));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ScriptGenError::ParseError(e.to_string()))?;

        let raw = body
            .candidates
            .and_then(|c| c.into_iter().next())
            .and_then(|c| c.content)
            .and_then(|c| c.parts)
            .and_then(|p| p.into_iter().next())
            .and_then(|p| p.text)
            .ok_or(ScriptGenError::EmptyResponse)?;

        let script = sanitize_script(&raw);
        if script.trim().is_empty() {
            return Err(ScriptGenError::EmptyResponse);
        }

        tracing::info!(
            meditation_id = %meditation.meditation_id,
            script_chars = script.len(),
            "Meditation script generated"
        );

        Ok(script)
    }
}

/// Build the natural-language instruction for one meditation record
///
/// The structure (introduction / main body / conclusion, SSML-only
/// output, explicit breathwork) is fixed; the requester name, the
/// emotional transition, the expertise level and the style anchor are
/// interpolated from the record.
pub fn build_script_prompt(meditation: &Meditation) -> String {
    let name = &meditation.username;
    let from = meditation.from_emotion.label();
    let to = meditation.to_emotion.label();
    let expertise = meditation.expertise.label();
    let anchor = meditation.style.anchor_hint();

    format!(
        r#"Generate a personalized guided meditation for a {expertise} named {name}, helping them transform the feeling of {from} into a sense of {to}, using {anchor}.
Return ONLY the SSML content without any markdown formatting, starting with <speak> and ending with </speak> that can be fed into a TTS model.
The meditation should include:
1. Introduction:
- Start with a pause of 5 seconds using <break time="5s"/>.
- Instruct {name} to sit comfortably with a straight back, relaxed shoulders, eyes closed, hands in their lap, and a gentle smile.
- Begin with a deep exhalation to release tension, followed by a slow, deep inhalation.
- Repeat this breath cycle twice to help {name} settle in.
2. Main Body:
- Gently guide {name} to recognize and acknowledge the feeling of {from} without judgment.
- Provide steps for {name} to release {from} through breathwork and visualization.
- Incorporate a peaceful, natural setting (e.g., a forest, beach, or meadow) with vivid sensory details to create a calming atmosphere. Use the natural setting to give instructions for the user to feel {to}.
- Introduce a breathwork exercise (e.g., inhale for 4 seconds, hold for 2, exhale for 6) to help anchor {to}.
3. Conclusion:
- Invite {name} to gently return to their body and surroundings.
- Suggest that they wiggle their fingers and toes, take a final deep breath, and open their eyes when ready.
- Remind {name} to carry the sense of {to} with them as they continue their day.
Requirements:
- Follow a clear structure: introduction, main body, and conclusion.
- Use {name} sparingly for a personalized touch without overuse.
- Include vivid sensory details to enhance visualization.
- Provide explicit breathwork instructions.
- Use gentle, reassuring language to facilitate the emotional transition.
- The response should be a SSML script that can be fed into a TTS model.
Use SSML tags for:
- Pauses: <break time="Xs"/>
- Emphasis: <emphasis>important words</emphasis>
- Prosody: <prosody rate="slow">slower speech</prosody>
- Breathing space: <break time="3s"/>"#
    )
}

/// Strip markdown fencing the model sometimes wraps around the SSML
pub fn sanitize_script(raw: &str) -> String {
    raw.replace("```", "")
        .replace("xml", "")
        .replace("ssml", "")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        CreateMeditationRequest, MeditationExpertise, MeditationStyle, NegativeEmotion,
        PositiveEmotion,
    };

    fn sample_meditation() -> Meditation {
        Meditation::new(&CreateMeditationRequest {
            username: "aruna".to_string(),
            expertise: MeditationExpertise::Intermediate,
            style: MeditationStyle::Visualization,
            from_emotion: NegativeEmotion::Anger,
            to_emotion: PositiveEmotion::Acceptance,
        })
    }

    #[test]
    fn prompt_interpolates_record_fields() {
        let prompt = build_script_prompt(&sample_meditation());
        assert!(prompt.contains("intermediate named aruna"));
        assert!(prompt.contains("the feeling of anger"));
        assert!(prompt.contains("a sense of acceptance"));
        assert!(prompt.contains("guided imagery as the primary anchor"));
        assert!(prompt.contains("starting with <speak>"));
    }

    #[test]
    fn sanitize_strips_markdown_fencing() {
        let raw = "```ssml\n<speak>breathe in</speak>\n```";
        assert_eq!(sanitize_script(raw), "<speak>breathe in</speak>");
    }

    #[test]
    fn sanitize_keeps_clean_script_untouched() {
        let raw = "<speak><break time=\"5s\"/>settle in</speak>";
        assert_eq!(sanitize_script(raw), raw);
    }
}
