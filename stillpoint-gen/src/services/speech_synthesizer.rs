//! Speech-synthesis API client
//!
//! Sends the generated SSML script to the Google Cloud Text-to-Speech
//! REST endpoint and decodes the base64 audio payload.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

const TTS_BASE_URL: &str = "https://texttospeech.googleapis.com/v1/text:synthesize";
const VOICE_LANGUAGE_CODE: &str = "en-AU";
const VOICE_NAME: &str = "en-AU-Wavenet-A";
const SPEAKING_RATE: f64 = 0.85;
const USER_AGENT: &str = "Stillpoint/0.1.0 (https://github.com/stillpoint/stillpoint)";

/// Speech synthesis errors
#[derive(Debug, Error)]
pub enum SpeechSynthError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Audio decode error: {0}")]
    AudioDecodeError(String),
}

/// Seam for the speech-synthesis step so the pipeline can be exercised
/// without network access
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize the SSML script into encoded audio bytes
    async fn synthesize(&self, ssml: &str) -> Result<Vec<u8>, SpeechSynthError>;
}

// ----------------------------------------------------------------------------
// Request/response wire types
// ----------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeRequest<'a> {
    input: SynthesisInput<'a>,
    voice: VoiceSelection,
    audio_config: AudioConfig,
}

#[derive(Debug, Serialize)]
struct SynthesisInput<'a> {
    ssml: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceSelection {
    language_code: &'static str,
    name: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AudioConfig {
    audio_encoding: &'static str,
    speaking_rate: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeResponse {
    audio_content: Option<String>,
}

/// Google Cloud Text-to-Speech client
pub struct GoogleTtsClient {
    http_client: reqwest::Client,
    api_key: String,
}

impl GoogleTtsClient {
    pub fn new(api_key: String) -> Result<Self, SpeechSynthError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| SpeechSynthError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            api_key,
        })
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleTtsClient {
    async fn synthesize(&self, ssml: &str) -> Result<Vec<u8>, SpeechSynthError> {
        let url = format!("{}?key={}", TTS_BASE_URL, self.api_key);

        tracing::debug!(
            voice = VOICE_NAME,
            ssml_chars = ssml.len(),
            "Querying speech-synthesis API"
        );

        let response = self
            .http_client
            .post(&url)
            .json(&SynthesizeRequest {
                input: SynthesisInput { ssml },
                voice: VoiceSelection {
                    language_code: VOICE_LANGUAGE_CODE,
                    name: VOICE_NAME,
                },
                audio_config: AudioConfig {
                    audio_encoding: "MP3",
                    speaking_rate: SPEAKING_RATE,
                },
            })
            .send()
            .await
            .map_err(|e| SpeechSynthError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SpeechSynthError::ApiError(status.as_u16(), error_text));
        }

        let body: SynthesizeResponse = response
            .json()
            .await
            .map_err(|e| SpeechSynthError::ParseError(e.to_string()))?;

        let audio_base64 = body
            .audio_content
            .ok_or_else(|| SpeechSynthError::ParseError("Missing audioContent".to_string()))?;

        let audio = BASE64
            .decode(audio_base64.as_bytes())
            .map_err(|e| SpeechSynthError::AudioDecodeError(e.to_string()))?;

        tracing::info!(audio_bytes = audio.len(), "Voice track synthesized");

        Ok(audio)
    }
}
