use async_trait::async_trait;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use super::Synthesizer;
use crate::config::constants::{
    AUDIO_ENCODING, CLOUD_PLATFORM_SCOPE, LANGUAGE_CODE, TTS_ENDPOINT, VOICE_NAME,
};
use crate::error::{Error, Result};

/// Example:
/// ```json
/// {
///   "input": { "ssml": "<speak>test</speak>" },
///   "voice": { "languageCode": "en-US", "name": "en-US-Wavenet-F" },
///   "audioConfig": { "audioEncoding": "MP3", "speakingRate": 1.2 }
/// }
/// ```
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SynthesizeSpeechRequest<'a> {
    pub input: SynthesisInput<'a>,
    pub voice: VoiceSelectionParams,
    pub audio_config: AudioConfig,
}

#[derive(Serialize, Debug)]
pub struct SynthesisInput<'a> {
    pub ssml: &'a str,
}

#[derive(Serialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VoiceSelectionParams {
    pub language_code: &'static str,
    pub name: &'static str,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AudioConfig {
    pub audio_encoding: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speaking_rate: Option<f64>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct SynthesizeSpeechResponse {
    audio_content: String,
}

#[derive(Deserialize, Debug)]
struct GoogleErrorEnvelope {
    error: GoogleErrorBody,
}

#[derive(Deserialize, Debug)]
struct GoogleErrorBody {
    message: String,
}

impl<'a> SynthesizeSpeechRequest<'a> {
    /// Voice and encoding are fixed; only the text and rate vary per call.
    pub fn new(ssml: &'a str, speaking_rate: f64) -> Self {
        Self {
            input: SynthesisInput { ssml },
            voice: VoiceSelectionParams {
                language_code: LANGUAGE_CODE,
                name: VOICE_NAME,
            },
            audio_config: AudioConfig {
                audio_encoding: AUDIO_ENCODING,
                speaking_rate: (speaking_rate > 0.0).then_some(speaking_rate),
            },
        }
    }
}

/// Decode the base64 `audioContent` of a successful response
fn decode_audio(body: &str) -> Result<Vec<u8>> {
    let response: SynthesizeSpeechResponse = serde_json::from_str(body)
        .map_err(|e| Error::Backend(format!("unexpected response: {}", e)))?;
    Ok(base64::engine::general_purpose::STANDARD.decode(response.audio_content)?)
}

/// Pull the human-readable message out of a Google API error body
fn error_message(status: u16, body: &str) -> String {
    match serde_json::from_str::<GoogleErrorEnvelope>(body) {
        Ok(envelope) => format!("{} ({})", envelope.error.message, status),
        Err(_) => format!("HTTP {}: {}", status, body.trim()),
    }
}

/// Google Cloud Text-to-Speech over REST, authenticated with ambient
/// application-default credentials.
#[derive(Clone)]
pub struct GoogleTts {
    client: reqwest::Client,
    credentials: Arc<dyn gcp_auth::TokenProvider>,
    quota_project: Option<String>,
    endpoint: String,
}

impl GoogleTts {
    pub async fn new(quota_project: Option<String>) -> Result<Self> {
        let credentials = gcp_auth::provider().await?;
        Ok(Self::with_credentials(credentials, quota_project))
    }

    pub fn with_credentials(
        credentials: Arc<dyn gcp_auth::TokenProvider>,
        quota_project: Option<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            credentials,
            quota_project,
            endpoint: TTS_ENDPOINT.to_string(),
        }
    }
}

impl fmt::Debug for GoogleTts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleTts")
            .field("quota_project", &self.quota_project)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

#[async_trait]
impl Synthesizer for GoogleTts {
    #[tracing::instrument(skip(self, ssml), fields(ssml_len = ssml.len()))]
    async fn synthesize(&self, ssml: &str, speaking_rate: f64) -> Result<Vec<u8>> {
        let token = self.credentials.token(&[CLOUD_PLATFORM_SCOPE]).await?;

        let mut request = self
            .client
            .post(&self.endpoint)
            .bearer_auth(token.as_str())
            .json(&SynthesizeSpeechRequest::new(ssml, speaking_rate));
        if let Some(project) = &self.quota_project {
            request = request.header("x-goog-user-project", project);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Backend(format!("synthesizing speech: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Backend(format!("reading response: {}", e)))?;

        if !status.is_success() {
            return Err(Error::Backend(error_message(status.as_u16(), &body)));
        }

        let audio = decode_audio(&body)?;
        tracing::debug!(audio_size = audio.len(), "Speech synthesized");
        Ok(audio)
    }

    fn name(&self) -> &'static str {
        "google"
    }
}
