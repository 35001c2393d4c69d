use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use super::Synthesizer;
use crate::config::constants::MAX_ERROR_BODY_LEN;
use crate::error::{Error, Result};
use crate::models::SynthesizeRequest;
use crate::utils::body::truncate_body;

/// Synthesizer that forwards to a `tts-proxy` over HTTP
///
/// Lets a machine without Google credentials speak through a shared
/// proxy using only the proxy's bearer token.
#[derive(Debug, Clone)]
pub struct ProxyTtsClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ProxyTtsClient {
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self> {
        let client = Client::builder().build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()),
        })
    }

    fn synthesize_url(&self) -> String {
        format!("{}/v1/synthesize", self.base_url)
    }
}

#[async_trait]
impl Synthesizer for ProxyTtsClient {
    async fn synthesize(&self, ssml: &str, speaking_rate: f64) -> Result<Vec<u8>> {
        let body = SynthesizeRequest::new(ssml, speaking_rate);

        tracing::debug!(
            url = %self.synthesize_url(),
            ssml_len = ssml.len(),
            "Sending synthesize request to proxy"
        );

        let mut request = self.client.post(self.synthesize_url()).json(&body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_connect() {
                Error::Http(format!("Cannot connect to TTS proxy: {}", e))
            } else {
                Error::Http(format!("proxy request: {}", e))
            }
        })?;

        let status = response.status();
        if status != StatusCode::OK {
            let text = response.text().await.unwrap_or_default();
            return Err(Error::ProxyStatus {
                status: status.as_u16(),
                body: truncate_body(&text, MAX_ERROR_BODY_LEN).to_string(),
            });
        }

        let audio = response.bytes().await?.to_vec();
        tracing::debug!(audio_size = audio.len(), "Proxy synthesis completed");
        Ok(audio)
    }

    fn name(&self) -> &'static str {
        "proxy"
    }
}
