//! Text-to-speech backends.
//!
//! Both backends turn an SSML document into MP3 bytes. The CLI picks one
//! when it starts; the proxy server always wraps the direct backend.

pub mod google;
pub mod proxy_client;

use async_trait::async_trait;

use crate::config::ClientConfig;
use crate::error::Result;

pub use google::GoogleTts;
pub use proxy_client::ProxyTtsClient;

/// Turn SSML into MP3 audio
///
/// `speaking_rate` of 0 (or below) asks for the backend default of 1.0.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    async fn synthesize(&self, ssml: &str, speaking_rate: f64) -> Result<Vec<u8>>;

    /// Short label for logs
    fn name(&self) -> &'static str;
}

/// Build the backend selected by `config`: the proxy when a URL is set,
/// otherwise Google Cloud TTS with ambient credentials.
pub async fn from_config(config: &ClientConfig) -> Result<Box<dyn Synthesizer>> {
    match &config.proxy_url {
        Some(url) => {
            tracing::debug!("Using TTS proxy at {}", url);
            Ok(Box::new(ProxyTtsClient::new(url, config.proxy_token.clone())?))
        }
        None => {
            tracing::debug!("Using Google Cloud TTS directly");
            Ok(Box::new(GoogleTts::new(config.quota_project.clone()).await?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_from_config_selects_proxy_backend() {
        let config = ClientConfig {
            gemini_api_key: "k".to_string(),
            proxy_url: Some("http://127.0.0.1:1".to_string()),
            proxy_token: Some("t".to_string()),
            quota_project: None,
            speaking_rate: 0.0,
        };

        let backend = from_config(&config).await.unwrap();
        assert_eq!(backend.name(), "proxy");
    }
}
