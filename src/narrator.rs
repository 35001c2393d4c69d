//! Speaking model output aloud: normalize, synthesize, play.

use async_trait::async_trait;
use tokio::sync::OnceCell;

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::playback::{Playback, PlaybackOutcome};
use crate::text_processing::markdown_to_ssml;
use crate::tts::{self, Synthesizer};

#[async_trait]
pub trait Speaker: Send + Sync {
    async fn speak(&self, text: &str) -> Result<PlaybackOutcome>;
}

/// Speaker backed by a TTS backend and the local player
///
/// The backend is built on first use, so a session that never speaks
/// does not need Google credentials or a reachable proxy.
pub struct Narrator {
    config: Option<ClientConfig>,
    backend: OnceCell<Box<dyn Synthesizer>>,
    playback: Playback,
    speaking_rate: f64,
}

impl Narrator {
    pub fn new(config: ClientConfig) -> Self {
        let speaking_rate = config.speaking_rate;
        Self {
            config: Some(config),
            backend: OnceCell::new(),
            playback: Playback::new(),
            speaking_rate,
        }
    }

    /// Use an already-built backend
    pub fn with_backend(backend: Box<dyn Synthesizer>, playback: Playback) -> Self {
        Self {
            config: None,
            backend: OnceCell::new_with(Some(backend)),
            playback,
            speaking_rate: 0.0,
        }
    }

    async fn backend(&self) -> Result<&dyn Synthesizer> {
        let backend = self
            .backend
            .get_or_try_init(|| async {
                match &self.config {
                    Some(config) => tts::from_config(config).await,
                    None => Err(Error::Config("no TTS backend configured".to_string())),
                }
            })
            .await?;
        Ok(backend.as_ref())
    }
}

#[async_trait]
impl Speaker for Narrator {
    async fn speak(&self, text: &str) -> Result<PlaybackOutcome> {
        let ssml = markdown_to_ssml(text);
        let backend = self.backend().await?;

        tracing::debug!(backend = backend.name(), ssml_len = ssml.len(), "Speaking");
        let audio = backend.synthesize(&ssml, self.speaking_rate).await?;

        self.playback.play_mp3(&audio).await
    }
}
