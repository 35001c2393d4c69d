pub mod constants;

use std::env;
use std::path::PathBuf;

use crate::error::{Error, Result};
use constants::{DEFAULT_CERT_CACHE_DIR, DEFAULT_LISTEN_ADDR};

/// Read an environment variable, treating a blank value as unset
///
/// Values are returned as configured; secrets must match byte for byte.
fn non_empty(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).filter(|v| !v.trim().is_empty())
}

fn env_lookup(key: &str) -> Option<String> {
    env::var(key).ok()
}

/// Turn a Go-style `:port` address into something `TcpListener::bind` accepts
pub fn normalize_listen_addr(addr: &str) -> String {
    if addr.starts_with(':') {
        format!("0.0.0.0{}", addr)
    } else {
        addr.to_string()
    }
}

/// Settings for the `tts-proxy` binary, read once at startup.
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    pub token: String,
    /// When set, the proxy serves HTTPS with ACME certificates for this domain only
    pub domain: Option<String>,
    pub listen_addr: String,
    pub cert_cache_dir: PathBuf,
    pub quota_project: Option<String>,
}

impl ProxyConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let token = non_empty(&lookup, "TTS_PROXY_TOKEN")
            .ok_or_else(|| Error::Config("TTS_PROXY_TOKEN must be set".to_string()))?;

        let listen_addr = non_empty(&lookup, "TTS_PROXY_ADDR")
            .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string());

        let cert_cache_dir = non_empty(&lookup, "TTS_PROXY_CERT_CACHE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CERT_CACHE_DIR));

        Ok(Self {
            token,
            domain: non_empty(&lookup, "TTS_PROXY_DOMAIN"),
            listen_addr: normalize_listen_addr(&listen_addr),
            cert_cache_dir,
            quota_project: non_empty(&lookup, "GOOGLE_CLOUD_PROJECT"),
        })
    }
}

/// Settings for the `plsdescribe` CLI.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub gemini_api_key: String,
    /// Base URL of a `tts-proxy`; selects the proxy backend when present
    pub proxy_url: Option<String>,
    pub proxy_token: Option<String>,
    pub quota_project: Option<String>,
    /// 0 means the backend default
    pub speaking_rate: f64,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let gemini_api_key = non_empty(&lookup, "GEMINI_API_KEY").ok_or_else(|| {
            Error::Config("GEMINI_API_KEY environment variable not set.".to_string())
        })?;

        let speaking_rate = non_empty(&lookup, "TTS_SPEAKING_RATE")
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|r| *r > 0.0)
            .unwrap_or(0.0);

        Ok(Self {
            gemini_api_key,
            proxy_url: non_empty(&lookup, "TTS_PROXY_URL"),
            proxy_token: non_empty(&lookup, "TTS_PROXY_TOKEN"),
            quota_project: non_empty(&lookup, "GOOGLE_CLOUD_PROJECT"),
            speaking_rate,
        })
    }
}
