/// Generative model used for plot descriptions
pub const MODEL: &str = "gemini-2.5-pro";

/// Generative Language REST API root
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Google Cloud Text-to-Speech REST endpoint
pub const TTS_ENDPOINT: &str = "https://texttospeech.googleapis.com/v1/text:synthesize";

/// OAuth scope requested from ambient Google credentials
pub const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

/// The single voice every synthesis request is pinned to
pub const VOICE_NAME: &str = "en-US-Wavenet-F";
pub const LANGUAGE_CODE: &str = "en-US";
pub const AUDIO_ENCODING: &str = "MP3";

/// Plaintext listen address when no TLS domain is configured
pub const DEFAULT_LISTEN_ADDR: &str = ":8080";

/// HTTPS port used with ACME certificates
pub const TLS_PORT: u16 = 443;

/// Where ACME account keys and certificates are cached
pub const DEFAULT_CERT_CACHE_DIR: &str = "/var/cache/tts-proxy/certs";

/// Default file the description is written to
pub const DEFAULT_OUTPUT_FILE: &str = "description.txt";

/// Audio is saved here when no player is available
pub const FALLBACK_AUDIO_FILE: &str = "description.mp3";

/// Upper bound on how much of an error body a proxy client echoes back
pub const MAX_ERROR_BODY_LEN: usize = 512;
