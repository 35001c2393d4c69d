use std::env;
use std::time::Duration;

/// Configuration for the proxy's logging system
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Custom log directory path (overrides auto-detection)
    pub custom_log_dir: Option<String>,

    /// Filter for console output (default: "plsdescribe=info,tts_proxy=info")
    pub console_log_level: String,

    /// Filter for the application log file (default: "info")
    pub file_log_level: String,

    /// Write access.log / application.log files at all (default: true)
    pub file_logging_enabled: bool,

    /// Enable the JSON access log (default: true)
    pub access_enabled: bool,

    /// Log retention in days (default: 14)
    pub retention_days: u32,

    /// Enable background cleanup task (default: true)
    pub enable_cleanup: bool,

    /// Slow request threshold in milliseconds (default: 5000)
    pub slow_request_threshold_ms: u64,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            custom_log_dir: None,
            console_log_level: "plsdescribe=info,tts_proxy=info".to_string(),
            file_log_level: "info".to_string(),
            file_logging_enabled: true,
            access_enabled: true,
            retention_days: 14,
            enable_cleanup: true,
            slow_request_threshold_ms: 5000,
        }
    }
}

fn parse_flag(value: &str) -> bool {
    value.to_lowercase() == "true"
}

impl LogConfig {
    /// Load logging configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(dir) = lookup("TTS_PROXY_LOG_DIR") {
            config.custom_log_dir = Some(dir);
        }

        if let Some(level) = lookup("RUST_LOG") {
            config.console_log_level = level;
        }

        if let Some(level) = lookup("TTS_PROXY_FILE_LOG_LEVEL") {
            config.file_log_level = level;
        }

        if let Some(val) = lookup("LOG_FILES_ENABLED") {
            config.file_logging_enabled = parse_flag(&val);
        }

        if let Some(val) = lookup("LOG_ACCESS_ENABLED") {
            config.access_enabled = parse_flag(&val);
        }

        // Zero would delete the files the appenders are still writing
        if let Some(days) = lookup("LOG_RETENTION_DAYS")
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|d| *d > 0)
        {
            config.retention_days = days;
        }

        if let Some(val) = lookup("LOG_ENABLE_CLEANUP") {
            config.enable_cleanup = parse_flag(&val);
        }

        if let Some(threshold) = lookup("LOG_SLOW_REQUEST_THRESHOLD_MS").and_then(|v| v.parse().ok())
        {
            config.slow_request_threshold_ms = threshold;
        }

        config
    }

    pub fn slow_request_threshold(&self) -> Duration {
        Duration::from_millis(self.slow_request_threshold_ms)
    }
}
