pub mod cleanup;
pub mod config;
pub mod middleware;
pub mod paths;

use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub use config::LogConfig;
pub use middleware::{access_log_middleware, request_id_middleware, RequestId};

/// Keeps the non-blocking file writers alive; drop it only at shutdown
pub struct LogGuards {
    _guards: Vec<WorkerGuard>,
    log_dir: Option<PathBuf>,
}

impl LogGuards {
    /// Where the JSON log files are written, if file logging is on
    pub fn log_dir(&self) -> Option<&Path> {
        self.log_dir.as_deref()
    }
}

/// Directory for the JSON log files, or `None` when file logging is off
pub fn resolve_log_dir(config: &LogConfig) -> std::io::Result<Option<PathBuf>> {
    if !config.file_logging_enabled {
        return Ok(None);
    }
    paths::get_log_directory(config.custom_log_dir.as_deref()).map(Some)
}

/// Initialize the proxy's logging (console plus JSON files)
///
/// This sets up:
/// - Compact console logging filtered by `RUST_LOG`
/// - `access.log` (JSON) for the `access_log` target
/// - `application.log` (JSON) for everything else
/// - Daily rotation, with a background task removing expired files
pub fn init_logging(config: &LogConfig) -> Result<LogGuards, Box<dyn std::error::Error>> {
    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .compact()
        .with_filter(EnvFilter::new(&config.console_log_level));

    let Some(log_dir) = resolve_log_dir(config)? else {
        tracing_subscriber::registry().with(console_layer).try_init()?;
        return Ok(LogGuards {
            _guards: Vec::new(),
            log_dir: None,
        });
    };

    let access_appender = tracing_appender::rolling::daily(&log_dir, "access.log");
    let app_appender = tracing_appender::rolling::daily(&log_dir, "application.log");

    let (access_writer, access_guard) = tracing_appender::non_blocking(access_appender);
    let (app_writer, app_guard) = tracing_appender::non_blocking(app_appender);

    let access_filter = if config.access_enabled {
        EnvFilter::new("access_log=info")
    } else {
        EnvFilter::new("off")
    };
    let access_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(access_writer)
        .with_filter(access_filter);

    let app_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(app_writer)
        .with_filter(
            EnvFilter::new(&config.file_log_level).add_directive("access_log=off".parse()?),
        );

    tracing_subscriber::registry()
        .with(console_layer)
        .with(access_layer)
        .with(app_layer)
        .try_init()?;

    tracing::info!(log_dir = ?log_dir, "Logging initialized - access.log, application.log");

    if config.enable_cleanup {
        tokio::spawn(cleanup::cleanup_task(log_dir.clone(), config.retention_days));
        tracing::info!(
            "Log cleanup task started (retention: {} days)",
            config.retention_days
        );
    }

    Ok(LogGuards {
        _guards: vec![access_guard, app_guard],
        log_dir: Some(log_dir),
    })
}

/// Compact stderr logging for the CLI
///
/// Defaults to warnings only so log lines never interleave with the
/// description on stdout or with a screen reader.
pub fn init_cli_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("plsdescribe=warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}

/// Log platform-specific information on startup
pub fn log_platform_info() {
    tracing::info!(
        platform = std::env::consts::OS,
        architecture = std::env::consts::ARCH,
        version = env!("CARGO_PKG_VERSION"),
        "tts-proxy starting"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_logging_init_creates_custom_directory() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("custom_logs");

        let config = LogConfig {
            custom_log_dir: Some(log_path.to_str().unwrap().to_string()),
            enable_cleanup: false,
            ..LogConfig::default()
        };

        // A global subscriber may already be installed by another test;
        // the directory is created before that can fail.
        let _result = init_logging(&config);

        assert!(log_path.exists(), "Log directory should be created");
    }

    #[test]
    fn test_resolve_log_dir_disabled() {
        let config = LogConfig {
            file_logging_enabled: false,
            ..LogConfig::default()
        };
        assert_eq!(resolve_log_dir(&config).unwrap(), None);
    }

    #[test]
    fn test_resolve_log_dir_custom() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("proxy_logs");

        let config = LogConfig {
            custom_log_dir: Some(log_path.to_str().unwrap().to_string()),
            file_logging_enabled: true,
            ..LogConfig::default()
        };

        assert_eq!(resolve_log_dir(&config).unwrap(), Some(log_path.clone()));
        assert!(log_path.is_dir());
    }

    #[test]
    fn test_platform_info_logging() {
        log_platform_info();
    }
}
