use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tokio::time::sleep;

/// Prefixes of the files written by the rolling appenders
const LOG_FILE_PREFIXES: [&str; 2] = ["access.log", "application.log"];

/// Background task that deletes rotated logs past the retention period
///
/// Runs once at startup and then every hour.
pub async fn cleanup_task(log_dir: PathBuf, retention_days: u32) {
    loop {
        match delete_old_logs(&log_dir, retention_days) {
            Ok(0) => tracing::debug!("Log cleanup: nothing to delete"),
            Ok(count) => tracing::info!(deleted = count, "Deleted expired log files"),
            Err(e) => tracing::error!(
                error = %e,
                log_dir = ?log_dir,
                "Log cleanup failed"
            ),
        }

        sleep(Duration::from_secs(3600)).await;
    }
}

fn is_log_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|name| LOG_FILE_PREFIXES.iter().any(|p| name.starts_with(p)))
        .unwrap_or(false)
}

/// Delete log files older than the retention period, returning how many were removed
///
/// A retention of zero is rejected: it would remove the files still being written.
/// Entries that cannot be inspected are skipped.
pub fn delete_old_logs(log_dir: &Path, retention_days: u32) -> io::Result<usize> {
    if retention_days == 0 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "log retention must be at least one day",
        ));
    }

    let retention = Duration::from_secs(retention_days as u64 * 86400);
    let cutoff_time = SystemTime::now()
        .checked_sub(retention)
        .unwrap_or(SystemTime::UNIX_EPOCH);

    let mut deleted = 0;
    for entry in fs::read_dir(log_dir)?.flatten() {
        let path = entry.path();

        if !path.is_file() || !is_log_file(&path) {
            continue;
        }

        let modified = match entry.metadata().and_then(|m| m.modified()) {
            Ok(modified) => modified,
            Err(e) => {
                tracing::warn!(path = ?path, error = %e, "Skipping log file");
                continue;
            }
        };
        if modified < cutoff_time {
            match fs::remove_file(&path) {
                Ok(()) => deleted += 1,
                Err(e) => tracing::warn!(path = ?path, error = %e, "Failed to delete old log"),
            }
        }
    }

    Ok(deleted)
}
