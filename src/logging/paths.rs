use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the log directory for the proxy
///
/// Resolution order:
/// 1. Custom directory from parameter (if provided)
/// 2. System-wide `/var/log/tts-proxy` when writable (Unix)
/// 3. Per-user location (`~/Library/Logs/tts-proxy` on macOS, XDG data dir elsewhere)
/// 4. Temp directory as last resort
pub fn get_log_directory(custom_dir: Option<&str>) -> Result<PathBuf, std::io::Error> {
    if let Some(dir) = custom_dir {
        return ensure_directory_exists(PathBuf::from(dir));
    }

    ensure_directory_exists(default_log_dir())
}

fn default_log_dir() -> PathBuf {
    if cfg!(unix) {
        let system_dir = PathBuf::from("/var/log/tts-proxy");
        if is_writable(&system_dir) || can_create(&system_dir) {
            return system_dir;
        }
    }

    if cfg!(target_os = "macos") {
        if let Some(home_dir) = dirs::home_dir() {
            return home_dir.join("Library").join("Logs").join("tts-proxy");
        }
    }

    if let Some(data_dir) = dirs::data_local_dir() {
        return data_dir.join("tts-proxy").join("logs");
    }

    env::temp_dir().join("tts-proxy-logs")
}

/// Check if a directory is writable
fn is_writable(path: &Path) -> bool {
    if !path.exists() {
        return false;
    }
    let test_file = path.join(".write_test");
    let writable = fs::write(&test_file, "test").is_ok();
    if writable {
        let _ = fs::remove_file(&test_file);
    }
    writable
}

/// Check if we can create a directory
fn can_create(path: &Path) -> bool {
    if path.exists() {
        return is_writable(path);
    }
    path.parent()
        .map(|parent| parent.exists() && is_writable(parent))
        .unwrap_or(false)
}

fn ensure_directory_exists(path: PathBuf) -> Result<PathBuf, std::io::Error> {
    if !path.exists() {
        fs::create_dir_all(&path)?;
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_directory_exists() {
        let temp_dir = TempDir::new().unwrap();
        let log_dir = temp_dir.path().join("logs").join("nested");

        let result = ensure_directory_exists(log_dir.clone());
        assert!(result.is_ok());
        assert!(log_dir.exists());
    }

    #[test]
    fn test_is_writable() {
        let temp_dir = TempDir::new().unwrap();
        assert!(is_writable(temp_dir.path()));
        assert!(!is_writable(&temp_dir.path().join("missing")));
    }

    #[test]
    fn test_can_create_under_writable_parent() {
        let temp_dir = TempDir::new().unwrap();
        assert!(can_create(&temp_dir.path().join("new_dir")));
    }

    #[test]
    fn test_custom_directory_override() {
        let temp_dir = TempDir::new().unwrap();
        let custom_path = temp_dir.path().join("custom_logs");

        let result = get_log_directory(Some(custom_path.to_str().unwrap())).unwrap();
        assert_eq!(result, custom_path);
        assert!(custom_path.exists());
    }
}
