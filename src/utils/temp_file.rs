use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Automatically cleaned-up temporary file
pub struct TempFile {
    path: PathBuf,
}

impl TempFile {
    /// Reserve a unique path in the system temp directory with the given extension
    pub fn with_extension(extension: &str) -> Self {
        let path = std::env::temp_dir().join(format!("plsdescribe-{}.{}", Uuid::new_v4(), extension));
        Self { path }
    }

    /// Write `data` to a fresh temporary `.mp3` file
    pub fn write_mp3(data: &[u8]) -> std::io::Result<Self> {
        let temp = Self::with_extension("mp3");
        std::fs::write(temp.path(), data)?;
        Ok(temp)
    }

    /// Get the path to the temporary file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::debug!("Failed to cleanup temp file {:?}: {}", self.path, e);
            }
        }
    }
}
