use std::path::Path;

use crate::error::Result;

/// An image loaded once and attached to every request in a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInput {
    pub mime_type: &'static str,
    pub data: Vec<u8>,
}

impl ImageInput {
    pub fn new(mime_type: &'static str, data: Vec<u8>) -> Self {
        Self { mime_type, data }
    }

    pub async fn load(path: &Path) -> Result<Self> {
        let data = tokio::fs::read(path).await?;
        Ok(Self::new(mime_from_path(path), data))
    }
}

/// MIME type by file extension, case-insensitive
pub fn mime_from_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_mime_from_path() {
        assert_eq!(mime_from_path(Path::new("umap.png")), "image/png");
        assert_eq!(mime_from_path(Path::new("a/b/plot.JPG")), "image/jpeg");
        assert_eq!(mime_from_path(Path::new("plot.jpeg")), "image/jpeg");
        assert_eq!(mime_from_path(Path::new("plot.gif")), "image/gif");
        assert_eq!(mime_from_path(Path::new("plot.WebP")), "image/webp");
        assert_eq!(mime_from_path(Path::new("plot.bmp")), "image/bmp");
    }

    #[test]
    fn test_mime_unknown_extension() {
        assert_eq!(mime_from_path(Path::new("plot.tiff")), "application/octet-stream");
        assert_eq!(mime_from_path(Path::new("plot")), "application/octet-stream");
    }

    #[tokio::test]
    async fn test_load_reads_bytes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("plot.png");
        std::fs::write(&path, b"\x89PNG").unwrap();

        let image = ImageInput::load(&path).await.unwrap();
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.data, b"\x89PNG");
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let result = ImageInput::load(Path::new("/nonexistent/plot.png")).await;
        assert!(result.is_err());
    }
}
