//! # Case Image Loading
//!
//! Images are read into memory for a single delivery attempt and dropped on
//! every exit path. No file handle outlives the call.

use std::path::Path;
use tracing::{debug, warn};

use crate::errors::BotError;

/// Bytes needed by `image::guess_format`
const MIN_FORMAT_BYTES: usize = 8;

/// Image bytes ready to be uploaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageResource {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Read a case image, checking its size and format.
///
/// Any problem is reported as `BotError::MediaDelivery` so the caller can fall
/// back to a text-only message.
pub async fn load_image(path: &Path, max_bytes: u64) -> Result<ImageResource, BotError> {
    let metadata = tokio::fs::metadata(path).await.map_err(|e| {
        warn!(path = %path.display(), error = %e, "Case image is not accessible");
        BotError::MediaDelivery(format!("cannot access {}: {e}", path.display()))
    })?;

    if !metadata.is_file() {
        return Err(BotError::MediaDelivery(format!(
            "{} is not a file",
            path.display()
        )));
    }

    if metadata.len() > max_bytes {
        return Err(BotError::MediaDelivery(format!(
            "{} is {} bytes, limit is {max_bytes}",
            path.display(),
            metadata.len()
        )));
    }

    let bytes = tokio::fs::read(path).await.map_err(|e| {
        BotError::MediaDelivery(format!("cannot read {}: {e}", path.display()))
    })?;

    if !is_supported_image(&bytes) {
        return Err(BotError::MediaDelivery(format!(
            "{} is not a supported image",
            path.display()
        )));
    }

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "case.jpg".to_string());

    debug!(path = %path.display(), size = bytes.len(), "Case image loaded");

    Ok(ImageResource { file_name, bytes })
}

/// Whether the bytes look like a photo Telegram accepts
pub fn is_supported_image(bytes: &[u8]) -> bool {
    if bytes.len() < MIN_FORMAT_BYTES {
        return false;
    }

    match image::guess_format(bytes) {
        Ok(format) => matches!(
            format,
            image::ImageFormat::Png | image::ImageFormat::Jpeg | image::ImageFormat::WebP
        ),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const PNG_HEADER: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D];

    #[test]
    fn test_supported_formats() {
        assert!(is_supported_image(PNG_HEADER));
        assert!(is_supported_image(&[0xFF, 0xD8, 0xFF, 0xE0, 0, 0x10, b'J', b'F', b'I', b'F']));
        assert!(!is_supported_image(b"not an image at all"));
        assert!(!is_supported_image(&[0x89, b'P']));
    }

    #[tokio::test]
    async fn test_load_missing_image() {
        let result = load_image(Path::new("does/not/exist.png"), 1024).await;
        assert!(matches!(result, Err(BotError::MediaDelivery(_))));
    }

    #[tokio::test]
    async fn test_load_rejects_oversized_image() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(PNG_HEADER).unwrap();
        file.write_all(&[0u8; 64]).unwrap();

        let result = load_image(file.path(), 16).await;
        assert!(matches!(result, Err(BotError::MediaDelivery(_))));
    }

    #[tokio::test]
    async fn test_load_valid_image() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(PNG_HEADER).unwrap();

        let image = load_image(file.path(), 1024).await.unwrap();
        assert_eq!(image.bytes, PNG_HEADER);
        assert!(!image.file_name.is_empty());
    }
}
