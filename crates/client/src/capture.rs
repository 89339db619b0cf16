//! Signature and stamp capture from image files.

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use sts_core::SignatureImage;

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("could not read image '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("unsupported image type '{}': expected png, jpg, jpeg, gif, webp or svg", path.display())]
    Unsupported { path: PathBuf },

    #[error("image '{}' is empty", path.display())]
    Empty { path: PathBuf },
}

/// MIME type for a supported image extension (case-insensitive).
pub fn mime_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "svg" => Some("image/svg+xml"),
        _ => None,
    }
}

pub fn encode_data_url(mime: &str, bytes: &[u8]) -> SignatureImage {
    SignatureImage::from_base64(mime, &STANDARD.encode(bytes))
}

/// Read an image file into a `data:<mime>;base64,...` signature value.
pub fn capture_image(path: &Path) -> Result<SignatureImage, CaptureError> {
    let mime = mime_for(path).ok_or_else(|| CaptureError::Unsupported {
        path: path.to_path_buf(),
    })?;
    let bytes = std::fs::read(path).map_err(|source| CaptureError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    if bytes.is_empty() {
        return Err(CaptureError::Empty {
            path: path.to_path_buf(),
        });
    }
    tracing::debug!(path = %path.display(), mime, bytes = bytes.len(), "captured image");
    Ok(encode_data_url(mime, &bytes))
}
