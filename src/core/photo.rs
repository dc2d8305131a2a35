//! Photo ingestion: user-picked image file to an inline data URI.
//!
//! Alerts live in a single JSON file, so photos are size-capped at 2 MiB
//! before encoding.

use std::fs;
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use thiserror::Error;

pub const MAX_PHOTO_BYTES: u64 = 2 * 1024 * 1024;

#[derive(Error, Debug)]
pub enum PhotoError {
    #[error("a foto é muito grande ({size} bytes, máximo 2MB)")]
    TooLarge { size: u64 },
    #[error("falha ao ler a foto: {0}")]
    Io(#[from] std::io::Error),
}

/// Read the image at `path` and encode it as a `data:` URI.
pub fn photo_data_uri(path: &Path) -> Result<String, PhotoError> {
    let size = fs::metadata(path)?.len();
    if size > MAX_PHOTO_BYTES {
        return Err(PhotoError::TooLarge { size });
    }
    let bytes = fs::read(path)?;
    Ok(format!(
        "data:{};base64,{}",
        mime_for(path),
        STANDARD.encode(bytes)
    ))
}

fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}
