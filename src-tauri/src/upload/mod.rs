//! Image upload domain: turns a picked or dropped file into a request payload.
//!
//! An `UploadedFile` only exists once the bytes are fully read and the
//! content is confirmed to be an image. Anything else is rejected before
//! it can reach the shell.

use std::path::{Path, PathBuf};

use base64::Engine;
use serde::Serialize;

use crate::llm::InlineImage;

/// Soft upload size guidance. Larger files are accepted with a warning.
pub const RECOMMENDED_MAX_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Please upload an image file (PNG, JPG, WebP), not {mime}")]
    Unsupported { mime: String },

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid image data: {0}")]
    Decode(#[from] base64::DecodeError),
}

/// A user-selected image, ready to attach to a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub file_name: String,
    /// `data:{mime};base64,{payload}` for the preview `<img>`.
    pub preview_url: String,
    /// Base64 without the data-URL prefix.
    #[serde(skip)]
    pub base64: String,
    pub mime_type: String,
    pub byte_len: usize,
}

impl UploadedFile {
    pub fn inline_image(&self) -> InlineImage {
        InlineImage {
            data: self.base64.clone(),
            mime_type: self.mime_type.clone(),
        }
    }

    /// Decode the payload back to the original bytes.
    pub fn decode(&self) -> Result<Vec<u8>, UploadError> {
        Ok(base64::engine::general_purpose::STANDARD.decode(&self.base64)?)
    }
}

/// Encode raw image bytes.
///
/// `declared_mime` is what the picker or browser reported. When present it
/// must be `image/*`. When absent the format is sniffed from the bytes.
pub fn encode_image(
    file_name: &str,
    bytes: &[u8],
    declared_mime: Option<&str>,
) -> Result<UploadedFile, UploadError> {
    let mime_type = match declared_mime.map(str::trim).filter(|m| !m.is_empty()) {
        Some(mime) if mime.to_ascii_lowercase().starts_with("image/") => mime.to_ascii_lowercase(),
        Some(mime) => {
            log::warn!("[UPLOAD] Rejected {}: {}", file_name, mime);
            return Err(UploadError::Unsupported {
                mime: mime.to_string(),
            });
        }
        None => sniff_mime(bytes).ok_or_else(|| {
            log::warn!("[UPLOAD] Rejected {}: not a recognizable image", file_name);
            UploadError::Unsupported {
                mime: "unknown".to_string(),
            }
        })?,
    };

    if bytes.len() > RECOMMENDED_MAX_BYTES {
        log::warn!(
            "[UPLOAD] {} is {} bytes, above the recommended {} bytes",
            file_name,
            bytes.len(),
            RECOMMENDED_MAX_BYTES
        );
    }

    let base64 = base64::engine::general_purpose::STANDARD.encode(bytes);
    let preview_url = format!("data:{};base64,{}", mime_type, base64);

    log::info!(
        "[UPLOAD] Encoded {} ({}, {} bytes)",
        file_name,
        mime_type,
        bytes.len()
    );

    Ok(UploadedFile {
        file_name: file_name.to_string(),
        preview_url,
        base64,
        mime_type,
        byte_len: bytes.len(),
    })
}

/// Encode a base64 payload received from the webview (drag-and-drop).
///
/// The payload may be a bare base64 string or a full `data:` URL.
pub fn encode_base64_image(
    file_name: &str,
    payload: &str,
    declared_mime: Option<&str>,
) -> Result<UploadedFile, UploadError> {
    let (url_mime, data) = split_data_url(payload);
    let bytes = base64::engine::general_purpose::STANDARD.decode(data.trim())?;
    encode_image(file_name, &bytes, declared_mime.or(url_mime))
}

/// Read and encode an image file. The extension decides the MIME type
/// when it is a known image format, otherwise the content is sniffed.
pub async fn load_image(path: &Path) -> Result<UploadedFile, UploadError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| UploadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    let declared = image::ImageFormat::from_path(path)
        .ok()
        .map(|f| f.to_mime_type());
    encode_image(&file_name, &bytes, declared)
}

fn sniff_mime(bytes: &[u8]) -> Option<String> {
    image::guess_format(bytes)
        .ok()
        .map(|format| format.to_mime_type().to_string())
}

/// `data:image/png;base64,AAAA` → (Some("image/png"), "AAAA").
fn split_data_url(payload: &str) -> (Option<&str>, &str) {
    let Some(rest) = payload.strip_prefix("data:") else {
        return (None, payload);
    };
    match rest.split_once(',') {
        Some((meta, data)) => {
            let mime = meta.split(';').next().filter(|m| !m.is_empty());
            (mime, data)
        }
        None => (None, payload),
    }
}
