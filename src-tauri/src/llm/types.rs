//! Identification types: what the rest of the app sees.
//!
//! The Gemini wire format lives in request.rs (outbound) and gemini.rs
//! (inbound). These types are the normalized shapes the shell and the
//! frontend work with.

use serde::{Deserialize, Serialize};

/// A web page surfaced by the search-grounding step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSource {
    pub title: String,
    pub uri: String,
}

/// The normalized answer for one identification request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentificationResult {
    /// Full model answer, exactly as returned (markdown).
    pub analysis_text: String,
    /// Grounding sources in service order. Duplicates are kept.
    pub sources: Vec<SearchSource>,
    /// Best-effort display name taken from the first line of the answer.
    /// `None` when that line is empty after cleanup, not an empty string.
    pub identified_name: Option<String>,
}

/// Inline image payload. Data and MIME type always travel together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineImage {
    /// Base64 without the `data:` URL prefix.
    pub data: String,
    pub mime_type: String,
}

/// One identification submission: a text prompt plus an optional image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentificationRequest {
    text_prompt: String,
    image: Option<InlineImage>,
}

/// A request with neither a prompt nor an image.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    #[error("Please upload an image or describe a font.")]
    Empty,
}

impl IdentificationRequest {
    /// Build a request. A blank prompt is only allowed when an image is attached.
    pub fn new(
        text_prompt: impl Into<String>,
        image: Option<InlineImage>,
    ) -> Result<Self, RequestError> {
        let text_prompt = text_prompt.into();
        if text_prompt.trim().is_empty() && image.is_none() {
            return Err(RequestError::Empty);
        }
        Ok(Self { text_prompt, image })
    }

    pub fn text_prompt(&self) -> &str {
        &self.text_prompt
    }

    pub fn image(&self) -> Option<&InlineImage> {
        self.image.as_ref()
    }
}
