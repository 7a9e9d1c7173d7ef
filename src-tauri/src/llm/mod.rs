//! LLM domain: font identification through Gemini with search grounding.
//!
//! Public API for the identification layer of Font Detective.
//! External code should only use the items exported here.
//!
//!   - request.rs: IdentificationRequest → generateContent body
//!   - gemini.rs: HTTP client + response parsing
//!   - extract.rs: grounding sources + display name heuristics
//!   - prompts.rs: system instruction, model, sample prompts

pub mod error;
pub mod extract;
pub mod gemini;
pub mod prompts;
pub mod request;
pub mod types;

pub use error::IdentifyError;
pub use gemini::GeminiClient;
pub use types::{IdentificationRequest, IdentificationResult, InlineImage, RequestError, SearchSource};

use std::future::Future;

/// Anything that can answer an identification request.
///
/// The shell only talks to this trait, so tests can swap in a stub.
pub trait FontIdentifier {
    fn identify(
        &self,
        request: &IdentificationRequest,
    ) -> impl Future<Output = Result<IdentificationResult, IdentifyError>> + Send;
}

/// Identify a font from a prompt and an optional base64 image.
///
/// The image is only attached when both payload and MIME type are given.
/// Input is validated and the API key resolved before anything is sent, so
/// blank input or a missing key fails without a network call.
pub async fn identify_font(
    text_prompt: &str,
    image_base64: Option<&str>,
    mime_type: Option<&str>,
) -> Result<IdentificationResult, IdentifyError> {
    let image = match (image_base64, mime_type) {
        (Some(data), Some(mime)) if !data.is_empty() && !mime.is_empty() => Some(InlineImage {
            data: data.to_string(),
            mime_type: mime.to_string(),
        }),
        _ => None,
    };
    let request = IdentificationRequest::new(text_prompt, image)?;

    let client = GeminiClient::from_env()?;
    client.identify(&request).await
}
