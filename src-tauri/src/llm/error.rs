//! Identification errors.

/// Failure of a single identification attempt.
///
/// The `Display` text is what the shell shows the user, so service and
/// transport messages are carried through unmodified.
#[derive(Debug, thiserror::Error)]
pub enum IdentifyError {
    /// Neither a prompt nor an image. Never reaches the network.
    #[error(transparent)]
    Validation(#[from] super::types::RequestError),

    /// No credential or unusable configuration. Raised before any network call.
    #[error("{0}")]
    Configuration(String),

    /// The call succeeded but the model returned no text.
    #[error("No analysis received from Gemini.")]
    EmptyResponse,

    /// Transport failure, non-2xx status, or an unparseable body.
    #[error("{message}")]
    Service {
        status: Option<u16>,
        message: String,
    },
}

impl IdentifyError {
    pub fn service(message: impl Into<String>) -> Self {
        Self::Service {
            status: None,
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for IdentifyError {
    fn from(e: reqwest::Error) -> Self {
        Self::Service {
            status: e.status().map(|s| s.as_u16()),
            message: e.to_string(),
        }
    }
}
