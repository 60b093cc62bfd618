use thiserror::Error;

/// Errors surfaced by a messaging provider client.
///
/// Per-recipient callers turn these into status strings; they never abort
/// sibling recipients.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Transport-level failure (connect, TLS, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider rejected the request (auth, validation, unknown SID).
    /// `message` is the provider's own wording, shown to operators as-is.
    #[error("provider error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The response body could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),
}

impl ProviderError {
    /// The text shown next to a failed recipient: the provider's own
    /// wording for API rejections, the full error otherwise.
    pub fn recipient_text(&self) -> String {
        match self {
            ProviderError::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ProviderError>;
