// Failure taxonomy for the messaging side.
//
// Token validation never fails (it answers false). Everything else surfaces
// one of these variants to the immediate caller.

use thiserror::Error;

/// Fallback message when Slack reports a failure without an error string.
pub const GENERIC_ERROR: &str = "An unexpected error occurred. Please try again.";

#[derive(Debug, Error)]
pub enum MessagingError {
    /// The request never produced a response.
    #[error("Slack request failed: {0}")]
    Transport(String),

    /// The request was blocked by a cross-origin policy somewhere between us
    /// and Slack. Same handling as a search failure, but callers can offer
    /// proxy guidance.
    #[error("Slack request blocked by a cross-origin (CORS) policy: {0}")]
    CrossOrigin(String),

    /// Non-2xx status or `ok: false` from search.messages.
    #[error("Slack search failed: {0}")]
    SearchFailure(String),

    /// The permalink has no extractable channel id / `p<digits>` token.
    #[error("Invalid message permalink: {0}")]
    InvalidPermalink(String),

    /// chat.delete did not go through: transport failure, non-2xx status
    /// or `ok: false`.
    #[error("Slack delete failed: {0}")]
    DeleteFailure(String),

    /// The response body wasn't the JSON shape we expected.
    #[error("Failed to decode Slack response: {0}")]
    Decode(String),
}

impl MessagingError {
    pub fn is_cross_origin(&self) -> bool {
        matches!(self, MessagingError::CrossOrigin(_))
    }

    /// Classify a transport-level failure message, splitting out CORS blocks.
    pub fn from_transport(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.to_ascii_lowercase().contains("cors") {
            MessagingError::CrossOrigin(message)
        } else {
            MessagingError::Transport(message)
        }
    }
}
