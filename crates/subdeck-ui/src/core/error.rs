//! Failure taxonomy for backend calls.

use thiserror::Error;

/// Error raised by the REST client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Request never produced a response (network down, CORS, aborted).
    #[error("network request failed: {0}")]
    Transport(String),
    /// Request exceeded the fixed client timeout.
    #[error("request timed out after {0} ms")]
    Timeout(u32),
    /// Server answered with a non-2xx status.
    #[error("server returned {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Message from the envelope, or the status text.
        message: String,
    },
    /// Envelope carried `success: false`.
    #[error("request rejected: {message}")]
    Rejected {
        /// Message from the envelope.
        message: String,
    },
    /// Body was not a valid envelope for the expected payload.
    #[error("malformed response: {0}")]
    Decode(String),
    /// Envelope succeeded but omitted a required payload.
    #[error("response carried no data")]
    MissingData,
}

impl ApiError {
    /// Short, user-facing text for a transient notification.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Status { status: 401, .. } => "Authentication required".to_string(),
            Self::Status { status: 403, .. } => "Access denied".to_string(),
            Self::Status { status: 404, .. } => "Resource not found".to_string(),
            Self::Status { status, .. } if *status >= 500 => {
                "Server error. Please try again later.".to_string()
            }
            Self::Status { message, .. } | Self::Rejected { message } if !message.is_empty() => {
                message.clone()
            }
            Self::Timeout(_) => "Request timed out".to_string(),
            Self::Transport(detail) if !detail.is_empty() => detail.clone(),
            _ => "Request failed".to_string(),
        }
    }
}
