//! Backend error types

use thiserror::Error;

/// Backend call error with classification.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

impl ApiError {
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Transport, message)
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Rejected, message)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Malformed, message)
    }
}

/// Where a failed call went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// No response arrived (connection failure, timeout).
    Transport,
    /// The server answered with a non-success status.
    Rejected,
    /// The response body could not be interpreted.
    Malformed,
}

impl ApiErrorKind {
    /// The server never produced an answer for this call.
    pub fn is_transport(self) -> bool {
        matches!(self, Self::Transport)
    }
}
