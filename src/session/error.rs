//! Errors surfaced by the session controller

use super::transition::TransitionError;
use thiserror::Error;

/// Activation failures reported by `login` and `resume`.
///
/// These never reach the transcript: no session exists yet when they occur.
#[derive(Debug, Error)]
pub enum ActivationError {
    /// Login rejected or unreachable.
    #[error("login failed: {message}")]
    Auth { message: String },

    /// Session negotiation rejected or unreachable. The machine is left in
    /// `SessionFailed` and messaging stays blocked.
    #[error("session negotiation failed: {message}")]
    Session { message: String },

    /// The command was suppressed before any network call.
    #[error(transparent)]
    Rejected(#[from] TransitionError),
}

/// Send-side rejections.
///
/// Exchange failures are not errors at this level: they become the
/// assistant turn in the transcript instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("message is empty")]
    Empty,
    #[error("a message is already waiting on the assistant")]
    Busy,
    #[error("no session is ready for messaging")]
    NotReady,
}
