//! Session lifecycle state types

use serde::{Deserialize, Serialize};

/// Who produced a transcript turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

/// One message in the transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
        }
    }
}

/// A negotiated conversation session.
///
/// Exactly one live session per authenticated activation; session ids are
/// opaque to the client and never resumed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub session_id: String,
    pub user_id: String,
}

/// Lifecycle state of one client activation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionState {
    /// No credential; initial state.
    #[default]
    Unauthenticated,

    /// Login call in flight.
    Authenticating,

    /// Credential held, session not yet negotiated.
    Authenticated { user_id: String },

    /// Session negotiation in flight.
    SessionPending { user_id: String },

    /// Ready to accept one send command.
    SessionReady,

    /// Exactly one exchange in flight; further sends are rejected.
    Sending,

    /// Negotiation failed. Messaging stays blocked until a fresh activation;
    /// there is no automatic retry.
    SessionFailed { message: String },

    /// Logged out; credential, session, and transcript cleared.
    Ended,
}

impl SessionState {
    /// A network call is outstanding in this state.
    pub fn is_pending(&self) -> bool {
        matches!(
            self,
            SessionState::Authenticating
                | SessionState::SessionPending { .. }
                | SessionState::Sending
        )
    }

    /// The machine will accept a send command.
    pub fn can_send(&self) -> bool {
        matches!(self, SessionState::SessionReady)
    }
}
