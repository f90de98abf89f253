//! Effects produced by state transitions

use super::state::{Session, Turn};
use crate::client::Credential;

/// Effects to be executed after a state transition.
///
/// The three `Call*` variants suspend at the network boundary; their
/// resolutions come back as events. The rest mutate controller-owned data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Call `POST /auth/login`.
    CallLogin { email: String },

    /// Call `POST /api/init`.
    CallOpenSession { user_id: String },

    /// Call `POST /api/message` for the live session.
    CallSendMessage { text: String },

    /// Append a turn to the transcript.
    AppendTurn { turn: Turn },

    /// Adopt a credential: keep it in memory and persist it.
    StoreCredential { credential: Credential },

    /// Bind the freshly negotiated session.
    BindSession { session: Session },

    /// Drop credential, session, and transcript.
    ClearCredential,
}

impl Effect {
    pub fn append_user(text: impl Into<String>) -> Self {
        Effect::AppendTurn {
            turn: Turn::user(text),
        }
    }

    pub fn append_assistant(text: impl Into<String>) -> Self {
        Effect::AppendTurn {
            turn: Turn::assistant(text),
        }
    }
}
