//! Events that drive session transitions

use crate::client::Credential;

/// Events that trigger state transitions.
///
/// User intents come from the presentation layer; call resolutions are fed
/// back by the controller when a backend call completes.
#[derive(Debug, Clone)]
pub enum Event {
    // User intents
    LoginRequested { email: String },
    SendRequested { text: String },
    LogoutRequested,
    /// Reactivate from a previously stored credential, skipping login.
    ResumeRequested { credential: Credential },

    /// Synthesized by the controller as soon as a credential lands; the
    /// machine never lingers in `Authenticated`.
    SessionRequested,

    // Call resolutions
    LoginSucceeded { credential: Credential },
    LoginFailed { message: String },
    SessionOpened { session_id: String },
    SessionRefused { message: String },
    ReplyReceived { text: String },
    ExchangeFailed { message: String },
}
