//! Pure state transition function

use super::effect::Effect;
use super::event::Event;
use super::state::{Session, SessionState};
use thiserror::Error;

/// Result of a state transition.
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: SessionState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: SessionState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Errors that can occur during transition.
///
/// All of them suppress the triggering command without touching state,
/// transcript, or network.
#[derive(Debug, Error)]
pub enum TransitionError {
    #[error("input is empty after trimming")]
    EmptyInput,
    #[error("an exchange is already in flight for this session")]
    Busy,
    #[error("invalid transition: {0}")]
    InvalidTransition(String),
}

/// Pure transition function.
///
/// Given the same state and event this always produces the same new state
/// and effects, with no I/O. Input normalization (trimming, lower-casing
/// the identity claim) happens here so every caller gets the same
/// precondition handling.
pub fn transition(
    state: &SessionState,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (state, event) {
        // Activation. A login after logout behaves exactly like a first
        // login: Ended holds nothing worth keeping.
        (
            SessionState::Unauthenticated | SessionState::Ended,
            Event::LoginRequested { email },
        ) => {
            let email = email.trim().to_lowercase();
            if email.is_empty() {
                return Err(TransitionError::EmptyInput);
            }
            Ok(TransitionResult::new(SessionState::Authenticating)
                .with_effect(Effect::CallLogin { email }))
        }

        (
            SessionState::Unauthenticated | SessionState::Ended,
            Event::ResumeRequested { credential },
        ) => {
            let user_id = credential.user_id.clone();
            Ok(TransitionResult::new(SessionState::Authenticated { user_id })
                .with_effect(Effect::StoreCredential { credential }))
        }

        (SessionState::Authenticating, Event::LoginSucceeded { credential }) => {
            let user_id = credential.user_id.clone();
            Ok(TransitionResult::new(SessionState::Authenticated { user_id })
                .with_effect(Effect::StoreCredential { credential }))
        }

        // The failure message is surfaced to the caller, never to the
        // transcript: no session exists yet.
        (SessionState::Authenticating, Event::LoginFailed { .. }) => {
            Ok(TransitionResult::new(SessionState::Unauthenticated))
        }

        // Session negotiation, exactly once per activation.
        (SessionState::Authenticated { user_id }, Event::SessionRequested) => {
            let user_id = user_id.clone();
            Ok(
                TransitionResult::new(SessionState::SessionPending {
                    user_id: user_id.clone(),
                })
                .with_effect(Effect::CallOpenSession { user_id }),
            )
        }

        (SessionState::SessionPending { user_id }, Event::SessionOpened { session_id }) => {
            let session = Session {
                session_id,
                user_id: user_id.clone(),
            };
            Ok(TransitionResult::new(SessionState::SessionReady)
                .with_effect(Effect::BindSession { session }))
        }

        (SessionState::SessionPending { .. }, Event::SessionRefused { message }) => {
            Ok(TransitionResult::new(SessionState::SessionFailed { message }))
        }

        // Message exchange.
        (SessionState::SessionReady, Event::SendRequested { text }) => {
            let text = text.trim().to_string();
            if text.is_empty() {
                return Err(TransitionError::EmptyInput);
            }
            Ok(TransitionResult::new(SessionState::Sending)
                .with_effect(Effect::append_user(text.clone()))
                .with_effect(Effect::CallSendMessage { text }))
        }

        // Single-flight: one outstanding exchange per session.
        (SessionState::Sending, Event::SendRequested { .. }) => Err(TransitionError::Busy),

        // An empty reply is a valid empty assistant turn.
        (SessionState::Sending, Event::ReplyReceived { text }) => {
            Ok(TransitionResult::new(SessionState::SessionReady)
                .with_effect(Effect::append_assistant(text)))
        }

        // The error surrogate keeps the one-user-turn-one-assistant-turn
        // shape: no user turn is ever left without a reply.
        (SessionState::Sending, Event::ExchangeFailed { message }) => {
            Ok(TransitionResult::new(SessionState::SessionReady)
                .with_effect(Effect::append_assistant(message)))
        }

        // Logout is reachable from every state.
        (_, Event::LogoutRequested) => {
            Ok(TransitionResult::new(SessionState::Ended).with_effect(Effect::ClearCredential))
        }

        (state, event) => Err(TransitionError::InvalidTransition(format!(
            "No transition from {state:?} with event {event:?}"
        ))),
    }
}
