//! Drives the session state machine and executes its effects
//!
//! One controller is one activation: it owns the state, the credential, the
//! session, and the transcript. Events go through the pure transition
//! function; the effects it produces are drained from a command queue, and
//! each network effect suspends on the backend and feeds its resolution
//! back in as a new event. Because a command runs to completion before the
//! next one is accepted, the transcript is never mutated concurrently.

use std::collections::VecDeque;

use super::error::{ActivationError, CommandError};
use super::event::Event;
use super::state::{Session, SessionState, Turn};
use super::transition::{transition, TransitionError};
use super::Effect;
use crate::client::{ApiError, Backend, Credential};
use crate::store::CredentialStore;

pub struct SessionController<B, S> {
    backend: B,
    store: S,
    state: SessionState,
    credential: Option<Credential>,
    session: Option<Session>,
    transcript: Vec<Turn>,
}

impl<B: Backend, S: CredentialStore> SessionController<B, S> {
    pub fn new(backend: B, store: S) -> Self {
        Self {
            backend,
            store,
            state: SessionState::Unauthenticated,
            credential: None,
            session: None,
            transcript: Vec::new(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn transcript(&self) -> &[Turn] {
        &self.transcript
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.credential.as_ref().map(|c| c.user_id.as_str())
    }

    /// Log in with an identity claim and negotiate a fresh session.
    ///
    /// Runs the whole activation: on success the machine is in
    /// `SessionReady`. An empty claim is suppressed without a network call.
    pub async fn login(&mut self, email: &str) -> Result<(), ActivationError> {
        self.activate(Event::LoginRequested {
            email: email.to_string(),
        })
        .await
    }

    /// Reactivate from a stored credential, skipping the login call.
    ///
    /// Returns `Ok(false)` when the store holds nothing. The session is
    /// still freshly negotiated; prior sessions are never resumed.
    pub async fn resume(&mut self) -> Result<bool, ActivationError> {
        let credential = match self.store.load() {
            Ok(Some(credential)) if credential.is_complete() => credential,
            Ok(Some(_)) => {
                tracing::warn!("Ignoring stored credential with empty fields");
                return Ok(false);
            }
            Ok(None) => return Ok(false),
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unreadable credential store");
                return Ok(false);
            }
        };
        self.activate(Event::ResumeRequested { credential })
            .await
            .map(|()| true)
    }

    /// Send one user message and wait for the assistant turn.
    ///
    /// Exchange failures are not `Err`: the server's detail (or a transport
    /// error message) is appended as the assistant turn and the machine
    /// returns to `SessionReady`. `Err` means the command was suppressed
    /// and neither transcript nor network were touched.
    pub async fn send(&mut self, text: &str) -> Result<(), CommandError> {
        self.drive(Event::SendRequested {
            text: text.to_string(),
        })
        .await
        .map_err(|e| match e {
            ActivationError::Rejected(TransitionError::EmptyInput) => CommandError::Empty,
            ActivationError::Rejected(TransitionError::Busy) => CommandError::Busy,
            _ => CommandError::NotReady,
        })
    }

    /// End the activation: clear credential, session, and transcript.
    pub async fn logout(&mut self) {
        // Logout is accepted from every state, so this cannot fail.
        if let Err(e) = self.drive(Event::LogoutRequested).await {
            tracing::warn!(error = %e, "Logout did not complete cleanly");
        }
    }

    /// Run an activation event through to `SessionReady` or a failure state.
    async fn activate(&mut self, event: Event) -> Result<(), ActivationError> {
        self.drive(event).await?;

        // Credential adoption parks the machine in Authenticated; session
        // negotiation is triggered immediately, never by the caller.
        if matches!(self.state, SessionState::Authenticated { .. }) {
            self.drive(Event::SessionRequested).await?;
        }
        Ok(())
    }

    /// Dispatch an event and drain the resulting effect queue.
    async fn drive(&mut self, event: Event) -> Result<(), ActivationError> {
        let mut queue: VecDeque<Effect> = VecDeque::new();
        let mut failure: Option<ActivationError> = None;

        self.step(event, &mut queue)?;

        while let Some(effect) = queue.pop_front() {
            match effect {
                Effect::AppendTurn { turn } => self.transcript.push(turn),

                Effect::StoreCredential { credential } => {
                    if let Err(e) = self.store.save(&credential) {
                        tracing::warn!(error = %e, "Could not persist credential");
                    }
                    self.credential = Some(credential);
                }

                Effect::BindSession { session } => {
                    tracing::info!(session_id = %session.session_id, "Session ready");
                    self.session = Some(session);
                }

                Effect::ClearCredential => {
                    if let Err(e) = self.store.clear() {
                        tracing::warn!(error = %e, "Could not clear stored credential");
                    }
                    self.credential = None;
                    self.session = None;
                    self.transcript.clear();
                }

                Effect::CallLogin { email } => {
                    let event = match self.backend.login(&email).await {
                        // A success resolution with an empty token or user
                        // id is treated as a failed login, whatever the
                        // backend claimed.
                        Ok(credential) if !credential.is_complete() => {
                            let message = "Login returned an incomplete credential".to_string();
                            failure = Some(ActivationError::Auth {
                                message: message.clone(),
                            });
                            Event::LoginFailed { message }
                        }
                        Ok(credential) => Event::LoginSucceeded { credential },
                        Err(e) => {
                            failure = Some(ActivationError::Auth {
                                message: e.message.clone(),
                            });
                            Event::LoginFailed { message: e.message }
                        }
                    };
                    self.step(event, &mut queue)?;
                }

                Effect::CallOpenSession { user_id } => {
                    let event = match self.backend.open_session(&user_id).await {
                        Ok(session_id) if session_id.is_empty() => {
                            let message = "Backend returned an empty session id".to_string();
                            failure = Some(ActivationError::Session {
                                message: message.clone(),
                            });
                            Event::SessionRefused { message }
                        }
                        Ok(session_id) => Event::SessionOpened { session_id },
                        Err(e) => {
                            failure = Some(ActivationError::Session {
                                message: e.message.clone(),
                            });
                            Event::SessionRefused { message: e.message }
                        }
                    };
                    self.step(event, &mut queue)?;
                }

                Effect::CallSendMessage { text } => {
                    let Some((session, credential)) =
                        self.session.as_ref().zip(self.credential.as_ref())
                    else {
                        // Unreachable while the machine's invariants hold:
                        // SessionReady is only entered after BindSession.
                        self.step(
                            Event::ExchangeFailed {
                                message: "No active session".to_string(),
                            },
                            &mut queue,
                        )?;
                        continue;
                    };

                    let session_id = session.session_id.clone();
                    let token = credential.token.clone();
                    let event = match self.backend.send_message(&session_id, &token, &text).await
                    {
                        Ok(reply) => Event::ReplyReceived { text: reply },
                        Err(e) => Event::ExchangeFailed {
                            message: exchange_error_text(&e),
                        },
                    };
                    self.step(event, &mut queue)?;
                }
            }
        }

        match failure {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn step(&mut self, event: Event, queue: &mut VecDeque<Effect>) -> Result<(), TransitionError> {
        let result = transition(&self.state, event)?;
        tracing::debug!(state = ?result.new_state, "Transition");
        self.state = result.new_state;
        queue.extend(result.effects);
        Ok(())
    }
}

/// Text of the synthetic assistant turn for a failed exchange.
///
/// Server rejections carry their own detail; failures with no response get
/// wrapped so the transcript explains what happened.
fn exchange_error_text(error: &ApiError) -> String {
    if error.kind.is_transport() {
        format!("There was a problem sending your message: {}", error.message)
    } else {
        error.message.clone()
    }
}
