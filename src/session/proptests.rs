//! Property-based tests for the session state machine
//!
//! Drives the pure transition function through arbitrary command sequences
//! with arbitrary call outcomes and verifies the transcript shape and
//! single-flight invariants hold throughout.

use super::effect::Effect;
use super::event::Event;
use super::state::{Role, SessionState, Turn};
use super::transition::transition;
use crate::client::Credential;
use proptest::prelude::*;
use std::collections::VecDeque;

#[derive(Debug, Clone)]
enum Outcome {
    Ok(String),
    Fail(String),
}

#[derive(Debug, Clone)]
enum Action {
    Login {
        email: String,
        outcome: Outcome,
        session: Outcome,
    },
    Send {
        text: String,
        outcome: Outcome,
    },
    Logout,
}

/// Synchronous model of the controller: every call resolves immediately
/// with the scripted outcome.
struct Harness {
    state: SessionState,
    transcript: Vec<Turn>,
}

impl Harness {
    fn new() -> Self {
        Self {
            state: SessionState::Unauthenticated,
            transcript: Vec::new(),
        }
    }

    /// Dispatch a command event; rejected commands change nothing.
    fn dispatch(&mut self, event: Event) -> Option<VecDeque<Effect>> {
        match transition(&self.state, event) {
            Ok(result) => {
                self.state = result.new_state;
                Some(result.effects.into())
            }
            Err(_) => None,
        }
    }

    fn step(&mut self, event: Event, queue: &mut VecDeque<Effect>) {
        let result = transition(&self.state, event).expect("call resolutions are always accepted");
        self.state = result.new_state;
        queue.extend(result.effects);
    }

    fn drain(
        &mut self,
        mut queue: VecDeque<Effect>,
        login: Option<Outcome>,
        session: Option<Outcome>,
        send: Option<Outcome>,
    ) {
        while let Some(effect) = queue.pop_front() {
            match effect {
                Effect::AppendTurn { turn } => self.transcript.push(turn),
                Effect::StoreCredential { .. } | Effect::BindSession { .. } => {}
                Effect::ClearCredential => self.transcript.clear(),
                Effect::CallLogin { .. } => {
                    let event = match login.clone().expect("unexpected login call") {
                        Outcome::Ok(user_id) => Event::LoginSucceeded {
                            credential: Credential::new("token", user_id),
                        },
                        Outcome::Fail(message) => Event::LoginFailed { message },
                    };
                    self.step(event, &mut queue);
                }
                Effect::CallOpenSession { .. } => {
                    let event = match session.clone().expect("unexpected session call") {
                        Outcome::Ok(session_id) => Event::SessionOpened { session_id },
                        Outcome::Fail(message) => Event::SessionRefused { message },
                    };
                    self.step(event, &mut queue);
                }
                Effect::CallSendMessage { .. } => {
                    let event = match send.clone().expect("unexpected send call") {
                        Outcome::Ok(text) => Event::ReplyReceived { text },
                        Outcome::Fail(message) => Event::ExchangeFailed { message },
                    };
                    self.step(event, &mut queue);
                }
            }
        }
    }

    fn run(&mut self, action: Action) {
        match action {
            Action::Login {
                email,
                outcome,
                session,
            } => {
                if let Some(queue) = self.dispatch(Event::LoginRequested { email }) {
                    self.drain(queue, Some(outcome), Some(session.clone()), None);
                }
                // Credential adoption immediately triggers negotiation,
                // exactly as the controller does.
                if matches!(self.state, SessionState::Authenticated { .. }) {
                    if let Some(queue) = self.dispatch(Event::SessionRequested) {
                        self.drain(queue, None, Some(session), None);
                    }
                }
            }
            Action::Send { text, outcome } => {
                let before = self.transcript.len();
                match self.dispatch(Event::SendRequested { text }) {
                    Some(queue) => {
                        self.drain(queue, None, None, Some(outcome));
                        // One exchange is exactly one user turn plus one
                        // assistant turn, for every outcome.
                        assert_eq!(self.transcript.len(), before + 2);
                    }
                    None => assert_eq!(self.transcript.len(), before),
                }
            }
            Action::Logout => {
                if let Some(queue) = self.dispatch(Event::LogoutRequested) {
                    self.drain(queue, None, None, None);
                }
            }
        }
    }

    /// Invariants that must hold between commands.
    fn check(&self) {
        // Every call resolved synchronously, so nothing is left in flight.
        assert!(!self.state.is_pending(), "stuck pending in {:?}", self.state);
        assert_eq!(self.transcript.len() % 2, 0, "orphaned user turn");
        for pair in self.transcript.chunks(2) {
            assert_eq!(pair[0].role, Role::User);
            assert_eq!(pair[1].role, Role::Assistant);
        }
    }
}

fn arb_email() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z]{1,8}@example\\.com",
        Just(String::new()),
        Just("   ".to_string()),
    ]
}

fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9 ]{1,30}",
        Just(String::new()),
        Just(" \t".to_string()),
    ]
}

fn arb_outcome() -> impl Strategy<Value = Outcome> {
    prop_oneof![
        "[a-z0-9]{1,8}".prop_map(Outcome::Ok),
        "[a-z ]{1,12}".prop_map(Outcome::Fail),
    ]
}

fn arb_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        (arb_email(), arb_outcome(), arb_outcome()).prop_map(|(email, outcome, session)| {
            Action::Login {
                email,
                outcome,
                session,
            }
        }),
        (arb_text(), arb_outcome()).prop_map(|(text, outcome)| Action::Send { text, outcome }),
        Just(Action::Logout),
    ]
}

proptest! {
    #[test]
    fn prop_transcript_always_pairs_turns(
        actions in prop::collection::vec(arb_action(), 0..40)
    ) {
        let mut harness = Harness::new();
        for action in actions {
            harness.run(action);
            harness.check();
        }
    }

    #[test]
    fn prop_single_flight_holds_for_any_text(
        text1 in "[a-z]{1,10}",
        text2 in "[a-z]{1,10}",
    ) {
        let first = transition(
            &SessionState::SessionReady,
            Event::SendRequested { text: text1.clone() },
        ).unwrap();
        prop_assert_eq!(&first.new_state, &SessionState::Sending);
        prop_assert_eq!(
            &first.effects[0],
            &Effect::append_user(text1)
        );

        // The second send must be rejected while the first is outstanding.
        let second = transition(
            &first.new_state,
            Event::SendRequested { text: text2 },
        );
        prop_assert!(second.is_err());
    }

    #[test]
    fn prop_normalized_claim_reaches_the_wire(email in "[A-Za-z]{1,8}@Example\\.com") {
        let result = transition(
            &SessionState::Unauthenticated,
            Event::LoginRequested { email: format!("  {email} ") },
        ).unwrap();

        match &result.effects[0] {
            Effect::CallLogin { email: sent } => {
                prop_assert_eq!(sent, &email.trim().to_lowercase());
            }
            other => prop_assert!(false, "unexpected effect {:?}", other),
        }
    }
}
