//! Session lifecycle state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions: user
//! intents and call resolutions are events, the transition function is pure,
//! and all I/O happens in the controller that drains the produced effects.

mod controller;
mod effect;
mod error;
pub mod event;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;
#[cfg(test)]
mod testing;

pub use controller::SessionController;
pub use effect::Effect;
pub use error::{ActivationError, CommandError};
pub use event::Event;
pub use state::{Role, Session, SessionState, Turn};
pub use transition::{transition, TransitionError, TransitionResult};
