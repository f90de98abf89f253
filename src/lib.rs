//! Session-oriented client for an assistant chat backend
//!
//! Establishes an identity, negotiates a conversation session, and
//! exchanges ordered message turns over HTTP. The heart of the crate is
//! the [`session`] state machine; [`client`] speaks the wire protocol and
//! [`store`] handles optional credential persistence between activations.

pub mod client;
pub mod config;
pub mod session;
pub mod store;
