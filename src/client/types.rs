//! Shared backend types

use serde::{Deserialize, Serialize};

/// Bearer token and user identifier issued at login.
///
/// Created once per login and held for the lifetime of the activation; the
/// core defines no refresh or expiry semantics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub token: String,
    pub user_id: String,
}

impl Credential {
    pub fn new(token: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            user_id: user_id.into(),
        }
    }

    /// Both fields carry a value. A credential with an empty token or user
    /// id is never adopted, whatever the server's status code said.
    pub fn is_complete(&self) -> bool {
        !self.token.is_empty() && !self.user_id.is_empty()
    }
}
