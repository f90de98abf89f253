//! Backend protocol layer
//!
//! Provides a common interface for the three request/response exchanges the
//! assistant backend offers: credential issuance, session negotiation, and
//! message exchange.

mod error;
mod http;
mod types;

pub use error::{ApiError, ApiErrorKind};
pub use http::HttpBackend;
pub use types::Credential;

use async_trait::async_trait;
use std::sync::Arc;

/// Common interface to the assistant backend.
///
/// Each method is a single attempt; retry policy belongs to the caller.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Exchange an identity claim for a bearer token and user identifier.
    async fn login(&self, email: &str) -> Result<Credential, ApiError>;

    /// Bind a user identifier to a fresh conversation session.
    async fn open_session(&self, user_id: &str) -> Result<String, ApiError>;

    /// Send one user message within a session and return the assistant reply.
    async fn send_message(
        &self,
        session_id: &str,
        token: &str,
        text: &str,
    ) -> Result<String, ApiError>;
}

#[async_trait]
impl<T: Backend + ?Sized> Backend for Arc<T> {
    async fn login(&self, email: &str) -> Result<Credential, ApiError> {
        (**self).login(email).await
    }

    async fn open_session(&self, user_id: &str) -> Result<String, ApiError> {
        (**self).open_session(user_id).await
    }

    async fn send_message(
        &self,
        session_id: &str,
        token: &str,
        text: &str,
    ) -> Result<String, ApiError> {
        (**self).send_message(session_id, token, text).await
    }
}
