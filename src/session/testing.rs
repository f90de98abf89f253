//! Mock backend for controller tests
//!
//! Queued responses and recorded calls, no real I/O.

use crate::client::{ApiError, Backend, Credential};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// One backend call as the mock observed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    Login {
        email: String,
    },
    OpenSession {
        user_id: String,
    },
    SendMessage {
        session_id: String,
        token: String,
        text: String,
    },
}

/// Mock backend that replays queued results in order.
pub struct MockBackend {
    logins: Mutex<VecDeque<Result<Credential, ApiError>>>,
    sessions: Mutex<VecDeque<Result<String, ApiError>>>,
    replies: Mutex<VecDeque<Result<String, ApiError>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            logins: Mutex::new(VecDeque::new()),
            sessions: Mutex::new(VecDeque::new()),
            replies: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn queue_login(&self, result: Result<Credential, ApiError>) {
        self.logins.lock().unwrap().push_back(result);
    }

    pub fn queue_session(&self, result: Result<String, ApiError>) {
        self.sessions.lock().unwrap().push_back(result);
    }

    pub fn queue_reply(&self, result: Result<String, ApiError>) {
        self.replies.lock().unwrap().push_back(result);
    }

    pub fn recorded_calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn login(&self, email: &str) -> Result<Credential, ApiError> {
        self.calls.lock().unwrap().push(RecordedCall::Login {
            email: email.to_string(),
        });
        self.logins
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::transport("No mock login queued")))
    }

    async fn open_session(&self, user_id: &str) -> Result<String, ApiError> {
        self.calls.lock().unwrap().push(RecordedCall::OpenSession {
            user_id: user_id.to_string(),
        });
        self.sessions
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::transport("No mock session queued")))
    }

    async fn send_message(
        &self,
        session_id: &str,
        token: &str,
        text: &str,
    ) -> Result<String, ApiError> {
        self.calls.lock().unwrap().push(RecordedCall::SendMessage {
            session_id: session_id.to_string(),
            token: token.to_string(),
            text: text.to_string(),
        });
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::transport("No mock reply queued")))
    }
}
