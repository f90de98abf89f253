//! HTTP implementation of [`Backend`]

use super::{ApiError, Backend, Credential};
use crate::config::ClientConfig;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Shown when a login failure carries no `detail` field.
const LOGIN_FALLBACK: &str = "We could not complete your login request.";
/// Shown when session negotiation fails without a `detail` field.
const SESSION_FALLBACK: &str = "Could not initialize a chat session.";
/// Shown when a message exchange fails without a `detail` field.
const SEND_FALLBACK: &str = "Request failed";

/// Backend client speaking the JSON protocol over HTTP.
///
/// Created once and reused for the lifetime of the activation; the
/// underlying `reqwest::Client` maintains a connection pool.
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::transport(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Probe the backend's health endpoint.
    pub async fn health(&self) -> Result<(), ApiError> {
        let response = self
            .client
            .get(self.url("/health"))
            .send()
            .await
            .map_err(classify_send_error)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(ApiError::rejected(format!(
                "Health check returned HTTP {}",
                response.status()
            )))
        }
    }

    /// POST a JSON body and decode a JSON reply.
    ///
    /// Non-success statuses become [`ApiError::rejected`] carrying the
    /// server's `detail` field when present, else `fallback`.
    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
        bearer: Option<&str>,
        fallback: &str,
    ) -> Result<T, ApiError> {
        let mut request: RequestBuilder = self.client.post(self.url(path)).json(body);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(classify_send_error)?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::transport(format!("Failed to read response: {e}")))?;

        tracing::debug!(path, status = status.as_u16(), "Backend call resolved");

        if !status.is_success() {
            let detail = extract_detail(&body).unwrap_or_else(|| fallback.to_string());
            return Err(ApiError::rejected(detail));
        }

        serde_json::from_str(&body)
            .map_err(|e| ApiError::malformed(format!("Failed to parse response: {e}")))
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn login(&self, email: &str) -> Result<Credential, ApiError> {
        let resp: LoginResponse = self
            .post_json("/auth/login", &LoginRequest { email }, None, LOGIN_FALLBACK)
            .await?;
        let credential = Credential {
            token: resp.token,
            user_id: resp.user_id,
        };
        // A success body with an empty token or user id is as unusable as a
        // refusal; it must not be adopted.
        if !credential.is_complete() {
            return Err(ApiError::malformed(
                "Login response is missing a token or user id",
            ));
        }
        Ok(credential)
    }

    async fn open_session(&self, user_id: &str) -> Result<String, ApiError> {
        let resp: InitResponse = self
            .post_json("/api/init", &InitRequest { user_id }, None, SESSION_FALLBACK)
            .await?;
        if resp.session_id.is_empty() {
            return Err(ApiError::malformed(
                "Session response carries an empty session id",
            ));
        }
        Ok(resp.session_id)
    }

    async fn send_message(
        &self,
        session_id: &str,
        token: &str,
        text: &str,
    ) -> Result<String, ApiError> {
        let resp: MessageResponse = self
            .post_json(
                "/api/message",
                &MessageRequest {
                    session_id,
                    message: text,
                },
                Some(token),
                SEND_FALLBACK,
            )
            .await?;
        Ok(resp.reply)
    }
}

fn classify_send_error(e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::transport(format!("Request timeout: {e}"))
    } else if e.is_connect() {
        ApiError::transport(format!("Connection failed: {e}"))
    } else {
        ApiError::transport(format!("Request failed: {e}"))
    }
}

/// Pull the server's `detail` field out of a failure body.
fn extract_detail(body: &str) -> Option<String> {
    serde_json::from_str::<FailureBody>(body).ok()?.detail
}

// Wire types

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
    user_id: String,
}

#[derive(Debug, Serialize)]
struct InitRequest<'a> {
    user_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct InitResponse {
    session_id: String,
}

#[derive(Debug, Serialize)]
struct MessageRequest<'a> {
    session_id: &'a str,
    message: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    /// An empty reply is a valid empty assistant turn, not an error.
    #[serde(default)]
    reply: String,
}

#[derive(Debug, Deserialize)]
struct FailureBody {
    detail: Option<String>,
}
