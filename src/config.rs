//! Client configuration

use std::path::PathBuf;
use std::time::Duration;

/// Default backend address, matching the development server.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Where requests go and how long we wait for them.
///
/// The timeout is the only timing the client enforces; the session core
/// itself never cancels an in-flight call.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    /// Location for the persisted credential, if persistence is wanted.
    pub credentials_path: Option<PathBuf>,
}

impl ClientConfig {
    /// Build configuration from environment variables.
    ///
    /// `CONVERSE_API_BASE` overrides the backend address,
    /// `CONVERSE_TIMEOUT_SECS` the request timeout, and
    /// `CONVERSE_CREDENTIALS_PATH` the credential file location
    /// (default `$HOME/.converse/credentials.json`).
    pub fn from_env() -> Self {
        let base_url = std::env::var("CONVERSE_API_BASE")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let timeout = std::env::var("CONVERSE_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS), Duration::from_secs);

        let credentials_path = std::env::var("CONVERSE_CREDENTIALS_PATH")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var("HOME")
                    .ok()
                    .map(|home| PathBuf::from(home).join(".converse/credentials.json"))
            });

        Self {
            base_url,
            timeout,
            credentials_path,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            credentials_path: None,
        }
    }
}
