//! Converse - terminal client for an assistant chat backend
//!
//! A line-oriented front end over the session state machine: forwards
//! `/login`, messages, and `/logout` into the controller and renders the
//! transcript as it grows.

use converse::client::HttpBackend;
use converse::config::ClientConfig;
use converse::session::{CommandError, SessionController, SessionState};
use converse::store::{CredentialStore, FileCredentialStore, MemoryCredentialStore};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "converse=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let config = ClientConfig::from_env();
    let backend = HttpBackend::new(&config)?;

    if let Err(e) = backend.health().await {
        tracing::warn!(error = %e, base_url = %config.base_url, "Backend health check failed");
    }

    let store: Box<dyn CredentialStore> = match &config.credentials_path {
        Some(path) => Box::new(FileCredentialStore::new(path.clone())),
        None => Box::new(MemoryCredentialStore::default()),
    };
    let mut controller = SessionController::new(backend, store);

    match controller.resume().await {
        Ok(true) => println!(
            "Resumed as {} (session {}).",
            controller.user_id().unwrap_or("unknown"),
            controller
                .session()
                .map_or("unknown", |s| s.session_id.as_str())
        ),
        Ok(false) => println!("Not logged in. Use /login <email> to start."),
        Err(e) => eprintln!("Could not resume: {e}"),
    }
    println!("Commands: /login <email>, /logout, /quit. Anything else is sent as a message.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim().to_string();

        if line == "/quit" {
            break;
        } else if line == "/logout" {
            controller.logout().await;
            println!("Logged out.");
        } else if let Some(email) = line.strip_prefix("/login ") {
            match controller.login(email).await {
                Ok(()) => println!(
                    "Session {} ready.",
                    controller
                        .session()
                        .map_or("unknown", |s| s.session_id.as_str())
                ),
                Err(e) => eprintln!("{e}"),
            }
        } else if !line.is_empty() {
            match controller.send(&line).await {
                Ok(()) => {
                    if let Some(turn) = controller.transcript().last() {
                        println!("assistant> {}", turn.text);
                    }
                }
                Err(CommandError::Empty) => {}
                Err(e) => eprintln!("{e}"),
            }
        }

        print_status(controller.state());
    }

    Ok(())
}

fn print_status(state: &SessionState) {
    let label = match state {
        SessionState::Unauthenticated | SessionState::Ended => "logged out",
        SessionState::Authenticating
        | SessionState::Authenticated { .. }
        | SessionState::SessionPending { .. } => "initializing",
        SessionState::SessionReady => "ready",
        SessionState::Sending => "waiting on assistant",
        SessionState::SessionFailed { .. } => "session failed; /login to retry",
    };
    println!("[{label}]");
}
