//! Credential persistence
//!
//! The session controller treats persistence as a collaborator: the
//! credential is loaded at activation and cleared at teardown. Nothing in
//! the session core depends on a particular store, and a store failure
//! never fails the activation.

use crate::client::Credential;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use thiserror::Error;

/// Persistence failure; logged and otherwise ignored by the controller.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("credential store io error: {0}")]
    Io(#[from] io::Error),
    #[error("malformed credential file: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Where the credential lives between activations.
pub trait CredentialStore: Send + Sync {
    fn load(&self) -> Result<Option<Credential>, StoreError>;
    fn save(&self, credential: &Credential) -> Result<(), StoreError>;
    fn clear(&self) -> Result<(), StoreError>;
}

impl<T: CredentialStore + ?Sized> CredentialStore for Box<T> {
    fn load(&self) -> Result<Option<Credential>, StoreError> {
        (**self).load()
    }

    fn save(&self, credential: &Credential) -> Result<(), StoreError> {
        (**self).save(credential)
    }

    fn clear(&self) -> Result<(), StoreError> {
        (**self).clear()
    }
}

impl<T: CredentialStore + ?Sized> CredentialStore for std::sync::Arc<T> {
    fn load(&self) -> Result<Option<Credential>, StoreError> {
        (**self).load()
    }

    fn save(&self, credential: &Credential) -> Result<(), StoreError> {
        (**self).save(credential)
    }

    fn clear(&self) -> Result<(), StoreError> {
        (**self).clear()
    }
}

/// In-memory store; the default when persistence is not wanted.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    slot: Mutex<Option<Credential>>,
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Result<Option<Credential>, StoreError> {
        Ok(self.slot.lock().unwrap_or_else(std::sync::PoisonError::into_inner).clone())
    }

    fn save(&self, credential: &Credential) -> Result<(), StoreError> {
        *self
            .slot
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(credential.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self
            .slot
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = None;
        Ok(())
    }
}

/// File-backed store holding one JSON document.
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<Option<Credential>, StoreError> {
        let body = match std::fs::read_to_string(&self.path) {
            Ok(body) => body,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&body)?))
    }

    fn save(&self, credential: &Credential) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let body = serde_json::to_string_pretty(credential)?;
        std::fs::write(&self.path, body)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
