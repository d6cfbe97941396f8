//! In-memory credential storage

use std::sync::RwLock;

use async_trait::async_trait;

use super::CredentialStore;
use crate::domain::Credential;
use crate::shared::StorageError;

/// In-memory credential slot for tests and ephemeral sessions.
/// Nothing survives the process.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    slot: RwLock<Option<Credential>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a credential already "persisted".
    pub fn with_credential(credential: Credential) -> Self {
        Self {
            slot: RwLock::new(Some(credential)),
        }
    }
}

fn poisoned() -> StorageError {
    StorageError::Unavailable("credential slot lock poisoned".into())
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn load(&self) -> Result<Option<Credential>, StorageError> {
        Ok(self.slot.read().map_err(|_| poisoned())?.clone())
    }

    async fn save(&self, credential: &Credential) -> Result<(), StorageError> {
        *self.slot.write().map_err(|_| poisoned())? = Some(credential.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        *self.slot.write().map_err(|_| poisoned())? = None;
        Ok(())
    }
}
