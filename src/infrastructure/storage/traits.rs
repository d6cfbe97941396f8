//! Credential storage trait

use async_trait::async_trait;

use crate::domain::Credential;
use crate::shared::StorageError;

/// Durable slot for the bearer credential.
///
/// Only the session store writes here.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Read the persisted credential, if any.
    async fn load(&self) -> Result<Option<Credential>, StorageError>;

    /// Replace the persisted credential.
    async fn save(&self, credential: &Credential) -> Result<(), StorageError>;

    /// Remove the persisted credential. Removing a missing one is not an error.
    async fn clear(&self) -> Result<(), StorageError>;
}
