//! Credential storage traits and implementations

mod file;
mod memory;
mod traits;

pub use file::FileCredentialStore;
pub use memory::InMemoryCredentialStore;
pub use traits::CredentialStore;
