//! Infrastructure layer - external concerns

pub mod http;
pub mod storage;

pub use http::ApiClient;
pub use storage::{CredentialStore, FileCredentialStore, InMemoryCredentialStore};
