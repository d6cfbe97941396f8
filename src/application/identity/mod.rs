//! Identity module: authentication against the backend
//!
//! Contains the `AuthClient` which handles login, registration, logout
//! and recovery of a persisted session.

pub mod service;

pub use service::{AuthClient, AuthIntent};
