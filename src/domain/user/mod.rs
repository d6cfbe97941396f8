//! User aggregate
//!
//! The authenticated identity and the session that carries it.

pub mod model;

pub use model::{Credential, Session, User, UserRole};
