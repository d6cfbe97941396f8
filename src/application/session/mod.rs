pub mod store;

pub use store::{SessionStore, SharedSessionStore};
