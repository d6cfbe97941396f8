pub mod booking;
pub mod catalog;
pub mod identity;
pub mod session;
pub mod workflow;

// Re-export key types for convenience
pub use booking::BookingClient;
pub use catalog::CatalogClient;
pub use identity::{AuthClient, AuthIntent};
pub use session::{SessionStore, SharedSessionStore};
pub use workflow::{WorkflowController, WorkflowState};
