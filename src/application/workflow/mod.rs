//! Browse → authenticate → book state machine

pub mod controller;
pub mod state;

pub use controller::WorkflowController;
pub use state::WorkflowState;
