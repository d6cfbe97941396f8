//! Notifications module
//!
//! Session lifecycle events for the host application. Instead of the
//! client navigating anywhere on a rejected credential, the host
//! subscribes and decides what to show.
//!
//! # Usage
//! ```ignore
//! use hotel_booking::notifications::{create_event_bus, EndReason};
//!
//! let event_bus = create_event_bus();
//! let mut events = event_bus.subscribe();
//!
//! while let Some(message) = events.recv().await {
//!     if message.event.end_reason() == Some(EndReason::Expired) {
//!         // show the login screen
//!     }
//! }
//! ```

pub mod event_bus;
pub mod events;

pub use event_bus::{create_event_bus, EventBus, SessionEvents, SharedEventBus};
pub use events::*;
