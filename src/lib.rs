//! # Hotel Booking Client
//!
//! Client library for the hotel reservation REST API: room catalog,
//! authentication and booking submission, orchestrated by a workflow
//! state machine.
//!
//! ## Architecture
//!
//! - **domain**: Rooms, bookings, users and sessions
//! - **application**: Session store, auth/catalog/booking clients, workflow controller
//! - **infrastructure**: HTTP transport (reqwest) and credential storage
//! - **notifications**: Session lifecycle events for the host application
//! - **shared**: Error taxonomy and input validation
//! - **client**: Bootstrap of the full stack from [`AppConfig`]

pub mod application;
pub mod client;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod notifications;
pub mod shared;

pub use client::{init_tracing, ClientHandle};
pub use config::{default_config_path, AppConfig};

pub use application::{
    AuthClient, AuthIntent, BookingClient, CatalogClient, SessionStore, SharedSessionStore,
    WorkflowController, WorkflowState,
};
pub use domain::{
    Booking, BookingId, BookingRequest, BookingStatus, Credential, PaymentStatus, Room, RoomId,
    RoomType, Session, StayPeriod, User, UserRole,
};
pub use notifications::{create_event_bus, EndReason, SessionEvent, SessionEvents, SharedEventBus};
pub use shared::{ApiError, ClientError, ClientResult};
