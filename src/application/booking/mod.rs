//! Booking submission and management

pub mod service;

pub use service::BookingClient;
