//! Booking aggregate
//!
//! The client builds [`BookingRequest`]s; [`Booking`]s are owned by the
//! backend and only observed here.

pub mod model;
pub mod stay;

pub use model::{Booking, BookingId, BookingRequest, BookingStatus, PaymentStatus};
pub use stay::{parse_instant, total_price, StayPeriod};
