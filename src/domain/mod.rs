pub mod booking;
pub mod room;
pub mod user;

// Re-export commonly used types
pub use booking::{
    parse_instant, total_price, Booking, BookingId, BookingRequest, BookingStatus, PaymentStatus,
    StayPeriod,
};
pub use room::{Room, RoomId, RoomType};
pub use user::{Credential, Session, User, UserRole};
