//! Room aggregate
//!
//! Rooms are owned by the backend; the client only reads them.

pub mod model;

pub use model::{Room, RoomId, RoomType};
