//! Room catalog entity

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Backend room identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub i64);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for RoomId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Room category
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RoomType {
    Basic,
    Premium,
    Suite,
    /// Any category the client does not know about yet
    Other(String),
}

impl RoomType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Basic => "Basic Room",
            Self::Premium => "Premium Room",
            Self::Suite => "Suite",
            Self::Other(name) => name,
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic room" | "basic" => Self::Basic,
            "premium room" | "premium" => Self::Premium,
            "suite" => Self::Suite,
            _ => Self::Other(s.to_string()),
        }
    }
}

impl From<String> for RoomType {
    fn from(s: String) -> Self {
        Self::from_str(&s)
    }
}

impl From<RoomType> for String {
    fn from(t: RoomType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A room as returned by the backend.
///
/// The client holds a possibly-stale copy; only
/// [`Room::mark_unavailable`] mutates it locally, and the next catalog
/// fetch replaces it with server truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: RoomId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_number: Option<String>,
    #[serde(rename = "type")]
    pub room_type: RoomType,
    /// Price per night
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Maximum number of guests
    #[serde(default)]
    pub capacity: u32,
    #[serde(default = "default_available")]
    pub available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn default_available() -> bool {
    true
}

impl Room {
    /// Optimistic toggle after a successful booking.
    pub fn mark_unavailable(&mut self) {
        self.available = false;
    }

    /// Price is never negative for a well-formed catalog entry.
    pub fn has_valid_price(&self) -> bool {
        self.price >= Decimal::ZERO
    }
}
