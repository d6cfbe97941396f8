//! Booking entities: the client-built request and the server-owned booking

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::stay::{deserialize_instant, deserialize_instant_opt, total_price, StayPeriod};
use crate::domain::room::{Room, RoomId};
use crate::domain::user::model::deserialize_opt_id;
use crate::shared::types::errors::{ClientError, ClientResult};

/// Backend booking identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingId(pub i64);

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for BookingId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// A booking request built from form input. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingRequest {
    room_id: RoomId,
    period: StayPeriod,
    total_price: Decimal,
}

impl BookingRequest {
    /// Price the stay from the room's nightly rate.
    pub fn new(room: &Room, period: StayPeriod) -> ClientResult<Self> {
        Ok(Self {
            room_id: room.id,
            period,
            total_price: total_price(room.price, &period)?,
        })
    }

    /// Request with an already computed total.
    pub fn with_total(room_id: RoomId, period: StayPeriod, total: Decimal) -> ClientResult<Self> {
        if total < Decimal::ZERO {
            return Err(ClientError::Validation(
                "total price must not be negative".into(),
            ));
        }
        Ok(Self {
            room_id,
            period,
            total_price: total,
        })
    }

    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    pub fn period(&self) -> &StayPeriod {
        &self.period
    }

    pub fn nights(&self) -> i64 {
        self.period.nights()
    }

    pub fn total_price(&self) -> Decimal {
        self.total_price
    }
}

/// Booking lifecycle status. Transitions are decided by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "confirmed" => Self::Confirmed,
            "cancelled" | "canceled" => Self::Cancelled,
            "completed" => Self::Completed,
            _ => Self::Pending,
        }
    }
}

impl From<String> for BookingStatus {
    fn from(s: String) -> Self {
        Self::from_str(&s)
    }
}

impl From<BookingStatus> for String {
    fn from(s: BookingStatus) -> Self {
        s.as_str().to_string()
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Payment state reported by the backend, when it tracks one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Refunded,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Refunded => "refunded",
            Self::Failed => "failed",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "paid" => Self::Paid,
            "refunded" => Self::Refunded,
            "failed" => Self::Failed,
            _ => Self::Pending,
        }
    }
}

impl From<String> for PaymentStatus {
    fn from(s: String) -> Self {
        Self::from_str(&s)
    }
}

impl From<PaymentStatus> for String {
    fn from(s: PaymentStatus) -> Self {
        s.as_str().to_string()
    }
}

/// A booking as owned by the backend; the client only observes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: BookingId,
    pub room_id: RoomId,
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    pub user_id: Option<String>,
    #[serde(alias = "checkIn", deserialize_with = "deserialize_instant")]
    pub start_date: DateTime<Utc>,
    #[serde(alias = "checkOut", deserialize_with = "deserialize_instant")]
    pub end_date: DateTime<Utc>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
    #[serde(default)]
    pub status: BookingStatus,
    #[serde(default)]
    pub payment_status: Option<PaymentStatus>,
    #[serde(default, deserialize_with = "deserialize_instant_opt")]
    pub cancellation_deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    pub cancellation_reason: Option<String>,
}

impl Booking {
    /// Pending or confirmed
    pub fn is_active(&self) -> bool {
        matches!(self.status, BookingStatus::Pending | BookingStatus::Confirmed)
    }

    pub fn period(&self) -> ClientResult<StayPeriod> {
        StayPeriod::new(self.start_date, self.end_date)
    }
}
