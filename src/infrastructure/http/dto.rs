//! Wire types for the reservation API

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::domain::{BookingRequest, RoomId, StayPeriod, User, UserRole};
use crate::shared::ApiError;

#[derive(Debug, Serialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
    pub role: UserRole,
}

/// `POST /login` and `POST /register` response
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

impl From<&StayPeriod> for AvailabilityQuery {
    fn from(period: &StayPeriod) -> Self {
        Self {
            start_date: period.check_in(),
            end_date: period.check_out(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingDto {
    pub room_id: RoomId,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
}

impl From<&BookingRequest> for CreateBookingDto {
    fn from(request: &BookingRequest) -> Self {
        Self {
            room_id: request.room_id(),
            start_date: request.period().check_in(),
            end_date: request.period().check_out(),
            total_price: request.total_price(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelBookingDto {
    pub cancellation_reason: String,
}

/// List payloads arrive either as a bare array or wrapped in a named field.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListPayload<T> {
    Items(Vec<T>),
    Rooms { rooms: Vec<T> },
    Bookings { bookings: Vec<T> },
}

impl<T> ListPayload<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            ListPayload::Items(items)
            | ListPayload::Rooms { rooms: items }
            | ListPayload::Bookings { bookings: items } => items,
        }
    }
}

/// Decode a response body, unwrapping the `{ data, message }` envelope when
/// present.
pub fn decode_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    let value: Value = if body.iter().all(u8::is_ascii_whitespace) {
        Value::Null
    } else {
        serde_json::from_slice(body).map_err(|e| ApiError::Decode(e.to_string()))?
    };

    let payload = match value {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    };

    serde_json::from_value(payload).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Pull a human-readable message out of an error body.
pub fn error_message(body: &[u8]) -> Option<String> {
    if let Ok(Value::Object(map)) = serde_json::from_slice::<Value>(body) {
        for key in ["message", "error"] {
            if let Some(Value::String(msg)) = map.get(key) {
                if !msg.trim().is_empty() {
                    return Some(msg.clone());
                }
            }
        }
        return None;
    }
    let text = String::from_utf8_lossy(body).trim().to_string();
    (!text.is_empty() && text.len() <= 512).then_some(text)
}
