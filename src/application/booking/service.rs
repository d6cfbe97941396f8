//! Booking client: availability check, submission and cancellation

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use reqwest::StatusCode;
use tracing::{info, warn};

use crate::domain::{Booking, BookingId, BookingRequest, Room, RoomId, StayPeriod};
use crate::infrastructure::http::dto::{
    AvailabilityQuery, CancelBookingDto, CreateBookingDto, ListPayload,
};
use crate::infrastructure::http::ApiClient;
use crate::shared::{validate_reason, ApiError, ClientError, ClientResult};

/// Booking client.
///
/// Remembers which (room, period) pairs the backend confirmed available
/// during this workflow instance; `create_booking` refuses anything else.
#[derive(Clone)]
pub struct BookingClient {
    api: ApiClient,
    confirmed: Arc<Mutex<HashSet<(RoomId, StayPeriod)>>>,
}

impl BookingClient {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            confirmed: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// `false` when the backend does not list the room as free for the
    /// whole period; only transport failures are errors.
    pub async fn check_availability(
        &self,
        room_id: RoomId,
        period: &StayPeriod,
    ) -> ClientResult<bool> {
        let query = AvailabilityQuery::from(period);
        let rooms: ListPayload<Room> = self
            .api
            .get_with_query("/rooms/available", &query)
            .await
            .map_err(booking_error)?;

        let available = rooms
            .into_vec()
            .iter()
            .any(|room| room.id == room_id && room.available);

        let key = (room_id, *period);
        let mut confirmed = self.confirmed.lock().unwrap_or_else(|e| e.into_inner());
        if available {
            confirmed.insert(key);
        } else {
            confirmed.remove(&key);
        }
        Ok(available)
    }

    /// Submit a booking.
    ///
    /// A 409 is reported as [`ClientError::BookingConflict`]: another client
    /// took the room between the availability check and this call.
    pub async fn create_booking(&self, request: &BookingRequest) -> ClientResult<Booking> {
        let key = (request.room_id(), *request.period());
        let was_confirmed = self
            .confirmed
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&key);
        if !was_confirmed {
            return Err(ClientError::Validation(format!(
                "availability of room {} for the selected dates was not confirmed",
                request.room_id()
            )));
        }

        let body = CreateBookingDto::from(request);
        let result: Result<Booking, ApiError> = self.api.post("/bookings", &body).await;

        match result {
            Ok(booking) => {
                info!(
                    booking_id = %booking.id,
                    room_id = %booking.room_id,
                    nights = request.nights(),
                    total = %booking.total_price,
                    "Booking created"
                );
                Ok(booking)
            }
            Err(e) => {
                if e.status() == Some(StatusCode::CONFLICT) {
                    warn!(room_id = %request.room_id(), "Booking conflict, room taken meanwhile");
                    return Err(ClientError::BookingConflict(e.message()));
                }
                Err(booking_error(e))
            }
        }
    }

    pub async fn cancel_booking(&self, booking_id: BookingId, reason: &str) -> ClientResult<Booking> {
        let body = CancelBookingDto {
            cancellation_reason: validate_reason(reason)?.to_string(),
        };
        let booking: Booking = self
            .api
            .put(&format!("/bookings/{booking_id}/cancel"), &body)
            .await
            .map_err(|e| owned_booking_error(booking_id, e))?;

        info!(booking_id = %booking.id, status = %booking.status, "Booking cancelled");
        Ok(booking)
    }

    /// The signed-in user's bookings.
    pub async fn list_bookings(&self) -> ClientResult<Vec<Booking>> {
        let bookings: ListPayload<Booking> =
            self.api.get("/bookings").await.map_err(booking_error)?;
        Ok(bookings.into_vec())
    }

    pub async fn get_booking(&self, booking_id: BookingId) -> ClientResult<Booking> {
        self.api
            .get(&format!("/bookings/{booking_id}"))
            .await
            .map_err(|e| owned_booking_error(booking_id, e))
    }
}

fn owned_booking_error(booking_id: BookingId, error: ApiError) -> ClientError {
    match error.status() {
        Some(StatusCode::NOT_FOUND) => ClientError::NotFound(format!("booking {booking_id}")),
        Some(StatusCode::FORBIDDEN) => ClientError::Forbidden(format!(
            "booking {booking_id} belongs to another user"
        )),
        _ => booking_error(error),
    }
}

fn booking_error(error: ApiError) -> ClientError {
    match error {
        ApiError::Unauthorized(msg) => ClientError::SessionExpired(msg),
        ApiError::Status { status, message }
            if status == StatusCode::BAD_REQUEST || status == StatusCode::UNPROCESSABLE_ENTITY =>
        {
            ClientError::Validation(message)
        }
        other => ClientError::Booking(other.message()),
    }
}
