//! Catalog client: read-only access to the backend's rooms

use reqwest::StatusCode;
use tracing::debug;

use crate::domain::{Room, RoomId, StayPeriod};
use crate::infrastructure::http::dto::{AvailabilityQuery, ListPayload};
use crate::infrastructure::http::ApiClient;
use crate::shared::{ApiError, ClientError, ClientResult};

#[derive(Clone)]
pub struct CatalogClient {
    api: ApiClient,
}

impl CatalogClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// All rooms. An empty catalog is an empty vec, not an error.
    pub async fn list_rooms(&self) -> ClientResult<Vec<Room>> {
        let rooms: ListPayload<Room> = self.api.get("/rooms").await.map_err(catalog_error)?;
        let rooms = rooms.into_vec();
        debug!(count = rooms.len(), "Rooms fetched");
        Ok(rooms)
    }

    /// Rooms the backend reports free for the whole period.
    ///
    /// Overlap and conflict resolution happen server-side; rooms flagged
    /// unavailable in the response are dropped and nothing else is inferred.
    pub async fn list_available_rooms(&self, period: &StayPeriod) -> ClientResult<Vec<Room>> {
        let query = AvailabilityQuery::from(period);
        let rooms: ListPayload<Room> = self
            .api
            .get_with_query("/rooms/available", &query)
            .await
            .map_err(catalog_error)?;

        let rooms: Vec<Room> = rooms.into_vec().into_iter().filter(|r| r.available).collect();
        debug!(
            count = rooms.len(),
            check_in = %period.check_in(),
            check_out = %period.check_out(),
            "Available rooms fetched"
        );
        Ok(rooms)
    }

    pub async fn get_room(&self, room_id: RoomId) -> ClientResult<Room> {
        self.api
            .get(&format!("/rooms/{room_id}"))
            .await
            .map_err(|e| match e.status() {
                Some(StatusCode::NOT_FOUND) => ClientError::NotFound(format!("room {room_id}")),
                _ => catalog_error(e),
            })
    }
}

fn catalog_error(error: ApiError) -> ClientError {
    match error {
        ApiError::Unauthorized(msg) => ClientError::SessionExpired(msg),
        ApiError::Status { status, message } if status == StatusCode::BAD_REQUEST => {
            ClientError::Validation(message)
        }
        other => ClientError::Catalog(other.message()),
    }
}
