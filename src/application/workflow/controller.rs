//! Workflow controller
//!
//! Orchestrates the auth, catalog and booking clients as a small state
//! machine. Owns the lifecycle of the user's selection; the session itself
//! lives in the injected [`SessionStore`](crate::application::SessionStore).

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{info, warn};

use super::state::WorkflowState;
use crate::application::booking::BookingClient;
use crate::application::catalog::CatalogClient;
use crate::application::identity::{AuthClient, AuthIntent};
use crate::application::session::SharedSessionStore;
use crate::domain::{Booking, BookingRequest, Room, RoomId, Session, StayPeriod};
use crate::shared::{ClientError, ClientResult};

type InFlightSet = Arc<Mutex<HashSet<(RoomId, StayPeriod)>>>;

/// Marks a (room, period) submission as in flight until dropped.
struct InFlightGuard {
    set: InFlightSet,
    key: (RoomId, StayPeriod),
}

impl InFlightGuard {
    fn acquire(set: &InFlightSet, key: (RoomId, StayPeriod)) -> ClientResult<Self> {
        let inserted = set.lock().unwrap_or_else(|e| e.into_inner()).insert(key);
        if !inserted {
            return Err(ClientError::SubmissionInFlight);
        }
        Ok(Self {
            set: set.clone(),
            key,
        })
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.set
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&self.key);
    }
}

pub struct WorkflowController {
    auth: AuthClient,
    catalog: CatalogClient,
    booking: BookingClient,
    session: SharedSessionStore,
    state: Mutex<WorkflowState>,
    /// Last fetched room list, as shown to the user
    rooms: Mutex<Vec<Room>>,
    in_flight: InFlightSet,
}

impl WorkflowController {
    pub fn new(
        auth: AuthClient,
        catalog: CatalogClient,
        booking: BookingClient,
        session: SharedSessionStore,
    ) -> Self {
        Self {
            auth,
            catalog,
            booking,
            session,
            state: Mutex::new(WorkflowState::unauthenticated()),
            rooms: Mutex::new(Vec::new()),
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Resolve the initial state from a recovered session.
    pub async fn start(&self) -> WorkflowState {
        let initial = match self.auth.check_session().await {
            Some(session) => {
                info!(email = %session.user.email, "Session recovered");
                WorkflowState::Browsing
            }
            None => WorkflowState::unauthenticated(),
        };
        self.set_state(initial)
    }

    pub fn state(&self) -> WorkflowState {
        self.lock_state().clone()
    }

    pub fn session(&self) -> Option<Session> {
        self.session.current_session()
    }

    // ── Auth flow ───────────────────────────────────────────────

    /// Open the auth flow without a room selected.
    pub fn begin_auth(&self) -> WorkflowState {
        if self.session.is_authenticated() {
            return self.state();
        }
        let mut state = self.lock_state();
        if !state.is_auth_flow() {
            *state = WorkflowState::unauthenticated();
        }
        state.clone()
    }

    /// Submit login or registration. On success the booking flow resumes
    /// for the pending room, if any; on failure the pending room is kept.
    pub async fn submit_auth(&self, intent: AuthIntent) -> ClientResult<Session> {
        let pending_room = self.lock_state().selected_room().cloned();

        match self.auth.submit(intent).await {
            Ok(session) => {
                let next = match pending_room {
                    Some(room) => WorkflowState::Booking { room },
                    None => WorkflowState::Browsing,
                };
                info!(email = %session.user.email, state = %next, "Signed in");
                self.set_state(next);
                Ok(session)
            }
            Err(e) => {
                self.set_state(WorkflowState::AuthError {
                    message: e.user_message(),
                    pending_room,
                });
                Err(e)
            }
        }
    }

    pub async fn logout(&self) -> WorkflowState {
        self.auth.logout().await;
        self.set_state(WorkflowState::unauthenticated())
    }

    // ── Catalog ─────────────────────────────────────────────────

    pub async fn rooms(&self) -> ClientResult<Vec<Room>> {
        let result = self.catalog.list_rooms().await;
        self.remember_rooms(self.observe(result))
    }

    pub async fn available_rooms(&self, period: &StayPeriod) -> ClientResult<Vec<Room>> {
        let result = self.catalog.list_available_rooms(period).await;
        self.remember_rooms(self.observe(result))
    }

    /// Rooms from the last fetch, with rooms booked since then flagged
    /// unavailable until the next fetch.
    pub fn cached_rooms(&self) -> Vec<Room> {
        self.rooms.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    // ── Booking flow ────────────────────────────────────────────

    /// Pick a room. Without a session this opens the auth flow and keeps
    /// the room pending.
    pub fn select_room(&self, room: Room) -> WorkflowState {
        let next = if self.session.is_authenticated() {
            WorkflowState::Booking { room }
        } else {
            WorkflowState::Unauthenticated {
                pending_room: Some(room),
            }
        };
        self.set_state(next)
    }

    /// Price, check and submit a booking for the selected room.
    pub async fn submit_booking(&self, period: StayPeriod) -> ClientResult<Booking> {
        let room = match self.state() {
            WorkflowState::Booking { room } | WorkflowState::BookingError { room, .. } => room,
            other => {
                return Err(ClientError::Validation(format!(
                    "no room selected for booking (state: {})",
                    other.name()
                )))
            }
        };

        if !self.session.is_authenticated() {
            self.set_state(WorkflowState::Unauthenticated {
                pending_room: Some(room),
            });
            return Err(ClientError::SessionExpired(
                "sign in to complete the booking".into(),
            ));
        }

        let _guard = InFlightGuard::acquire(&self.in_flight, (room.id, period))?;

        match self.book(&room, period).await {
            Ok(booking) => {
                self.mark_booked(room.id);
                self.transition_from(room.id, WorkflowState::Browsing);
                Ok(booking)
            }
            Err(ClientError::SessionExpired(msg)) => {
                warn!(room_id = %room.id, "Session expired during booking");
                self.transition_from(
                    room.id,
                    WorkflowState::Unauthenticated {
                        pending_room: Some(room.clone()),
                    },
                );
                Err(ClientError::SessionExpired(msg))
            }
            Err(e) => {
                self.transition_from(
                    room.id,
                    WorkflowState::BookingError {
                        room: room.clone(),
                        message: e.user_message(),
                    },
                );
                Err(e)
            }
        }
    }

    /// Leave the booking flow without submitting.
    pub fn abandon_booking(&self) -> WorkflowState {
        let mut state = self.lock_state();
        if state.is_booking_flow() {
            *state = WorkflowState::Browsing;
        }
        state.clone()
    }

    async fn book(&self, room: &Room, period: StayPeriod) -> ClientResult<Booking> {
        let request = BookingRequest::new(room, period)?;

        if !self.booking.check_availability(room.id, &period).await? {
            return Err(ClientError::Validation(format!(
                "Room {} is not available for the selected dates",
                room.id
            )));
        }

        self.booking.create_booking(&request).await
    }

    // ── Internals ───────────────────────────────────────────────

    /// A client call that hit an expired session sends the user back to
    /// the auth flow, keeping whatever room was selected.
    fn observe<T>(&self, result: ClientResult<T>) -> ClientResult<T> {
        if let Err(ClientError::SessionExpired(_)) = &result {
            let mut state = self.lock_state();
            let pending_room = state.selected_room().cloned();
            *state = WorkflowState::Unauthenticated { pending_room };
        }
        result
    }

    fn remember_rooms(&self, result: ClientResult<Vec<Room>>) -> ClientResult<Vec<Room>> {
        if let Ok(rooms) = &result {
            *self.rooms.lock().unwrap_or_else(|e| e.into_inner()) = rooms.clone();
        }
        result
    }

    fn mark_booked(&self, room_id: RoomId) {
        let mut rooms = self.rooms.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(room) = rooms.iter_mut().find(|r| r.id == room_id) {
            room.mark_unavailable();
        }
    }

    /// Apply `next` only if the user is still in the booking flow for
    /// `room_id`; a logout during the call wins.
    fn transition_from(&self, room_id: RoomId, next: WorkflowState) {
        let mut state = self.lock_state();
        let still_booking =
            state.is_booking_flow() && state.selected_room().map(|r| r.id) == Some(room_id);
        if still_booking {
            *state = next;
        }
    }

    fn set_state(&self, next: WorkflowState) -> WorkflowState {
        let mut state = self.lock_state();
        *state = next;
        state.clone()
    }

    fn lock_state(&self) -> MutexGuard<'_, WorkflowState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}
