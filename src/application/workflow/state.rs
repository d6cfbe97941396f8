//! Workflow states

use std::fmt;

use crate::domain::Room;

/// Where the user is in the browse → authenticate → book flow.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowState {
    /// Auth flow. `pending_room` is the room the user picked before signing
    /// in; the booking flow resumes for it after a successful submit.
    Unauthenticated { pending_room: Option<Room> },
    Browsing,
    Booking { room: Room },
    AuthError {
        message: String,
        pending_room: Option<Room>,
    },
    BookingError { room: Room, message: String },
}

impl WorkflowState {
    pub fn name(&self) -> &'static str {
        match self {
            WorkflowState::Unauthenticated { .. } => "unauthenticated",
            WorkflowState::Browsing => "browsing",
            WorkflowState::Booking { .. } => "booking",
            WorkflowState::AuthError { .. } => "auth_error",
            WorkflowState::BookingError { .. } => "booking_error",
        }
    }

    /// Room currently selected for booking, or waiting for sign-in.
    pub fn selected_room(&self) -> Option<&Room> {
        match self {
            WorkflowState::Booking { room } | WorkflowState::BookingError { room, .. } => {
                Some(room)
            }
            WorkflowState::Unauthenticated { pending_room }
            | WorkflowState::AuthError { pending_room, .. } => pending_room.as_ref(),
            WorkflowState::Browsing => None,
        }
    }

    /// Error message to show, if the last action failed.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            WorkflowState::AuthError { message, .. }
            | WorkflowState::BookingError { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn is_auth_flow(&self) -> bool {
        matches!(
            self,
            WorkflowState::Unauthenticated { .. } | WorkflowState::AuthError { .. }
        )
    }

    pub fn is_booking_flow(&self) -> bool {
        matches!(
            self,
            WorkflowState::Booking { .. } | WorkflowState::BookingError { .. }
        )
    }

    pub(crate) fn unauthenticated() -> Self {
        WorkflowState::Unauthenticated { pending_room: None }
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.selected_room() {
            Some(room) => write!(f, "{} (room {})", self.name(), room.id),
            None => f.write_str(self.name()),
        }
    }
}
