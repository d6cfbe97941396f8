//! Session lifecycle events
//!
//! Published by the session store; the host application subscribes to
//! react to sign-in and sign-out (e.g. show the login screen when a
//! credential is rejected).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::UserRole;

/// Event types for session notifications
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum SessionEvent {
    /// A session was established (login, registration or restore)
    Started(SessionStartedEvent),
    /// The session was destroyed
    Ended(SessionEndedEvent),
}

impl SessionEvent {
    /// Get the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            SessionEvent::Started(_) => "session_started",
            SessionEvent::Ended(_) => "session_ended",
        }
    }

    /// End reason, for `Ended` events
    pub fn end_reason(&self) -> Option<EndReason> {
        match self {
            SessionEvent::Ended(e) => Some(e.reason),
            SessionEvent::Started(_) => None,
        }
    }
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// User logged out
    Logout,
    /// Backend rejected the credential (401)
    Expired,
    /// Persisted credential could not be restored at startup
    Invalid,
}

/// Session started event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStartedEvent {
    pub email: String,
    pub role: UserRole,
}

/// Session ended event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionEndedEvent {
    pub email: Option<String>,
    pub reason: EndReason,
}

/// Event wrapper with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMessage {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub event: SessionEvent,
}

impl EventMessage {
    pub fn new(event: SessionEvent) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            event,
        }
    }
}
