use reqwest::StatusCode;
use thiserror::Error;

/// Transport-level failure of a single API call.
///
/// Each client maps this into its own [`ClientError`] variant at the
/// client boundary, so callers never see raw HTTP details.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("{message}")]
    Status { status: StatusCode, message: String },

    /// 401 from the backend. The local session has already been cleared.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Malformed response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Unauthorized(_) => Some(StatusCode::UNAUTHORIZED),
            _ => None,
        }
    }

    /// Unreachable backend or a 5xx: says nothing about the credential.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Network(_) => true,
            ApiError::Status { status, .. } => status.is_server_error(),
            _ => false,
        }
    }

    /// Server-provided message, or the transport error text.
    pub fn message(&self) -> String {
        match self {
            ApiError::Status { message, .. } | ApiError::Unauthorized(message) => message.clone(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Credential storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Credential storage is unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Errors surfaced by the auth, catalog and booking clients and the workflow.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Could not load rooms: {0}")]
    Catalog(String),

    #[error("Booking failed: {0}")]
    Booking(String),

    /// The room became unavailable between the availability check and the
    /// submission. Expected under concurrent clients.
    #[error("Room is no longer available: {0}")]
    BookingConflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Session expired: {0}")]
    SessionExpired(String),

    #[error("A booking submission for this room and period is already in progress")]
    SubmissionInFlight,

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ClientError {
    /// Human-readable message for display.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Auth(msg) => format!("Could not sign in: {msg}"),
            ClientError::Catalog(_) => "Rooms could not be loaded, please try again".to_string(),
            ClientError::Booking(msg) => format!("An error occurred during booking: {msg}"),
            ClientError::BookingConflict(_) => {
                "Room is not available for selected dates, please choose other dates".to_string()
            }
            ClientError::NotFound(msg) => format!("Not found: {msg}"),
            ClientError::Forbidden(_) => "You are not allowed to do that".to_string(),
            ClientError::Validation(msg) => msg.clone(),
            ClientError::SessionExpired(_) => "Your session has expired, please sign in again".to_string(),
            ClientError::SubmissionInFlight => "Your booking is being submitted".to_string(),
            ClientError::Storage(e) => e.to_string(),
            ClientError::Config(e) => e.to_string(),
        }
    }

    /// Whether the UI should re-prompt the user rather than give up.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ClientError::Auth(_)
                | ClientError::BookingConflict(_)
                | ClientError::Validation(_)
                | ClientError::SessionExpired(_)
                | ClientError::SubmissionInFlight
        )
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
