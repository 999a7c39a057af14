//! Error kinds raised along the fetch pipeline and their user-facing text.
//!
//! Collaborators translate whatever their platform reports into these tagged
//! variants once, at their boundary. The panel only ever calls
//! [`error_message`] on them.

use thiserror::Error;

pub const MISSING_API_KEY_MESSAGE: &str = "Please enter an API key.";
pub const LOCATION_DENIED_MESSAGE: &str = "Location access was denied.";
pub const LOCATION_UNAVAILABLE_MESSAGE: &str = "Location information is unavailable.";
pub const LOCATION_TIMEOUT_MESSAGE: &str = "The location request timed out.";
pub const FETCH_FAILED_MESSAGE: &str = "Could not retrieve weather information.";
pub const UNSUPPORTED_MESSAGE: &str = "Geolocation is not supported on this platform.";
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred.";

/// Failure reported by a [`LocationProvider`](crate::LocationProvider).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("{}", UNSUPPORTED_MESSAGE)]
    Unsupported,

    /// Classification code 1.
    #[error("location permission denied")]
    PermissionDenied,

    /// Classification code 2.
    #[error("location unavailable")]
    PositionUnavailable,

    /// Classification code 3.
    #[error("location request timed out")]
    Timeout,

    /// Anything the platform did not classify, with its message if it gave one.
    #[error("{}", .0.as_deref().unwrap_or("unclassified location error"))]
    Other(Option<String>),
}

impl LocationError {
    /// Map a platform classification code (1 denied, 2 unavailable, 3 timeout)
    /// and optional message into a tagged error. A recognized code always wins
    /// over the message.
    pub fn from_platform(code: Option<u16>, message: Option<String>) -> Self {
        match code {
            Some(1) => LocationError::PermissionDenied,
            Some(2) => LocationError::PositionUnavailable,
            Some(3) => LocationError::Timeout,
            _ => LocationError::Other(message),
        }
    }

    pub fn code(&self) -> Option<u16> {
        match self {
            LocationError::PermissionDenied => Some(1),
            LocationError::PositionUnavailable => Some(2),
            LocationError::Timeout => Some(3),
            LocationError::Unsupported | LocationError::Other(_) => None,
        }
    }
}

/// Failure of a key-value store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read storage file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write storage file {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Storage file {path} is corrupt: {message}")]
    Corrupt { path: String, message: String },
}

/// Every way one fetch cycle can end without a snapshot.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("{}", MISSING_API_KEY_MESSAGE)]
    MissingApiKey,

    #[error(transparent)]
    Location(#[from] LocationError),

    /// Non-success HTTP status from the weather endpoint. The status is kept
    /// for logging only.
    #[error("{}", FETCH_FAILED_MESSAGE)]
    FetchFailed { status: u16 },

    #[error("{0}")]
    Transport(String),

    #[error("Malformed weather response: {0}")]
    MalformedResponse(String),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        WeatherError::Transport(err.to_string())
    }
}

/// Turn any pipeline error into the single line shown to the user.
///
/// Classified location failures get fixed messages. Everything else falls
/// back to the error's own message, and to a generic one if that is empty.
pub fn error_message(err: &WeatherError) -> String {
    match err {
        WeatherError::Location(LocationError::PermissionDenied) => {
            LOCATION_DENIED_MESSAGE.to_string()
        }
        WeatherError::Location(LocationError::PositionUnavailable) => {
            LOCATION_UNAVAILABLE_MESSAGE.to_string()
        }
        WeatherError::Location(LocationError::Timeout) => LOCATION_TIMEOUT_MESSAGE.to_string(),
        WeatherError::Location(LocationError::Other(message)) => match message.as_deref() {
            Some(m) if !m.is_empty() => m.to_string(),
            _ => UNKNOWN_ERROR_MESSAGE.to_string(),
        },
        other => {
            let message = other.to_string();
            if message.is_empty() {
                UNKNOWN_ERROR_MESSAGE.to_string()
            } else {
                message
            }
        }
    }
}
