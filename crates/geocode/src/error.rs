//! Error types for the geocoding client

use geolocator_core::{Error, ErrorCode};
use thiserror::Error;

/// Result type alias for geocoding operations
pub type GeocodeResult<T> = Result<T, GeocodeError>;

/// Geocoding client errors
#[derive(Error, Debug)]
pub enum GeocodeError {
    /// HTTP request failed (connect, timeout, body read)
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Response body was not the expected JSON
    #[error("Malformed response: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Endpoint returned a non-success status
    #[error("Geocoder error ({status}): {message}")]
    ApiResponse {
        /// HTTP status code
        status: u16,
        /// Response body or reason
        message: String,
    },

    /// All retry attempts exhausted
    #[error("All {attempts} attempts failed: {last_error}")]
    RetriesExhausted {
        /// Number of attempts made
        attempts: u32,
        /// Last error message
        last_error: String,
    },

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Response parsed but lacks a field the caller needs
    #[error("Incomplete response: missing {0}")]
    Incomplete(&'static str),

    /// Lookup task ended without an answer
    #[error("Lookup interrupted: {0}")]
    Interrupted(String),
}

impl GeocodeError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an API response error
    pub fn api_response(status: u16, message: impl Into<String>) -> Self {
        Self::ApiResponse {
            status,
            message: message.into(),
        }
    }

    /// Check if this error is retryable
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Request(e) => e.is_connect() || e.is_timeout(),
            // 5xx and 429 (rate limited)
            Self::ApiResponse { status, .. } => *status >= 500 || *status == 429,
            Self::Json(_)
            | Self::Config(_)
            | Self::InvalidUrl(_)
            | Self::Incomplete(_)
            | Self::Interrupted(_)
            | Self::RetriesExhausted { .. } => false,
        }
    }
}

impl From<GeocodeError> for Error {
    fn from(err: GeocodeError) -> Self {
        let code = match &err {
            GeocodeError::Config(_) | GeocodeError::InvalidUrl(_) => ErrorCode::ConfigError,
            GeocodeError::Json(_) | GeocodeError::Incomplete(_) => ErrorCode::BadResponse,
            GeocodeError::Request(e) if e.is_timeout() => ErrorCode::Timeout,
            _ => ErrorCode::GeocodeFailed,
        };
        Error::new(code, err.to_string()).with_source(err)
    }
}
