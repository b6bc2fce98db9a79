//! Error types for the geo crate.

use thiserror::Error;

/// Result type alias for geo operations.
pub type Result<T> = std::result::Result<T, GeoError>;

/// Errors that can occur during geo operations.
#[derive(Debug, Error)]
pub enum GeoError {
    /// Coordinate outside the geographic ranges
    #[error("Coordinate out of range: latitude {latitude}, longitude {longitude}")]
    OutOfRange {
        /// Offending latitude
        latitude: f64,
        /// Offending longitude
        longitude: f64,
    },

    /// Text could not be read as a coordinate
    #[error("Invalid coordinate: {0}")]
    Parse(String),
}
