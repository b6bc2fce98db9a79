//! Coded errors carried from the library crates up to the CLI
//!
//! Each [`ErrorCode`] belongs to a family that decides the process exit
//! status; JSON output serializes the error as an [`ErrorReport`].

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error codes the CLI can report
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    Timeout = 1003,
    IoError = 2000,
    ConfigError = 3000,
    ConfigNotFound = 3001,
    ConfigParseError = 3002,
    CoordinateError = 4000,
    GeocodeFailed = 5001,
    BadResponse = 5002,
    PositionUnavailable = 6001,
}

/// Error families, one per exit status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    /// Timeouts and IO failures
    General,
    /// Configuration files and values
    Configuration,
    /// Coordinates given on the command line
    Coordinate,
    /// Reverse-geocoding service
    Network,
    /// Position acquisition
    Position,
}

impl ErrorCode {
    /// Numeric code shown as `E<code>`
    pub fn code(self) -> u32 {
        self as u32
    }

    /// Family this code belongs to
    pub fn family(self) -> Family {
        match self {
            Self::Timeout | Self::IoError => Family::General,
            Self::ConfigError | Self::ConfigNotFound | Self::ConfigParseError => {
                Family::Configuration
            }
            Self::CoordinateError => Family::Coordinate,
            Self::GeocodeFailed | Self::BadResponse => Family::Network,
            Self::PositionUnavailable => Family::Position,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Family::General => "General",
            Family::Configuration => "Configuration",
            Family::Coordinate => "Coordinate",
            Family::Network => "Network",
            Family::Position => "Position",
        })
    }
}

/// Error with a code, optional context and a hint for the user
#[derive(Error, Debug)]
pub struct Error {
    /// What went wrong, for programs
    pub code: ErrorCode,
    /// What went wrong, for people
    pub message: String,
    /// Where it happened
    pub context: Option<String>,
    /// How to get past it
    pub suggestion: Option<String>,
    /// Underlying cause
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(context) = &self.context {
            write!(f, "\n  Context: {context}")?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n  Suggestion: {suggestion}")?;
        }
        Ok(())
    }
}

impl Error {
    /// Error with only a code and a message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: None,
            suggestion: None,
            source: None,
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Serializable form for `--format json`
    pub fn to_report(&self) -> ErrorReport {
        ErrorReport {
            code: self.code,
            code_str: self.code.to_string(),
            category: self.code.family().to_string(),
            message: self.message.clone(),
            context: self.context.clone(),
            suggestion: self.suggestion.clone(),
            source: self.source.as_ref().map(ToString::to_string),
        }
    }

    /// Process exit status for this error
    pub fn exit_code(&self) -> i32 {
        if self.code == ErrorCode::Timeout {
            return exit_codes::TIMEOUT;
        }
        match self.code.family() {
            Family::General => exit_codes::FAILURE,
            Family::Configuration => exit_codes::CONFIG_ERROR,
            Family::Coordinate => exit_codes::VALIDATION_ERROR,
            Family::Network => exit_codes::NETWORK_ERROR,
            Family::Position => exit_codes::POSITION_ERROR,
        }
    }

    /// Invalid configuration value
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Configuration file given explicitly but missing
    pub fn config_not_found(path: impl AsRef<std::path::Path>) -> Self {
        Self::new(
            ErrorCode::ConfigNotFound,
            format!("Configuration file not found: {}", path.as_ref().display()),
        )
        .with_suggestion("Create a .geolocator.toml file or pass --config with an existing path")
    }

    /// Out-of-range or malformed coordinate
    pub fn coordinate(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::CoordinateError, message)
    }

    /// Position could not be acquired
    pub fn position_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PositionUnavailable, message)
            .with_suggestion("Pass --lat/--lon or set [position] source = \"fixed\"")
    }
}

/// JSON shape of an [`Error`]
#[allow(missing_docs)]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReport {
    pub code: ErrorCode,
    pub code_str: String,
    pub category: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Exit statuses of the `geolocator` binary
#[allow(missing_docs)]
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const FAILURE: i32 = 1;
    pub const VALIDATION_ERROR: i32 = 2;
    pub const CONFIG_ERROR: i32 = 3;
    pub const NETWORK_ERROR: i32 = 4;
    pub const POSITION_ERROR: i32 = 5;
    pub const TIMEOUT: i32 = 124;
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::new(ErrorCode::IoError, err.to_string()).with_source(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::new(ErrorCode::ConfigParseError, format!("TOML parse error: {err}"))
            .with_source(err)
    }
}

/// Attach context to the error side of a [`Result`]
pub trait ResultExt<T> {
    #[allow(missing_docs)]
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_display() {
        assert_eq!(ErrorCode::IoError.to_string(), "E2000");
        assert_eq!(ErrorCode::GeocodeFailed.to_string(), "E5001");
    }

    #[test]
    fn test_config_not_found_carries_hint() {
        let err = Error::config_not_found("/path/to/geolocator.toml")
            .with_context("While loading configuration");

        assert_eq!(err.code, ErrorCode::ConfigNotFound);
        assert!(err.context.is_some());
        assert!(err.suggestion.is_some());
        assert_eq!(err.exit_code(), exit_codes::CONFIG_ERROR);
    }

    #[test]
    fn test_exit_codes_follow_family() {
        assert_eq!(Error::coordinate("bad").exit_code(), exit_codes::VALIDATION_ERROR);
        assert_eq!(
            Error::new(ErrorCode::BadResponse, "garbled").exit_code(),
            exit_codes::NETWORK_ERROR
        );
        assert_eq!(
            Error::position_unavailable("denied").exit_code(),
            exit_codes::POSITION_ERROR
        );
        assert_eq!(Error::new(ErrorCode::Timeout, "slow").exit_code(), exit_codes::TIMEOUT);
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert_eq!(Error::from(io).exit_code(), exit_codes::FAILURE);
    }

    #[test]
    fn test_context_on_result() {
        let result: Result<()> = Err(Error::config("bad"));
        let err = result.context("Parsing geolocator.toml").unwrap_err();
        assert_eq!(err.context.as_deref(), Some("Parsing geolocator.toml"));
    }

    #[test]
    fn test_report_names_family() {
        let err = Error::new(ErrorCode::GeocodeFailed, "Failed to resolve place")
            .with_context("lookup 10, 20");

        let json = serde_json::to_string(&err.to_report()).unwrap();

        assert!(json.contains("E5001"));
        assert!(json.contains(r#""category":"Network""#));
        assert!(json.contains(r#""code":"GEOCODE_FAILED""#));
    }
}
