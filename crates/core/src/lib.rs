//! Core utilities for geolocator
//!
//! Shared functionality used by the geocoding client, the session and the CLI:
//!
//! - **Error handling**: errors with codes, context and recovery suggestions
//! - **Configuration**: TOML-based configuration with validation
//! - **Retry policy**: exponential backoff settings for network calls
//!
//! # Example
//!
//! ```rust,no_run
//! use geolocator_core::config::Config;
//!
//! let config = Config::load(None).expect("invalid configuration");
//! println!("geocoder: {}", config.schema.geocoder.base_url);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod retry;

pub use error::{Error, ErrorCode, Family, Result, ResultExt};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{Config, ConfigSchema, PositionSourceKind, StalePolicy};
    pub use crate::error::{exit_codes, Error, ErrorCode, Result, ResultExt};
    pub use crate::retry::RetryConfig;
}
