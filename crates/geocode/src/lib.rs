//! Reverse-geocoding client for geolocator
//!
//! Resolves a latitude/longitude pair to a human-readable place using a
//! BigDataCloud-compatible `reverse-geocode-client` endpoint:
//! `GET <base-url>?latitude={lat}&longitude={lon}`.
//!
//! # Features
//!
//! - **Configurable endpoint**: base URL, timeout and language from the config
//!   file or environment variables
//! - **Retry with exponential backoff**: transient failures are retried
//! - **Request correlation**: every request carries a unique `X-Request-ID`
//! - **Resolver trait**: [`PlaceResolver`] lets the session run against
//!   the real endpoint or a test double
//!
//! # Example
//!
//! ```rust,no_run
//! use geolocator_geocode::{GeocodeClient, PlaceQuery};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = GeocodeClient::new()?;
//!
//!     let place = client.reverse().lookup(&PlaceQuery::new("10", "20")).await?;
//!     println!("{}", place.display_name().unwrap_or_default());
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod resolver;

pub use client::GeocodeClient;
pub use config::ClientConfig;
pub use endpoints::reverse::{PlaceQuery, PlaceResponse};
pub use error::{GeocodeError, GeocodeResult};
pub use resolver::PlaceResolver;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::client::GeocodeClient;
    pub use crate::config::ClientConfig;
    pub use crate::endpoints::reverse::{PlaceQuery, PlaceResponse, ReverseGeocodeApi};
    pub use crate::error::{GeocodeError, GeocodeResult};
    pub use crate::resolver::PlaceResolver;
}
