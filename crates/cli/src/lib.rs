//! Terminal output helpers for geolocator
//!
//! Provides shared CLI functionality:
//! - Text or JSON output selection
//! - Status messages and value formatting
//! - Spinners while waiting on the network

#![warn(missing_docs)]

pub mod output;
pub mod progress;

pub use output::{OutputFormat, Status};
