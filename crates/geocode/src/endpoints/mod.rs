//! Endpoint-specific API implementations
//!
//! | Module | Request | Description |
//! |--------|---------|-------------|
//! | `reverse` | `GET ?latitude&longitude` | Place name for a coordinate, or caller IP location |

pub mod reverse;

pub use reverse::ReverseGeocodeApi;
