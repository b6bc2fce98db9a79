//! Configuration loading and schema definitions
//!
//! Settings shared by the geocoding client, the session and the CLI.

mod loader;
mod schema;

pub use loader::Config;
pub use schema::*;
