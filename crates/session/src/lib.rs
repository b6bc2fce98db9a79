//! Coordinate session for geolocator
//!
//! Ties together the one-shot automatic position, the manual coordinate
//! input with its validation, reverse-geocoding of that input and the
//! distances derived from the position.
//!
//! [`Session`] holds the state and is mutated only through its handlers.
//! [`SessionController`] runs the handlers on a single task, fed by a
//! [`SessionHandle`], and spawns the I/O they request.
//!
//! # Example
//!
//! ```rust,no_run
//! use geolocator_geocode::GeocodeClient;
//! use geolocator_session::{FixedPosition, Session, SessionController};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Arc::new(GeocodeClient::new()?);
//!     let mut controller = SessionController::new(Session::default(), client);
//!     controller.locate(Arc::new(FixedPosition::new(10.543, 20.123)?));
//!
//!     let handle = controller.handle();
//!     handle.set_manual("10", "20");
//!     handle.close();
//!
//!     let session = controller.run(|_, update| println!("{update:?}")).await;
//!     println!("{}", session.place());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod controller;
pub mod position;
pub mod state;

pub use controller::{SessionController, SessionHandle, Update};
pub use position::{FixedPosition, IpPosition, PositionError, PositionSource};
pub use state::{
    AutoPosition, Distances, LookupRequest, LookupTicket, PlaceDisplay, Session, SessionView,
};
