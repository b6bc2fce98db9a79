//! Status command

use crate::app::App;
use anyhow::Result;
use geolocator_cli::output::{format_km, print_json};
use geolocator_cli::{progress, Status};
use geolocator_core::error::Error as CoreError;
use geolocator_session::{AutoPosition, Session, SessionController};
use std::process::ExitCode;
use std::sync::Arc;

/// Acquire the position once and print it with the derived distances
pub async fn run(app: &App) -> Result<ExitCode> {
    let client = app.client()?;
    let source = app.position_source(&client)?;

    let mut controller = SessionController::new(app.session(), Arc::new(client));
    controller.locate(source);
    controller.handle().close();

    let spinner = (!app.format.is_json()).then(|| progress::spinner("Locating..."));
    let session = controller.run(|_, _| {}).await;
    if let Some(ref pb) = spinner {
        progress::finish_clear(pb);
    }

    if app.format.is_json() {
        print_json(&session.view())?;
    } else {
        print_session(&session);
    }
    super::report_metrics(app);

    if session.is_loading() {
        return Err(CoreError::position_unavailable("no position was acquired").into());
    }
    Ok(ExitCode::SUCCESS)
}

fn print_session(session: &Session) {
    let AutoPosition::Located(point) = session.auto_position() else {
        Status::warning("Loading...");
        return;
    };

    Status::header("Position");
    Status::field("Latitude", &point.latitude.to_string());
    Status::field("Longitude", &point.longitude.to_string());
    if let Some(distances) = session.distances() {
        Status::field("Distance to North Pole", &format_km(distances.north_pole_km));
        Status::field("Distance to Moon", &format_km(distances.moon_km));
    }
}
