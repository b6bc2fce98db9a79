//! Moon command

use crate::app::App;
use anyhow::Result;
use chrono::{DateTime, Utc};
use geolocator_cli::output::{format_km, print_json};
use geolocator_cli::{progress, Status};
use geolocator_geo::{moon_distance_km, moon_position, round_km, GeoPoint, MoonPosition};
use serde::Serialize;
use std::process::ExitCode;
use tracing::warn;

#[derive(Serialize)]
struct MoonOutput {
    at: DateTime<Utc>,
    observer: Option<GeoPoint>,
    distance_km: i64,
    position: Option<MoonPosition>,
}

/// Moon distance now, plus its position in the sky when the observer is known
pub async fn run(app: &App) -> Result<ExitCode> {
    let at = Utc::now();
    let client = app.client()?;
    let source = app.position_source(&client)?;

    let spinner = (!app.format.is_json()).then(|| progress::spinner("Locating..."));
    let observer = match source.current_position().await {
        Ok(point) => Some(point),
        Err(e) => {
            warn!(error = %e, "Observer position unavailable");
            None
        }
    };
    if let Some(ref pb) = spinner {
        progress::finish_clear(pb);
    }

    let output = MoonOutput {
        at,
        observer,
        distance_km: round_km(moon_distance_km(at)),
        position: observer.map(|p| moon_position(at, &p)),
    };

    if app.format.is_json() {
        print_json(&output)?;
        return Ok(ExitCode::SUCCESS);
    }

    Status::header("Moon");
    Status::field("Distance", &format_km(output.distance_km));
    match output.position {
        Some(position) => {
            Status::field("Azimuth", &format!("{:.1}°", position.azimuth.to_degrees()));
            Status::field("Altitude", &format!("{:.1}°", position.altitude.to_degrees()));
        }
        None => Status::warning("Observer position unknown; azimuth and altitude omitted"),
    }

    Ok(ExitCode::SUCCESS)
}
