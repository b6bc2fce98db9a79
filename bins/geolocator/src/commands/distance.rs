//! Distance command

use crate::app::App;
use anyhow::Result;
use geolocator_cli::output::{format_km, print_json};
use geolocator_core::error::Error as CoreError;
use geolocator_geo::{distance_between, round_km, GeoPoint, NORTH_POLE};
use serde::Serialize;
use std::process::ExitCode;

#[derive(Serialize)]
struct DistanceOutput {
    from: GeoPoint,
    to: GeoPoint,
    km: f64,
    rounded_km: i64,
}

/// Distance from `from` to `to`, or to the North Pole when `to` is absent
pub fn run(app: &App, from: (f64, f64), to: Option<(f64, f64)>) -> Result<ExitCode> {
    let from = point(from)?;
    let to = match to {
        Some(to) => point(to)?,
        None => NORTH_POLE,
    };

    let km = distance_between(&from, &to);
    let rounded_km = round_km(km);

    if app.format.is_json() {
        print_json(&DistanceOutput {
            from,
            to,
            km,
            rounded_km,
        })?;
    } else {
        println!("{}", format_km(rounded_km));
    }

    Ok(ExitCode::SUCCESS)
}

fn point((latitude, longitude): (f64, f64)) -> Result<GeoPoint, CoreError> {
    GeoPoint::try_new(latitude, longitude)
        .map_err(|e| CoreError::coordinate(e.to_string()).with_source(e))
}
