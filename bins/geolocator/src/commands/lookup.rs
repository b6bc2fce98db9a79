//! Lookup command

use crate::app::App;
use anyhow::Result;
use geolocator_cli::output::{format_duration, print_json};
use geolocator_cli::{progress, Status};
use geolocator_core::error::Error as CoreError;
use geolocator_geo::{validate, ValidationState};
use geolocator_geocode::{PlaceQuery, PlaceResponse};
use serde::Serialize;
use std::process::ExitCode;

#[derive(Serialize)]
struct LookupOutput<'a> {
    query: &'a PlaceQuery,
    validation: &'a ValidationState,
    place: Option<&'a str>,
    response: &'a PlaceResponse,
    elapsed_ms: u128,
}

/// Validate the input, then resolve it whether or not it is in range
pub async fn run(app: &App, latitude: &str, longitude: &str) -> Result<ExitCode> {
    let validation = validate(latitude, longitude);
    if validation.is_waiting() {
        if app.format.is_json() {
            print_json(&validation)?;
        } else {
            super::print_validation(&validation);
        }
        return Ok(ExitCode::SUCCESS);
    }

    let client = app.client()?;
    let query = PlaceQuery::new(latitude, longitude);

    let spinner = (!app.format.is_json()).then(|| progress::spinner("Resolving place..."));
    let result = client.reverse().lookup_timed(&query).await;
    if let Some(ref pb) = spinner {
        progress::finish_clear(pb);
    }
    let (response, elapsed) = result.map_err(CoreError::from)?;

    if app.format.is_json() {
        print_json(&LookupOutput {
            query: &query,
            validation: &validation,
            place: response.display_name(),
            response: &response,
            elapsed_ms: elapsed.as_millis(),
        })?;
        return Ok(ExitCode::SUCCESS);
    }

    super::print_validation(&validation);
    match response.display_name() {
        Some(name) => Status::success(&format!("{name} ({})", format_duration(elapsed))),
        None => Status::info("No place at these coordinates"),
    }
    if app.verbose {
        for (label, value) in [
            ("Country code", response.country_code.as_deref()),
            ("Subdivision", response.principal_subdivision.as_deref()),
            ("City", response.city.as_deref()),
            ("Locality", response.locality.as_deref()),
            ("Postcode", response.postcode.as_deref()),
        ] {
            if let Some(value) = value.filter(|v| !v.is_empty()) {
                Status::field(label, value);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
