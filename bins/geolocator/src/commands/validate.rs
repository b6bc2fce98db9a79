//! Validate command

use crate::app::App;
use anyhow::Result;
use geolocator_cli::output::print_json;
use geolocator_core::error::exit_codes;
use geolocator_geo::validate;
use std::process::ExitCode;

/// Check both fields; exits with the validation code when either is out of range
pub fn run(app: &App, latitude: &str, longitude: &str) -> Result<ExitCode> {
    let state = validate(latitude, longitude);

    if app.format.is_json() {
        print_json(&state)?;
    } else {
        super::print_validation(&state);
    }

    if state.errors().is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(exit_codes::VALIDATION_ERROR as u8))
    }
}
