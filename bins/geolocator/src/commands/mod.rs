//! CLI command implementations

pub mod distance;
pub mod lookup;
pub mod moon;
pub mod status;
pub mod validate;
pub mod watch;

use crate::app::App;
use geolocator_cli::Status;
use geolocator_geo::ValidationState;
use owo_colors::OwoColorize;

/// Print per-field validation results
pub fn print_validation(state: &ValidationState) {
    match state {
        ValidationState::Waiting => Status::info("Waiting for input"),
        ValidationState::Checked {
            latitude,
            longitude,
        } => {
            for field in [latitude, longitude] {
                if field.is_valid {
                    println!("  {} {}", "✓".green(), field.field);
                } else {
                    println!("  {} {}: {}", "✗".red(), field.field, field.message.red());
                }
            }
        }
    }
}

/// Dump the session metrics to stderr when running verbose
pub fn report_metrics(app: &App) {
    let snapshot = geolocator_telemetry::metrics().snapshot();
    tracing::debug!(
        session_id = %snapshot.session_id,
        counters = snapshot.counters.len(),
        histograms = snapshot.histograms.len(),
        "Session metrics"
    );
    if !app.verbose {
        return;
    }

    if app.format.is_json() {
        match serde_json::to_string(&serde_json::json!({ "metrics": snapshot })) {
            Ok(line) => eprintln!("{line}"),
            Err(e) => tracing::warn!(error = %e, "Failed to serialize metrics"),
        }
        return;
    }

    eprintln!("{}", "Metrics".bold());
    for (name, value) in &snapshot.counters {
        eprintln!("  {name}: {value}");
    }
    for (name, stats) in &snapshot.histograms {
        eprintln!(
            "  {name}: n={} p50={:.1} p95={:.1} max={:.1}",
            stats.count, stats.p50, stats.p95, stats.max
        );
    }
}
