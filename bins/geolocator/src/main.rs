//! geolocator - where am I, what is at these coordinates, how far is the pole
//!
//! Acquires the current position once, resolves manually entered coordinates
//! to a place name and reports distances to the North Pole and the Moon.

use clap::{Parser, Subcommand, ValueEnum};
use geolocator_cli::{OutputFormat, Status};
use geolocator_core::error::{exit_codes, Error as CoreError};
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::process::ExitCode;

mod app;
mod commands;

use app::App;

/// Geolocation from the command line
#[derive(Parser)]
#[command(name = "geolocator")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Configuration file (default: .geolocator.toml, then the user config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Where the automatic position comes from
    #[arg(long, global = true, value_enum)]
    position: Option<PositionArg>,

    /// Fixed latitude for the automatic position
    #[arg(long, global = true, allow_negative_numbers = true, requires = "lon")]
    lat: Option<f64>,

    /// Fixed longitude for the automatic position
    #[arg(long, global = true, allow_negative_numbers = true, requires = "lat")]
    lon: Option<f64>,

    #[command(subcommand)]
    command: Commands,
}

/// Automatic position source
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PositionArg {
    /// Geolocate the public IP address
    Ip,
    /// Use --lat/--lon or the [position] config section
    Fixed,
}

#[derive(Subcommand)]
enum Commands {
    /// Acquire the position and show distances to the North Pole and the Moon
    Status,

    /// Validate coordinates and resolve them to a place
    Lookup {
        /// Latitude, as text
        #[arg(allow_negative_numbers = true)]
        latitude: String,

        /// Longitude, as text
        #[arg(allow_negative_numbers = true)]
        longitude: String,
    },

    /// Great-circle distance between two points (second defaults to the North Pole)
    Distance {
        /// Latitude of the first point
        #[arg(allow_negative_numbers = true)]
        from_lat: f64,

        /// Longitude of the first point
        #[arg(allow_negative_numbers = true)]
        from_lon: f64,

        /// Latitude of the second point
        #[arg(allow_negative_numbers = true, requires = "to_lon")]
        to_lat: Option<f64>,

        /// Longitude of the second point
        #[arg(allow_negative_numbers = true)]
        to_lon: Option<f64>,
    },

    /// Check that coordinates are within range
    Validate {
        /// Latitude, as text
        #[arg(allow_negative_numbers = true)]
        latitude: String,

        /// Longitude, as text
        #[arg(allow_negative_numbers = true)]
        longitude: String,
    },

    /// Moon position and distance right now
    Moon,

    /// Interactive session: read "lat lon" lines from stdin
    Watch,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let app = match App::from_args(&cli) {
        Ok(app) => app,
        Err(e) => return report(&e, cli.format),
    };

    if let Err(e) = app.init_telemetry() {
        Status::warning(&format!("Logging disabled: {e}"));
    }

    let result = match cli.command {
        Commands::Status => commands::status::run(&app).await,
        Commands::Lookup {
            latitude,
            longitude,
        } => commands::lookup::run(&app, &latitude, &longitude).await,
        Commands::Distance {
            from_lat,
            from_lon,
            to_lat,
            to_lon,
        } => commands::distance::run(&app, (from_lat, from_lon), to_lat.zip(to_lon)),
        Commands::Validate {
            latitude,
            longitude,
        } => commands::validate::run(&app, &latitude, &longitude),
        Commands::Moon => commands::moon::run(&app).await,
        Commands::Watch => commands::watch::run(&app).await,
    };

    match result {
        Ok(code) => code,
        Err(e) => report(&e, app.format),
    }
}

fn report(err: &anyhow::Error, format: OutputFormat) -> ExitCode {
    let core = err.downcast_ref::<CoreError>();

    if format.is_json() {
        let report = core.map_or_else(
            || serde_json::json!({ "message": format!("{err:#}") }),
            |e| serde_json::json!(e.to_report()),
        );
        eprintln!("{report}");
    } else {
        eprintln!("{} {:#}", "Error:".red().bold(), err);
    }

    let code = core.map_or(exit_codes::FAILURE, CoreError::exit_code);
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
