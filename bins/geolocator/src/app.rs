//! Shared command context: configuration, logging and the network clients

use crate::{Cli, PositionArg};
use anyhow::Result;
use geolocator_cli::OutputFormat;
use geolocator_core::config::{Config, PositionConfig, PositionSourceKind};
use geolocator_core::error::Error as CoreError;
use geolocator_geocode::{ClientConfig, GeocodeClient};
use geolocator_session::{position, PositionSource, Session};
use geolocator_telemetry::TelemetryConfig;
use std::sync::Arc;

const VERBOSE_FILTER: &str =
    "geolocator=debug,geolocator_session=debug,geolocator_geocode=debug,warn";

/// Everything a command needs from the command line and config file
pub struct App {
    pub config: Config,
    pub format: OutputFormat,
    pub verbose: bool,
    position: PositionConfig,
}

impl App {
    pub fn from_args(cli: &Cli) -> Result<Self> {
        let config = Config::load(cli.config.as_deref())?;
        let position = position_overrides(&config.schema.position, cli);

        Ok(Self {
            config,
            format: cli.format,
            verbose: cli.verbose,
            position,
        })
    }

    pub fn init_telemetry(&self) -> Result<()> {
        let logging = &self.config.schema.logging;
        geolocator_telemetry::init_with_config(&TelemetryConfig {
            log_level: if self.verbose {
                VERBOSE_FILTER.to_string()
            } else {
                logging.level.clone()
            },
            json: logging.json,
            show_target: self.verbose,
        })
    }

    /// Geocoding client from `[geocoder]` plus environment overrides
    pub fn client(&self) -> Result<GeocodeClient> {
        let config = ClientConfig::from_schema(&self.config.schema.geocoder).with_env_overrides();
        Ok(GeocodeClient::with_config(config).map_err(CoreError::from)?)
    }

    /// Position source after command-line overrides
    pub fn position_source(&self, client: &GeocodeClient) -> Result<Arc<dyn PositionSource>> {
        let source = position::from_config(&self.position, client).map_err(CoreError::from)?;
        Ok(Arc::from(source))
    }

    /// Empty session configured from `[session]`
    pub fn session(&self) -> Session {
        Session::new(self.config.schema.session.stale_responses)
    }
}

/// `--lat/--lon` select a fixed position; `--position` picks the source
fn position_overrides(base: &PositionConfig, cli: &Cli) -> PositionConfig {
    let mut position = base.clone();

    if let (Some(latitude), Some(longitude)) = (cli.lat, cli.lon) {
        position.source = PositionSourceKind::Fixed;
        position.latitude = Some(latitude);
        position.longitude = Some(longitude);
    }

    match cli.position {
        Some(PositionArg::Ip) => position.source = PositionSourceKind::Ip,
        Some(PositionArg::Fixed) => position.source = PositionSourceKind::Fixed,
        None => {}
    }

    position
}
