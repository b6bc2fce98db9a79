//! Position sources
//!
//! The session asks for the current position exactly once. A source either
//! yields a point or fails; there is no fallback between sources.

use async_trait::async_trait;
use geolocator_core::config::{PositionConfig, PositionSourceKind};
use geolocator_core::error::Error as CoreError;
use geolocator_geo::{GeoError, GeoPoint};
use geolocator_geocode::{GeocodeClient, GeocodeError};
use thiserror::Error;

/// Why a position could not be acquired
#[derive(Debug, Error)]
pub enum PositionError {
    /// Source has nothing to offer
    #[error("Position unavailable: {0}")]
    Unavailable(String),

    /// IP geolocation request failed
    #[error("Position lookup failed: {0}")]
    Lookup(#[from] GeocodeError),

    /// Source produced coordinates outside the valid range
    #[error("Invalid position: {0}")]
    Invalid(#[from] GeoError),
}

impl From<PositionError> for CoreError {
    fn from(err: PositionError) -> Self {
        CoreError::position_unavailable(err.to_string()).with_source(err)
    }
}

/// One-shot position provider
#[async_trait]
pub trait PositionSource: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Acquire the current position
    async fn current_position(&self) -> Result<GeoPoint, PositionError>;
}

/// A position supplied up front
#[derive(Debug, Clone, Copy)]
pub struct FixedPosition {
    point: GeoPoint,
}

impl FixedPosition {
    /// Fixed position at `latitude`, `longitude`; rejects out-of-range values
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, PositionError> {
        Ok(Self {
            point: GeoPoint::try_new(latitude, longitude)?,
        })
    }
}

#[async_trait]
impl PositionSource for FixedPosition {
    fn name(&self) -> &'static str {
        "fixed"
    }

    async fn current_position(&self) -> Result<GeoPoint, PositionError> {
        Ok(self.point)
    }
}

/// Position of the caller's public IP, via the geocoding endpoint
#[derive(Clone)]
pub struct IpPosition {
    client: GeocodeClient,
}

impl IpPosition {
    /// IP geolocation through `client`
    pub fn new(client: GeocodeClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PositionSource for IpPosition {
    fn name(&self) -> &'static str {
        "ip"
    }

    async fn current_position(&self) -> Result<GeoPoint, PositionError> {
        let point = self.client.reverse().caller_position().await?;
        if !point.is_valid() {
            return Err(GeoError::OutOfRange {
                latitude: point.latitude,
                longitude: point.longitude,
            }
            .into());
        }
        Ok(point)
    }
}

/// Build the source selected in `[position]`
pub fn from_config(
    config: &PositionConfig,
    client: &GeocodeClient,
) -> Result<Box<dyn PositionSource>, PositionError> {
    match config.source {
        PositionSourceKind::Ip => Ok(Box::new(IpPosition::new(client.clone()))),
        PositionSourceKind::Fixed => match (config.latitude, config.longitude) {
            (Some(latitude), Some(longitude)) => {
                Ok(Box::new(FixedPosition::new(latitude, longitude)?))
            }
            _ => Err(PositionError::Unavailable(
                "fixed source needs both latitude and longitude".to_string(),
            )),
        },
    }
}
