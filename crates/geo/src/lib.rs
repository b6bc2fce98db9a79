//! Geospatial core for geolocator.
//!
//! This crate provides:
//! - Great-circle distance (spherical law of cosines, kilometers)
//! - Latitude/longitude range validation with per-field messages
//! - A low-precision lunar ephemeris for the Earth-Moon distance
//!
//! # Example
//!
//! ```
//! use geolocator_geo::{distance_between, round_km, GeoPoint, NORTH_POLE};
//!
//! let here = GeoPoint::new(10.543, 20.123);
//! let km = distance_between(&here, &NORTH_POLE);
//! assert_eq!(round_km(km), 8835);
//! ```

mod distance;
mod error;
pub mod moon;
pub mod validation;

pub use distance::{distance_between, round_km, KM_PER_STATUTE_MILE, NAUTICAL_MILES_PER_DEGREE};
pub use error::{GeoError, Result};
pub use moon::{moon_distance_km, moon_position, MoonPosition};
pub use validation::{validate, validate_point, Field, FieldValidation, ValidationState};

use std::fmt;
use std::str::FromStr;

/// Reference point used for the "distance to the North Pole" reading.
///
/// A pole has no defined longitude; 135 is kept as the fixed reference value.
pub const NORTH_POLE: GeoPoint = GeoPoint {
    latitude: 90.0,
    longitude: 135.0,
};

/// A latitude/longitude pair in decimal degrees.
///
/// Out-of-range values are representable so raw user input can be carried
/// around; use [`GeoPoint::is_valid`] or [`validate_point`] before trusting it.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees (-90 to 90)
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180)
    pub longitude: f64,
}

impl GeoPoint {
    /// Creates a new point without range checks.
    #[inline]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Creates a point, rejecting values outside the geographic ranges.
    pub fn try_new(latitude: f64, longitude: f64) -> Result<Self> {
        let point = Self::new(latitude, longitude);
        match validate_point(&point) {
            ValidationState::Checked { latitude: lat, longitude: lon }
                if lat.is_valid && lon.is_valid =>
            {
                Ok(point)
            }
            _ => Err(GeoError::OutOfRange {
                latitude,
                longitude,
            }),
        }
    }

    /// Returns true if both axes are within range.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.latitude.abs() <= 90.0 && self.longitude.abs() <= 180.0
    }

    /// Converts degrees to radians for internal calculations.
    #[inline]
    pub(crate) fn to_radians(self) -> (f64, f64) {
        (self.latitude.to_radians(), self.longitude.to_radians())
    }
}

impl From<(f64, f64)> for GeoPoint {
    fn from((lat, lon): (f64, f64)) -> Self {
        Self::new(lat, lon)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.latitude, self.longitude)
    }
}

impl FromStr for GeoPoint {
    type Err = GeoError;

    /// Parses `"lat,lon"` (whitespace around either part is ignored).
    fn from_str(s: &str) -> Result<Self> {
        let (lat, lon) = s
            .split_once(',')
            .ok_or_else(|| GeoError::Parse(format!("expected \"lat,lon\", got {s:?}")))?;

        let latitude = lat
            .trim()
            .parse::<f64>()
            .map_err(|e| GeoError::Parse(format!("latitude {:?}: {e}", lat.trim())))?;
        let longitude = lon
            .trim()
            .parse::<f64>()
            .map_err(|e| GeoError::Parse(format!("longitude {:?}: {e}", lon.trim())))?;

        Ok(Self::new(latitude, longitude))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_creation() {
        let point = GeoPoint::new(10.543, 20.123);
        assert_eq!(point.latitude, 10.543);
        assert_eq!(point.longitude, 20.123);
    }

    #[test]
    fn test_point_validity() {
        assert!(GeoPoint::new(0.0, 0.0).is_valid());
        assert!(GeoPoint::new(90.0, 180.0).is_valid());
        assert!(GeoPoint::new(-90.0, -180.0).is_valid());
        assert!(!GeoPoint::new(91.0, 0.0).is_valid());
        assert!(!GeoPoint::new(0.0, -181.0).is_valid());
        assert!(NORTH_POLE.is_valid());
    }

    #[test]
    fn test_try_new_rejects_out_of_range() {
        assert!(GeoPoint::try_new(45.0, 90.0).is_ok());
        let err = GeoPoint::try_new(-100.0, 200.0).unwrap_err();
        assert!(matches!(err, GeoError::OutOfRange { .. }));
    }

    #[test]
    fn test_parse_pair() {
        let point: GeoPoint = " 38.5 , -35 ".parse().unwrap();
        assert_eq!(point, GeoPoint::new(38.5, -35.0));

        assert!("38.5".parse::<GeoPoint>().is_err());
        assert!("north,35".parse::<GeoPoint>().is_err());
    }

    #[test]
    fn test_point_from_tuple() {
        let point: GeoPoint = (2.0, 54.0).into();
        assert_eq!(point.longitude, 54.0);
    }
}
