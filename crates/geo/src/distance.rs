//! Great-circle distance calculation.
//!
//! Uses the spherical law of cosines on a constant-radius Earth. The arc angle
//! is converted to distance through the "60 nautical miles per degree"
//! approximation, then statute miles, then kilometers.

use crate::GeoPoint;

/// Nautical miles covered by one degree of great-circle arc.
pub const NAUTICAL_MILES_PER_DEGREE: f64 = 60.0;

/// Statute miles per nautical mile (rounded historical factor).
const STATUTE_MILES_PER_NAUTICAL_MILE: f64 = 1.1515;

/// Kilometers per statute mile.
pub const KM_PER_STATUTE_MILE: f64 = 1.609344;

/// Calculates the great-circle distance between two points in kilometers.
///
/// Identical points short-circuit to exactly `0.0`. The result is returned at
/// full precision; display code rounds it with [`round_km`].
///
/// # Example
/// ```
/// use geolocator_geo::{distance_between, GeoPoint};
///
/// let berlin = GeoPoint::new(52.5200, 13.4050);
/// let paris = GeoPoint::new(48.8566, 2.3522);
///
/// let km = distance_between(&berlin, &paris);
/// assert!((km - 877.4).abs() < 1.0);
/// ```
#[inline]
pub fn distance_between(a: &GeoPoint, b: &GeoPoint) -> f64 {
    if a.latitude == b.latitude && a.longitude == b.longitude {
        return 0.0;
    }

    let angle_deg = central_angle_cosine(a, b).acos().to_degrees();

    angle_deg * NAUTICAL_MILES_PER_DEGREE * STATUTE_MILES_PER_NAUTICAL_MILE * KM_PER_STATUTE_MILE
}

/// Cosine of the central angle between two points, clamped to `[-1, 1]`.
///
/// Rounding can push the raw value just past 1 for nearly coincident points,
/// or just below -1 for antipodal points away from the equator, where `acos`
/// would return NaN.
#[inline]
fn central_angle_cosine(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let (lat1, _) = a.to_radians();
    let (lat2, _) = b.to_radians();
    let d_lon = (a.longitude - b.longitude).to_radians();

    let cos_angle = lat1.sin() * lat2.sin() + lat1.cos() * lat2.cos() * d_lon.cos();

    cos_angle.clamp(-1.0, 1.0)
}

/// Rounds a distance to the nearest whole kilometer (half away from zero).
#[inline]
pub fn round_km(km: f64) -> i64 {
    km.round() as i64
}
