//! Low-precision lunar ephemeris.
//!
//! Mean-element lunar theory: ecliptic longitude, mean anomaly and mean
//! argument of latitude are linear in days since J2000, with the largest periodic terms
//! added. Good to a few hundred kilometers in distance, which is plenty for a
//! whole-kilometer reading.

use crate::GeoPoint;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

const RAD: f64 = PI / 180.0;
const MS_PER_DAY: f64 = 86_400_000.0;
const J1970: f64 = 2_440_588.0;
const J2000: f64 = 2_451_545.0;

/// Obliquity of the Earth's axis.
const OBLIQUITY: f64 = RAD * 23.4397;

/// Mean Earth-Moon distance term, km.
const MEAN_DISTANCE_KM: f64 = 385_001.0;

/// Amplitude of the distance variation with the mean anomaly, km.
const DISTANCE_AMPLITUDE_KM: f64 = 20_905.0;

/// Position of the Moon as seen by an observer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoonPosition {
    /// Azimuth in radians, measured from south towards west
    pub azimuth: f64,
    /// Altitude above the horizon in radians, refraction applied
    pub altitude: f64,
    /// Distance from the Earth's center in kilometers
    pub distance_km: f64,
    /// Parallactic angle in radians
    pub parallactic_angle: f64,
}

struct MoonCoords {
    right_ascension: f64,
    declination: f64,
    distance_km: f64,
}

fn to_days(at: DateTime<Utc>) -> f64 {
    at.timestamp_millis() as f64 / MS_PER_DAY - 0.5 + J1970 - J2000
}

fn right_ascension(l: f64, b: f64) -> f64 {
    (l.sin() * OBLIQUITY.cos() - b.tan() * OBLIQUITY.sin()).atan2(l.cos())
}

fn declination(l: f64, b: f64) -> f64 {
    (b.sin() * OBLIQUITY.cos() + b.cos() * OBLIQUITY.sin() * l.sin()).asin()
}

fn sidereal_time(d: f64, lw: f64) -> f64 {
    RAD * (280.16 + 360.985_623_5 * d) - lw
}

fn azimuth(h: f64, phi: f64, dec: f64) -> f64 {
    h.sin().atan2(h.cos() * phi.sin() - dec.tan() * phi.cos())
}

fn altitude(h: f64, phi: f64, dec: f64) -> f64 {
    (phi.sin() * dec.sin() + phi.cos() * dec.cos() * h.cos()).asin()
}

/// Refraction correction for an altitude in radians; negative altitudes are
/// treated as the horizon.
fn astro_refraction(h: f64) -> f64 {
    let h = h.max(0.0);
    0.000_296_7 / (h + 0.003_125_36 / (h + 0.089_011_79)).tan()
}

fn moon_coords(d: f64) -> MoonCoords {
    let mean_longitude = RAD * (218.316 + 13.176_396 * d);
    let mean_anomaly = RAD * (134.963 + 13.064_993 * d);
    let argument_of_latitude = RAD * (93.272 + 13.229_350 * d);

    let l = mean_longitude + RAD * 6.289 * mean_anomaly.sin();
    let b = RAD * 5.128 * argument_of_latitude.sin();

    MoonCoords {
        right_ascension: right_ascension(l, b),
        declination: declination(l, b),
        distance_km: MEAN_DISTANCE_KM - DISTANCE_AMPLITUDE_KM * mean_anomaly.cos(),
    }
}

/// Moon position for an observer at `observer` and instant `at`.
pub fn moon_position(at: DateTime<Utc>, observer: &GeoPoint) -> MoonPosition {
    let lw = RAD * -observer.longitude;
    let phi = RAD * observer.latitude;
    let d = to_days(at);

    let coords = moon_coords(d);
    let hour_angle = sidereal_time(d, lw) - coords.right_ascension;
    let h = altitude(hour_angle, phi, coords.declination);
    let parallactic_angle = hour_angle
        .sin()
        .atan2(phi.tan() * coords.declination.cos() - coords.declination.sin() * hour_angle.cos());

    MoonPosition {
        azimuth: azimuth(hour_angle, phi, coords.declination),
        altitude: h + astro_refraction(h),
        distance_km: coords.distance_km,
        parallactic_angle,
    }
}

/// Earth-Moon distance in kilometers at `at`.
///
/// Under this theory the distance does not depend on the observer.
pub fn moon_distance_km(at: DateTime<Utc>) -> f64 {
    moon_coords(to_days(at)).distance_km
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn j2000_epoch() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_days_since_epoch() {
        assert!(to_days(j2000_epoch()).abs() < 1e-9);
        let next_day = Utc.with_ymd_and_hms(2000, 1, 2, 12, 0, 0).unwrap();
        assert!((to_days(next_day) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_distance_at_epoch() {
        let km = moon_distance_km(j2000_epoch());
        assert!((km - 399_773.5).abs() < 1.0, "distance: {}", km);
    }

    #[test]
    fn test_distance_within_orbit_bounds() {
        let start = j2000_epoch();
        for day in 0..60 {
            let km = moon_distance_km(start + chrono::Duration::hours(day * 12));
            assert!(km >= MEAN_DISTANCE_KM - DISTANCE_AMPLITUDE_KM);
            assert!(km <= MEAN_DISTANCE_KM + DISTANCE_AMPLITUDE_KM);
        }
    }

    #[test]
    fn test_position_distance_matches_plain_distance() {
        let at = Utc.with_ymd_and_hms(2024, 3, 15, 18, 30, 0).unwrap();
        let position = moon_position(at, &GeoPoint::new(10.543, 20.123));
        assert_eq!(position.distance_km, moon_distance_km(at));
        assert!(position.altitude.abs() <= PI / 2.0 + 0.01);
        assert!(position.azimuth.abs() <= PI);
    }

    #[test]
    fn test_refraction_clamps_below_horizon() {
        assert_eq!(astro_refraction(-0.2), astro_refraction(0.0));
        assert!(astro_refraction(0.0) > astro_refraction(0.5));
    }
}
