//! Coordinate range validation.
//!
//! Latitude and longitude are checked independently against their own bound,
//! so a pair with both axes out of range reports both messages at once.
//! Validation only starts once both inputs are non-empty; until then the state
//! is [`ValidationState::Waiting`], which is not a failure.
//!
//! This is a bounds check and nothing more. Text that does not parse as a
//! number is coerced to NaN, and NaN passes the check.
//!
//! # Example
//!
//! ```
//! use geolocator_geo::validation::{validate, ValidationState};
//!
//! match validate("-100", "200") {
//!     ValidationState::Checked { latitude, longitude } => {
//!         assert_eq!(latitude.message, "Should be between -90 and 90");
//!         assert_eq!(longitude.message, "Should be between -180 and 180");
//!     }
//!     ValidationState::Waiting => unreachable!(),
//! }
//! ```

use crate::GeoPoint;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest accepted absolute latitude.
pub const MAX_LATITUDE: f64 = 90.0;

/// Largest accepted absolute longitude.
pub const MAX_LONGITUDE: f64 = 180.0;

const LATITUDE_MESSAGE: &str = "Should be between -90 and 90";
const LONGITUDE_MESSAGE: &str = "Should be between -180 and 180";

/// Coordinate axis a validation result refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    /// Latitude axis
    Latitude,
    /// Longitude axis
    Longitude,
}

impl Field {
    fn bound(self) -> f64 {
        match self {
            Field::Latitude => MAX_LATITUDE,
            Field::Longitude => MAX_LONGITUDE,
        }
    }

    fn message(self) -> &'static str {
        match self {
            Field::Latitude => LATITUDE_MESSAGE,
            Field::Longitude => LONGITUDE_MESSAGE,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Latitude => write!(f, "latitude"),
            Field::Longitude => write!(f, "longitude"),
        }
    }
}

/// Outcome of checking one axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldValidation {
    /// Axis that was checked
    pub field: Field,
    /// Whether the value is within range
    pub is_valid: bool,
    /// Inline message; empty when valid
    pub message: String,
}

impl FieldValidation {
    fn check(field: Field, value: f64) -> Self {
        // NaN compares false and is therefore accepted.
        let is_valid = !(value.abs() > field.bound());
        Self {
            field,
            is_valid,
            message: if is_valid {
                String::new()
            } else {
                field.message().to_string()
            },
        }
    }
}

/// Validation state of a latitude/longitude pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum ValidationState {
    /// At least one input is empty; nothing has been checked.
    Waiting,
    /// Both axes were checked.
    Checked {
        /// Latitude result
        latitude: FieldValidation,
        /// Longitude result
        longitude: FieldValidation,
    },
}

impl ValidationState {
    /// True once both axes were checked and both are in range.
    pub fn is_valid(&self) -> bool {
        matches!(
            self,
            ValidationState::Checked { latitude, longitude }
                if latitude.is_valid && longitude.is_valid
        )
    }

    /// True while waiting for input.
    pub fn is_waiting(&self) -> bool {
        matches!(self, ValidationState::Waiting)
    }

    /// Failed field results, latitude first.
    pub fn errors(&self) -> Vec<&FieldValidation> {
        match self {
            ValidationState::Waiting => Vec::new(),
            ValidationState::Checked {
                latitude,
                longitude,
            } => [latitude, longitude]
                .into_iter()
                .filter(|v| !v.is_valid)
                .collect(),
        }
    }

    /// Result for a single axis, if checked.
    pub fn field(&self, field: Field) -> Option<&FieldValidation> {
        match self {
            ValidationState::Waiting => None,
            ValidationState::Checked {
                latitude,
                longitude,
            } => Some(match field {
                Field::Latitude => latitude,
                Field::Longitude => longitude,
            }),
        }
    }
}

/// Validates raw latitude/longitude input.
///
/// Returns [`ValidationState::Waiting`] if either input is empty.
pub fn validate(latitude: &str, longitude: &str) -> ValidationState {
    if latitude.is_empty() || longitude.is_empty() {
        return ValidationState::Waiting;
    }

    ValidationState::Checked {
        latitude: FieldValidation::check(Field::Latitude, coerce(latitude)),
        longitude: FieldValidation::check(Field::Longitude, coerce(longitude)),
    }
}

/// Validates an already-numeric point.
pub fn validate_point(point: &GeoPoint) -> ValidationState {
    ValidationState::Checked {
        latitude: FieldValidation::check(Field::Latitude, point.latitude),
        longitude: FieldValidation::check(Field::Longitude, point.longitude),
    }
}

/// Reads raw input as a number the way a browser's `Number(text)` does.
///
/// Surrounding whitespace is ignored and blank text reads as 0. Infinity is
/// only spelled `Infinity`, `+Infinity` or `-Infinity`; `0x`, `0o` and `0b`
/// prefixes select a radix. Anything else that is not a decimal literal,
/// including `inf` and `nan` in any case, becomes NaN.
pub fn coerce(raw: &str) -> f64 {
    let text = raw.trim();
    match text {
        "" => return 0.0,
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    if let Some((radix, digits)) = radix_literal(text) {
        if digits.is_empty() {
            return f64::NAN;
        }
        return digits
            .chars()
            .try_fold(0.0, |acc, c| {
                c.to_digit(radix)
                    .map(|d| acc * f64::from(radix) + f64::from(d))
            })
            .unwrap_or(f64::NAN);
    }

    // `str::parse` also reads `inf`, `infinity` and `nan`
    if text
        .bytes()
        .any(|b| b.is_ascii_alphabetic() && !matches!(b, b'e' | b'E'))
    {
        return f64::NAN;
    }
    text.parse().unwrap_or(f64::NAN)
}

fn radix_literal(text: &str) -> Option<(u32, &str)> {
    let (prefix, digits) = text.split_at_checked(2)?;
    let radix = match prefix {
        "0x" | "0X" => 16,
        "0o" | "0O" => 8,
        "0b" | "0B" => 2,
        _ => return None,
    };
    Some((radix, digits))
}
