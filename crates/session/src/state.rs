//! Session state and its input handlers
//!
//! Every handler is synchronous and touches only the session; anything that
//! needs I/O is returned to the caller as a request (see [`LookupRequest`]).

use chrono::{DateTime, Utc};
use geolocator_core::config::StalePolicy;
use geolocator_geo::{
    distance_between, moon_distance_km, round_km, validate, Field, GeoPoint, ValidationState,
    NORTH_POLE,
};
use geolocator_geocode::{PlaceQuery, PlaceResponse};
use serde::Serialize;
use std::fmt;

/// Automatically detected position
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "state", content = "point", rename_all = "lowercase")]
pub enum AutoPosition {
    /// Still waiting for the position source; permanent if it fails
    Loading,
    /// Position acquired
    Located(GeoPoint),
}

/// Place name shown for the manual coordinates
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "name", rename_all = "lowercase")]
pub enum PlaceDisplay {
    /// No lookup has completed yet
    Waiting,
    /// A lookup completed; `None` means the response named nothing
    Resolved(Option<String>),
}

impl fmt::Display for PlaceDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaceDisplay::Waiting => write!(f, "Waiting for input"),
            PlaceDisplay::Resolved(Some(name)) => write!(f, "{name}"),
            PlaceDisplay::Resolved(None) => Ok(()),
        }
    }
}

/// Distances derived from the automatic position, whole kilometers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Distances {
    /// Great-circle distance to the North Pole reference point
    pub north_pole_km: i64,
    /// Earth-Moon distance at acquisition time
    pub moon_km: i64,
}

impl Distances {
    /// Compute both distances for `point` at instant `at`
    pub fn compute(point: &GeoPoint, at: DateTime<Utc>) -> Self {
        Self {
            north_pole_km: round_km(distance_between(point, &NORTH_POLE)),
            moon_km: round_km(moon_distance_km(at)),
        }
    }
}

/// Sequence number of an issued place lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct LookupTicket(u64);

impl LookupTicket {
    /// Raw sequence number (1 for the first lookup)
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for LookupTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A place lookup the caller must perform and report back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    /// Ticket to hand back with the response
    pub ticket: LookupTicket,
    /// Coordinates to resolve, as entered
    pub query: PlaceQuery,
}

/// The coordinate session: one owner, mutated only through its handlers
#[derive(Debug, Clone)]
pub struct Session {
    auto: AutoPosition,
    manual_latitude: String,
    manual_longitude: String,
    validation: ValidationState,
    place: PlaceDisplay,
    distances: Option<Distances>,
    stale_policy: StalePolicy,
    issued: u64,
    newest_applied: Option<LookupTicket>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(StalePolicy::default())
    }
}

impl Session {
    /// Fresh session in the loading state
    pub fn new(stale_policy: StalePolicy) -> Self {
        Self {
            auto: AutoPosition::Loading,
            manual_latitude: String::new(),
            manual_longitude: String::new(),
            validation: ValidationState::Waiting,
            place: PlaceDisplay::Waiting,
            distances: None,
            stale_policy,
            issued: 0,
            newest_applied: None,
        }
    }

    /// Record the acquired position and derive the distances.
    ///
    /// Only the first acquisition counts; returns `false` for later ones.
    pub fn position_acquired(&mut self, point: GeoPoint, at: DateTime<Utc>) -> bool {
        if matches!(self.auto, AutoPosition::Located(_)) {
            return false;
        }
        self.auto = AutoPosition::Located(point);
        self.distances = Some(Distances::compute(&point, at));
        true
    }

    /// Replace one manual field; see [`set_manual`](Self::set_manual)
    pub fn set_manual_field(&mut self, field: Field, text: impl Into<String>) -> Option<LookupRequest> {
        let text = text.into();
        match field {
            Field::Latitude => {
                let longitude = self.manual_longitude.clone();
                self.set_manual(text, longitude)
            }
            Field::Longitude => {
                let latitude = self.manual_latitude.clone();
                self.set_manual(latitude, text)
            }
        }
    }

    /// Replace the manual coordinates.
    ///
    /// Re-validates and, when both fields are non-empty, returns a lookup to
    /// issue, whether or not the values are in range. Returns `None` if the
    /// composed value did not change.
    pub fn set_manual(
        &mut self,
        latitude: impl Into<String>,
        longitude: impl Into<String>,
    ) -> Option<LookupRequest> {
        let latitude = latitude.into();
        let longitude = longitude.into();
        if latitude == self.manual_latitude && longitude == self.manual_longitude {
            return None;
        }

        self.manual_latitude = latitude;
        self.manual_longitude = longitude;
        self.validation = validate(&self.manual_latitude, &self.manual_longitude);

        if self.validation.is_waiting() {
            return None;
        }

        self.issued += 1;
        Some(LookupRequest {
            ticket: LookupTicket(self.issued),
            query: PlaceQuery::new(self.manual_latitude.clone(), self.manual_longitude.clone()),
        })
    }

    /// Apply a place response. Returns whether the display changed hands to
    /// this response (it may be dropped under [`StalePolicy::DiscardStale`]).
    pub fn apply_place(&mut self, ticket: LookupTicket, response: &PlaceResponse) -> bool {
        if self.stale_policy == StalePolicy::DiscardStale
            && self.newest_applied.is_some_and(|newest| ticket < newest)
        {
            return false;
        }

        self.place = PlaceDisplay::Resolved(response.display_name().map(str::to_string));
        self.newest_applied = Some(self.newest_applied.map_or(ticket, |newest| newest.max(ticket)));
        true
    }

    /// Automatic position state
    pub fn auto_position(&self) -> AutoPosition {
        self.auto
    }

    /// True until a position has been acquired
    pub fn is_loading(&self) -> bool {
        self.auto == AutoPosition::Loading
    }

    /// Manual latitude text
    pub fn manual_latitude(&self) -> &str {
        &self.manual_latitude
    }

    /// Manual longitude text
    pub fn manual_longitude(&self) -> &str {
        &self.manual_longitude
    }

    /// Current validation state of the manual input
    pub fn validation(&self) -> &ValidationState {
        &self.validation
    }

    /// Current place display
    pub fn place(&self) -> &PlaceDisplay {
        &self.place
    }

    /// Derived distances, once the position is known
    pub fn distances(&self) -> Option<Distances> {
        self.distances
    }

    /// Out-of-order response policy
    pub fn stale_policy(&self) -> StalePolicy {
        self.stale_policy
    }

    /// Number of lookups issued so far
    pub fn lookups_issued(&self) -> u64 {
        self.issued
    }

    /// Serializable copy of everything a front end renders
    pub fn view(&self) -> SessionView {
        let (auto_latitude, auto_longitude) = match self.auto {
            AutoPosition::Loading => (None, None),
            AutoPosition::Located(p) => (Some(p.latitude), Some(p.longitude)),
        };

        SessionView {
            loading: self.is_loading(),
            auto_latitude,
            auto_longitude,
            manual_latitude: self.manual_latitude.clone(),
            manual_longitude: self.manual_longitude.clone(),
            validation: self.validation.clone(),
            place: self.place.clone(),
            distance_to_north_pole_km: self.distances.map(|d| d.north_pole_km),
            distance_to_moon_km: self.distances.map(|d| d.moon_km),
        }
    }
}

/// Rendered fields of a session
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionView {
    pub loading: bool,
    pub auto_latitude: Option<f64>,
    pub auto_longitude: Option<f64>,
    pub manual_latitude: String,
    pub manual_longitude: String,
    pub validation: ValidationState,
    pub place: PlaceDisplay,
    pub distance_to_north_pole_km: Option<i64>,
    pub distance_to_moon_km: Option<i64>,
}
