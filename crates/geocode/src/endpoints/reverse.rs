//! Reverse-geocoding endpoint
//!
//! `GET <base-url>?latitude=<lat>&longitude=<lon>[&localityLanguage=<lang>]`
//!
//! Without coordinates the endpoint geolocates the caller by IP address and
//! echoes the coordinates it used.

use crate::client::GeocodeClient;
use crate::error::{GeocodeError, GeocodeResult};
use geolocator_geo::GeoPoint;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Reverse-geocoding API interface
#[derive(Clone)]
pub struct ReverseGeocodeApi {
    client: GeocodeClient,
}

impl ReverseGeocodeApi {
    /// Create a new reverse-geocoding API interface
    pub(crate) fn new(client: GeocodeClient) -> Self {
        Self { client }
    }

    /// Resolve the place at a coordinate pair
    ///
    /// GET ?latitude=<lat>&longitude=<lon>
    pub async fn lookup(&self, query: &PlaceQuery) -> GeocodeResult<PlaceResponse> {
        self.client.get_query(&self.params(Some(query))).await
    }

    /// Resolve the place at a numeric point
    pub async fn lookup_point(&self, point: &GeoPoint) -> GeocodeResult<PlaceResponse> {
        self.lookup(&PlaceQuery::from(point)).await
    }

    /// Resolve the place with timing information
    pub async fn lookup_timed(
        &self,
        query: &PlaceQuery,
    ) -> GeocodeResult<(PlaceResponse, Duration)> {
        self.client.timed_get_query(&self.params(Some(query))).await
    }

    /// Locate the caller by IP address
    ///
    /// GET (no coordinate parameters)
    pub async fn locate_caller(&self) -> GeocodeResult<PlaceResponse> {
        self.client.get_query(&self.params(None)).await
    }

    /// Approximate position of the caller, from [`locate_caller`](Self::locate_caller)
    pub async fn caller_position(&self) -> GeocodeResult<GeoPoint> {
        self.locate_caller().await?.point()
    }

    fn params(&self, query: Option<&PlaceQuery>) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(3);
        if let Some(query) = query {
            params.push(("latitude", query.latitude.clone()));
            params.push(("longitude", query.longitude.clone()));
        }
        if let Some(ref language) = self.client.config().locality_language {
            params.push(("localityLanguage", language.clone()));
        }
        params
    }
}

/// Coordinates to resolve, as entered
///
/// Text is forwarded verbatim so out-of-range or partially typed values are
/// looked up exactly as the user entered them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlaceQuery {
    /// Latitude text
    pub latitude: String,
    /// Longitude text
    pub longitude: String,
}

impl PlaceQuery {
    /// Create a query from raw text
    pub fn new(latitude: impl Into<String>, longitude: impl Into<String>) -> Self {
        Self {
            latitude: latitude.into(),
            longitude: longitude.into(),
        }
    }
}

impl From<&GeoPoint> for PlaceQuery {
    fn from(point: &GeoPoint) -> Self {
        Self::new(point.latitude.to_string(), point.longitude.to_string())
    }
}

impl fmt::Display for PlaceQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.latitude, self.longitude)
    }
}

/// Reverse-geocoding response
///
/// Every field is optional; oceans and out-of-range coordinates come back
/// with most of them empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceResponse {
    /// Latitude the lookup used
    pub latitude: Option<f64>,
    /// Longitude the lookup used
    pub longitude: Option<f64>,
    /// How the position was obtained (`coordinates`, `ipGeolocation`)
    pub lookup_source: Option<String>,
    /// Continent name
    pub continent: Option<String>,
    /// Country name
    pub country_name: Option<String>,
    /// ISO 3166-1 alpha-2 country code
    pub country_code: Option<String>,
    /// State, province or region
    pub principal_subdivision: Option<String>,
    /// City name
    pub city: Option<String>,
    /// Locality, or a natural feature such as an ocean
    pub locality: Option<String>,
    /// Postal code
    pub postcode: Option<String>,
}

impl PlaceResponse {
    /// Name to display: the country if known, otherwise the locality
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        non_empty(self.country_name.as_deref()).or_else(|| non_empty(self.locality.as_deref()))
    }

    /// Coordinates echoed by the endpoint
    pub fn point(&self) -> GeocodeResult<GeoPoint> {
        let latitude = self.latitude.ok_or(GeocodeError::Incomplete("latitude"))?;
        let longitude = self.longitude.ok_or(GeocodeError::Incomplete("longitude"))?;
        Ok(GeoPoint::new(latitude, longitude))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_country_is_preferred() {
        let json = r#"{
            "latitude": 10,
            "longitude": 20,
            "lookupSource": "coordinates",
            "continent": "Africa",
            "countryName": "Chad",
            "countryCode": "TD",
            "locality": "Ennedi"
        }"#;

        let response: PlaceResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.display_name(), Some("Chad"));
        assert_eq!(response.country_code.as_deref(), Some("TD"));
    }

    #[test]
    fn test_locality_fallback() {
        let json = r#"{"latitude": 2, "longitude": 54, "countryName": "", "locality": "Indian Ocean"}"#;

        let response: PlaceResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.display_name(), Some("Indian Ocean"));
    }

    #[test]
    fn test_nothing_to_display() {
        let response: PlaceResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response.display_name(), None);
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let json = r#"{"countryName": "Turkey", "localityInfo": {"administrative": []}, "plusCode": "8GG"}"#;
        let response: PlaceResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.display_name(), Some("Turkey"));
    }

    #[test]
    fn test_point_requires_coordinates() {
        let response = PlaceResponse {
            latitude: Some(52.52),
            ..Default::default()
        };
        assert!(matches!(
            response.point(),
            Err(GeocodeError::Incomplete("longitude"))
        ));

        let response = PlaceResponse {
            latitude: Some(52.52),
            longitude: Some(13.405),
            ..Default::default()
        };
        assert_eq!(response.point().unwrap(), GeoPoint::new(52.52, 13.405));
    }

    #[test]
    fn test_query_keeps_raw_text() {
        let query = PlaceQuery::new("-100", "200");
        assert_eq!(query.to_string(), "-100, 200");

        let query = PlaceQuery::from(&GeoPoint::new(10.5, -20.0));
        assert_eq!(query.latitude, "10.5");
        assert_eq!(query.longitude, "-20");
    }

    #[test]
    fn test_params_include_language() {
        let client = GeocodeClient::with_config(crate::ClientConfig::default().with_language("de"))
            .unwrap();
        let params = client.reverse().params(Some(&PlaceQuery::new("10", "20")));
        assert_eq!(
            params,
            vec![
                ("latitude", "10".to_string()),
                ("longitude", "20".to_string()),
                ("localityLanguage", "de".to_string()),
            ]
        );

        let client = GeocodeClient::with_config(crate::ClientConfig::default()).unwrap();
        assert!(client.reverse().params(None).is_empty());
    }
}
