//! Configuration schema definitions

use crate::error::{Error, Result};
use crate::retry::RetryConfig;
use serde::{Deserialize, Serialize};

/// Default reverse-geocoding endpoint (client-side variant, no API key).
pub const DEFAULT_GEOCODE_URL: &str = "https://api.bigdatacloud.net/data/reverse-geocode-client";

/// Root configuration schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ConfigSchema {
    /// Reverse-geocoding client settings
    #[serde(default)]
    pub geocoder: GeocoderConfig,

    /// Where the automatic position comes from
    #[serde(default)]
    pub position: PositionConfig,

    /// Session behaviour
    #[serde(default)]
    pub session: SessionConfig,

    /// Log output
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ConfigSchema {
    /// Check values that serde cannot check on its own
    pub fn validate(&self) -> Result<()> {
        self.geocoder.validate()?;
        self.position.validate()
    }
}

/// Reverse-geocoding client settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocoderConfig {
    /// Endpoint queried with `latitude` and `longitude` parameters
    #[serde(default = "default_geocode_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Language for locality names (`localityLanguage` parameter)
    #[serde(default)]
    pub locality_language: Option<String>,

    /// Retry policy for failed lookups
    #[serde(default)]
    pub retry: RetryConfig,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: default_geocode_url(),
            timeout_secs: default_timeout_secs(),
            locality_language: None,
            retry: RetryConfig::default(),
        }
    }
}

impl GeocoderConfig {
    fn validate(&self) -> Result<()> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(Error::config(format!(
                "geocoder.base_url must start with http:// or https://, got {:?}",
                self.base_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(Error::config("geocoder.timeout_secs cannot be zero"));
        }
        if self.retry.max_attempts == 0 {
            return Err(Error::config("geocoder.retry.max_attempts cannot be zero"));
        }
        let multiplier = self.retry.backoff_multiplier;
        if !multiplier.is_finite() || multiplier < 1.0 {
            return Err(Error::config(format!(
                "geocoder.retry.backoff_multiplier must be at least 1.0, got {multiplier}"
            )));
        }
        Ok(())
    }
}

fn default_geocode_url() -> String {
    DEFAULT_GEOCODE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

/// Kind of position source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionSourceKind {
    /// Approximate position from the caller's IP address
    #[default]
    Ip,
    /// Position given in configuration or on the command line
    Fixed,
}

/// Automatic position settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PositionConfig {
    /// Which source to query at startup
    #[serde(default)]
    pub source: PositionSourceKind,

    /// Latitude for the fixed source
    #[serde(default)]
    pub latitude: Option<f64>,

    /// Longitude for the fixed source
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl PositionConfig {
    fn validate(&self) -> Result<()> {
        if self.source == PositionSourceKind::Fixed
            && (self.latitude.is_none() || self.longitude.is_none())
        {
            return Err(Error::config(
                "position.source = \"fixed\" requires both latitude and longitude",
            ));
        }
        Ok(())
    }
}

/// What to do with a place response that arrives after a newer one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StalePolicy {
    /// Every response is applied as it arrives, so a slow older lookup can
    /// overwrite a newer result
    #[default]
    LastWriteWins,
    /// Responses older than the newest applied one are dropped
    DiscardStale,
}

/// Session behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SessionConfig {
    /// Out-of-order place response handling
    #[serde(default)]
    pub stale_responses: StalePolicy,
}

/// Log output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of compact text
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let schema = ConfigSchema::default();
        assert_eq!(schema.geocoder.base_url, DEFAULT_GEOCODE_URL);
        assert_eq!(schema.geocoder.timeout_secs, 10);
        assert_eq!(schema.position.source, PositionSourceKind::Ip);
        assert_eq!(schema.session.stale_responses, StalePolicy::LastWriteWins);
        assert!(schema.validate().is_ok());
    }

    #[test]
    fn test_parse_full_file() {
        let schema: ConfigSchema = toml::from_str(
            r#"
            [geocoder]
            base_url = "http://localhost:8080/reverse"
            timeout_secs = 3
            locality_language = "de"

            [geocoder.retry]
            max_attempts = 1

            [position]
            source = "fixed"
            latitude = 10.543
            longitude = 20.123

            [session]
            stale_responses = "discard-stale"

            [logging]
            level = "debug"
            json = true
            "#,
        )
        .unwrap();

        assert_eq!(schema.geocoder.locality_language.as_deref(), Some("de"));
        assert_eq!(schema.geocoder.retry.max_attempts, 1);
        assert_eq!(schema.position.latitude, Some(10.543));
        assert_eq!(schema.session.stale_responses, StalePolicy::DiscardStale);
        assert!(schema.logging.json);
        assert!(schema.validate().is_ok());
    }

    #[test]
    fn test_fixed_source_needs_coordinates() {
        let schema: ConfigSchema = toml::from_str("[position]\nsource = \"fixed\"\nlatitude = 1.0").unwrap();
        assert!(schema.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_geocoder_values() {
        let mut schema = ConfigSchema::default();
        schema.geocoder.base_url = "ftp://example.com".to_string();
        assert!(schema.validate().is_err());

        let mut schema = ConfigSchema::default();
        schema.geocoder.timeout_secs = 0;
        assert!(schema.validate().is_err());
    }

    #[test]
    fn test_rejects_shrinking_backoff() {
        let schema: ConfigSchema =
            toml::from_str("[geocoder.retry]\nbackoff_multiplier = -2.0\njitter = false").unwrap();
        assert!(schema.validate().is_err());

        let schema: ConfigSchema =
            toml::from_str("[geocoder.retry]\nbackoff_multiplier = 0.5").unwrap();
        assert!(schema.validate().is_err());

        let schema: ConfigSchema =
            toml::from_str("[geocoder.retry]\nbackoff_multiplier = 1.0").unwrap();
        assert!(schema.validate().is_ok());
    }
}
