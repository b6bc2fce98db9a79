//! Configuration for the geocoding client
//!
//! Built from the `[geocoder]` section of the config file, then overridden by
//! environment variables.

use crate::error::{GeocodeError, GeocodeResult};
use geolocator_core::config::GeocoderConfig;
use geolocator_core::retry::RetryConfig;
use std::env;
use std::time::Duration;

/// Overrides the endpoint URL
pub const ENV_GEOCODE_URL: &str = "GEOLOCATOR_GEOCODE_URL";
/// Overrides the request timeout (seconds)
pub const ENV_TIMEOUT_SECS: &str = "GEOLOCATOR_TIMEOUT_SECS";
/// Overrides the locality language
pub const ENV_LANGUAGE: &str = "GEOLOCATOR_LANGUAGE";

/// Client configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Reverse-geocoding endpoint
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Value for the `localityLanguage` query parameter
    pub locality_language: Option<String>,
    /// Retry configuration
    pub retry: RetryConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_schema(&GeocoderConfig::default())
    }
}

impl ClientConfig {
    /// Build from the `[geocoder]` config section
    #[must_use]
    pub fn from_schema(schema: &GeocoderConfig) -> Self {
        Self {
            base_url: schema.base_url.clone(),
            timeout: Duration::from_secs(schema.timeout_secs),
            locality_language: schema.locality_language.clone(),
            retry: schema.retry.clone(),
        }
    }

    /// Create configuration from defaults plus environment variables
    ///
    /// Reads the following environment variables:
    /// - `GEOLOCATOR_GEOCODE_URL`: endpoint URL
    /// - `GEOLOCATOR_TIMEOUT_SECS`: request timeout in seconds
    /// - `GEOLOCATOR_LANGUAGE`: locality language (e.g. `en`, `de`)
    pub fn from_env() -> GeocodeResult<Self> {
        let config = Self::default().with_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides on top of this configuration
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| env::var(key).ok())
    }

    /// Apply overrides read through `lookup`
    #[must_use]
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(ENV_GEOCODE_URL).filter(|s| !s.is_empty()) {
            self.base_url = url;
        }

        if let Some(timeout) = lookup(ENV_TIMEOUT_SECS)
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
        {
            self.timeout = timeout;
        }

        if let Some(language) = lookup(ENV_LANGUAGE).filter(|s| !s.is_empty()) {
            self.locality_language = Some(language);
        }

        self
    }

    /// Builder-style method to set base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Builder-style method to set timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder-style method to set the locality language
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.locality_language = Some(language.into());
        self
    }

    /// Builder-style method to set retry config
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> GeocodeResult<()> {
        if self.base_url.is_empty() {
            return Err(GeocodeError::config("base_url cannot be empty"));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(GeocodeError::InvalidUrl(self.base_url.clone()));
        }

        if self.timeout.is_zero() {
            return Err(GeocodeError::config("timeout cannot be zero"));
        }

        if self.retry.max_attempts == 0 {
            return Err(GeocodeError::config("retry.max_attempts cannot be zero"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geolocator_core::config::DEFAULT_GEOCODE_URL;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_GEOCODE_URL);
        assert!(config.base_url.contains("reverse-geocode-client"));
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert!(config.locality_language.is_none());
    }

    #[test]
    fn test_builder_pattern() {
        let config = ClientConfig::default()
            .with_base_url("http://127.0.0.1:9000/reverse")
            .with_timeout(Duration::from_secs(2))
            .with_language("fr");

        assert_eq!(config.base_url, "http://127.0.0.1:9000/reverse");
        assert_eq!(config.timeout, Duration::from_secs(2));
        assert_eq!(config.locality_language.as_deref(), Some("fr"));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            (ENV_GEOCODE_URL, "https://geo.example.com/reverse"),
            (ENV_TIMEOUT_SECS, "4"),
            (ENV_LANGUAGE, ""),
        ]
        .into_iter()
        .collect();

        let config = ClientConfig::default()
            .with_overrides(|key| vars.get(key).map(|v| (*v).to_string()));

        assert_eq!(config.base_url, "https://geo.example.com/reverse");
        assert_eq!(config.timeout, Duration::from_secs(4));
        assert!(config.locality_language.is_none());
    }

    #[test]
    fn test_unparseable_timeout_is_ignored() {
        let config = ClientConfig::default().with_overrides(|key| {
            (key == ENV_TIMEOUT_SECS).then(|| "soon".to_string())
        });
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_validation() {
        assert!(ClientConfig::default().validate().is_ok());
        assert!(ClientConfig::default().with_base_url("").validate().is_err());
        assert!(matches!(
            ClientConfig::default().with_base_url("geo.example.com").validate(),
            Err(GeocodeError::InvalidUrl(_))
        ));
        assert!(ClientConfig::default()
            .with_timeout(Duration::ZERO)
            .validate()
            .is_err());
    }
}
