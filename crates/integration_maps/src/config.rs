//! Google Maps configuration

use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Configuration for the Google Maps Platform web services
#[derive(Clone, Serialize, Deserialize)]
pub struct GoogleMapsConfig {
    /// API key (sensitive - uses SecretString)
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,

    /// Base URL for the Maps web services
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Result language
    #[serde(default = "default_language")]
    pub language: String,

    /// Region bias (ccTLD or country code)
    #[serde(default = "default_region")]
    pub region: String,

    /// SDK libraries requested by the loader
    #[serde(default = "default_libraries")]
    pub libraries: Vec<String>,

    /// SDK version channel
    #[serde(default = "default_version")]
    pub version: String,

    /// Geocode cache TTL in minutes (0 to disable caching)
    #[serde(default = "default_cache_ttl_minutes")]
    pub cache_ttl_minutes: u32,
}

impl fmt::Debug for GoogleMapsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleMapsConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("language", &self.language)
            .field("region", &self.region)
            .field("libraries", &self.libraries)
            .field("version", &self.version)
            .field("cache_ttl_minutes", &self.cache_ttl_minutes)
            .finish()
    }
}

fn default_base_url() -> String {
    "https://maps.googleapis.com".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

fn default_language() -> String {
    "en".to_string()
}

fn default_region() -> String {
    "US".to_string()
}

fn default_libraries() -> Vec<String> {
    vec![
        "places".to_string(),
        "geometry".to_string(),
        "directions".to_string(),
    ]
}

fn default_version() -> String {
    "weekly".to_string()
}

const fn default_cache_ttl_minutes() -> u32 {
    60
}

impl Default for GoogleMapsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            language: default_language(),
            region: default_region(),
            libraries: default_libraries(),
            version: default_version(),
            cache_ttl_minutes: default_cache_ttl_minutes(),
        }
    }
}

impl GoogleMapsConfig {
    /// Default configuration with the given API key
    #[must_use]
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(SecretString::from(api_key.into())),
            ..Default::default()
        }
    }

    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            api_key: Some(SecretString::from("test-api-key")),
            timeout_secs: 5,
            cache_ttl_minutes: 0,
            ..Default::default()
        }
    }

    /// Get the API key, if configured
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_ref().map(ExposeSecret::expose_secret)
    }

    /// Check if geocode caching is enabled
    #[must_use]
    pub const fn caching_enabled(&self) -> bool {
        self.cache_ttl_minutes > 0
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.api_key().is_none_or(str::is_empty) {
            return Err("api_key must be set".to_string());
        }

        if self.base_url.is_empty() {
            return Err("base_url must not be empty".to_string());
        }

        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        if self.language.is_empty() {
            return Err("language must not be empty".to_string());
        }

        Ok(())
    }
}
