//! Application configuration
//!
//! Split into focused sub-modules:
//! - `geolocation`: position source selection (gpsd or a fixed location)
//!
//! Map provider settings reuse [`GoogleMapsConfig`] and the initialization
//! retry policy reuses [`RetryPolicy`] directly.

mod geolocation;

use std::path::Path;

use application::RetryPolicy;
use integration_maps::GoogleMapsConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use geolocation::{GeolocationAppConfig, GeolocationProvider, StaticLocationConfig};

use crate::telemetry::TelemetryConfig;

/// Prefix for environment overrides, e.g. `GEOTRACK_MAPS__API_KEY`
pub const ENV_PREFIX: &str = "GEOTRACK";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Google Maps configuration
    #[serde(default)]
    pub maps: GoogleMapsConfig,

    /// Retry policy for loading the map provider
    #[serde(default)]
    pub initialization: RetryPolicy,

    /// Position source configuration
    #[serde(default)]
    pub geolocation: GeolocationAppConfig,

    /// Logging configuration
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load configuration from `config.toml` (if present) and the environment
    ///
    /// Environment variables use the `GEOTRACK_` prefix and `__` between
    /// nested keys, e.g. `GEOTRACK_MAPS__API_KEY`.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::from_sources(
            config::File::with_name("config").required(false),
            Self::environment(),
        )
    }

    /// Load configuration from a specific file, with environment overrides
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, config::ConfigError> {
        Self::from_sources(config::File::from(path.as_ref()), Self::environment())
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("maps.libraries")
            .try_parsing(true)
    }

    fn from_sources<F>(file: F, environment: config::Environment) -> Result<Self, config::ConfigError>
    where
        F: config::Source + Send + Sync + 'static,
    {
        let config = config::Config::builder()
            .add_source(file)
            .add_source(environment)
            .build()?;

        let app: Self = config.try_deserialize()?;
        debug!(
            provider = %app.geolocation.provider,
            api_key_set = app.maps.api_key().is_some(),
            "Configuration loaded"
        );
        Ok(app)
    }

    /// Validate every section
    ///
    /// # Errors
    ///
    /// Returns the first problem found, prefixed with its section name.
    pub fn validate(&self) -> Result<(), String> {
        self.maps.validate().map_err(|e| format!("maps: {e}"))?;
        self.initialization
            .validate()
            .map_err(|e| format!("initialization: {e}"))?;
        self.geolocation
            .validate()
            .map_err(|e| format!("geolocation: {e}"))?;
        self.telemetry
            .validate()
            .map_err(|e| format!("telemetry: {e}"))?;
        Ok(())
    }
}
