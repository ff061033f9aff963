//! Position source configuration

use std::fmt;

use integration_gpsd::GpsdConfig;
use serde::{Deserialize, Serialize};

/// Which position source backs the geolocation port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeolocationProvider {
    /// A gpsd daemon with an attached receiver (default)
    #[default]
    Gpsd,
    /// A fixed, configured location
    Static,
}

impl fmt::Display for GeolocationProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpsd => write!(f, "gpsd"),
            Self::Static => write!(f, "static"),
        }
    }
}

/// A fixed location for hosts without a receiver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticLocationConfig {
    pub latitude: f64,
    pub longitude: f64,

    /// Reported accuracy in meters
    #[serde(default)]
    pub accuracy_meters: Option<f64>,
}

impl StaticLocationConfig {
    fn validate(&self) -> Result<(), String> {
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(format!("latitude {} out of range", self.latitude));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(format!("longitude {} out of range", self.longitude));
        }
        Ok(())
    }
}

/// Geolocation configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeolocationAppConfig {
    /// Active position source
    #[serde(default)]
    pub provider: GeolocationProvider,

    /// gpsd connection settings
    #[serde(default)]
    pub gpsd: GpsdConfig,

    /// Location reported by the static provider
    #[serde(default)]
    pub static_location: Option<StaticLocationConfig>,
}

impl GeolocationAppConfig {
    /// Validate the settings of the selected provider
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        match self.provider {
            GeolocationProvider::Gpsd => self.gpsd.validate(),
            GeolocationProvider::Static => self
                .static_location
                .as_ref()
                .ok_or_else(|| "static provider requires static_location".to_string())?
                .validate(),
        }
    }
}
