//! Service wiring shared by every entry point

use std::sync::Arc;

use application::ports::{GeolocationPort, MapSdkLoader};
use application::{ApplicationError, JourneyTracker, MapProviderClient, PositionReader};
use tracing::info;

use crate::adapters::{GoogleMapsLoader, GpsdGeolocationAdapter, StaticGeolocationAdapter};
use crate::config::{AppConfig, GeolocationProvider};

/// Shared services built from one configuration
///
/// Holds the single map provider session for the process. Cloning is cheap
/// and every clone shares that session.
#[derive(Clone)]
pub struct ServiceContext {
    /// One-shot position reads
    pub position_reader: Arc<PositionReader>,
    /// Map provider facade
    pub maps: MapProviderClient,
    geolocation: Arc<dyn GeolocationPort>,
    config: Arc<AppConfig>,
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("position_reader", &self.position_reader)
            .field("maps", &self.maps)
            .field("provider", &self.config.geolocation.provider)
            .finish_non_exhaustive()
    }
}

impl ServiceContext {
    /// Validate the configuration and build the services
    ///
    /// Nothing touches the network here; the map provider loads on first use.
    pub fn from_config(config: AppConfig) -> Result<Self, ApplicationError> {
        config.validate().map_err(ApplicationError::Configuration)?;

        let geolocation = Self::geolocation_port(&config)?;
        let loader: Arc<dyn MapSdkLoader> = Arc::new(GoogleMapsLoader::new(config.maps.clone()));

        Ok(Self::with_ports(config, geolocation, loader))
    }

    /// Build the services over explicit ports
    pub fn with_ports(
        config: AppConfig,
        geolocation: Arc<dyn GeolocationPort>,
        loader: Arc<dyn MapSdkLoader>,
    ) -> Self {
        let maps = MapProviderClient::new(loader, config.initialization.clone());
        let position_reader = Arc::new(PositionReader::new(Arc::clone(&geolocation)));

        info!(provider = %config.geolocation.provider, "Services ready");

        Self {
            position_reader,
            maps,
            geolocation,
            config: Arc::new(config),
        }
    }

    fn geolocation_port(config: &AppConfig) -> Result<Arc<dyn GeolocationPort>, ApplicationError> {
        Ok(match config.geolocation.provider {
            GeolocationProvider::Gpsd => Arc::new(GpsdGeolocationAdapter::new(&config.geolocation.gpsd)),
            GeolocationProvider::Static => {
                let location = config.geolocation.static_location.as_ref().ok_or_else(|| {
                    ApplicationError::Configuration(
                        "geolocation: static provider requires static_location".to_string(),
                    )
                })?;
                Arc::new(StaticGeolocationAdapter::from_config(location))
            },
        })
    }

    /// A new journey tracker on the shared geolocation port
    ///
    /// Each tracker owns at most one active subscription.
    pub fn journey_tracker(&self) -> JourneyTracker {
        JourneyTracker::new(Arc::clone(&self.geolocation))
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}
