//! Static adapter - Reports a fixed, configured location

use application::ports::{
    GeolocationError, GeolocationPort, PositionFix, PositionOptions, PositionWatch,
};
use async_trait::async_trait;
use chrono::Utc;
use domain::Location;
use tracing::debug;

use crate::config::StaticLocationConfig;

/// Geolocation for hosts without a receiver
///
/// Every read returns the same location. A watch delivers it once and then
/// stays open until cancelled.
#[derive(Debug, Clone)]
pub struct StaticGeolocationAdapter {
    location: Location,
    accuracy_meters: Option<f64>,
}

impl StaticGeolocationAdapter {
    pub const fn new(location: Location) -> Self {
        Self {
            location,
            accuracy_meters: None,
        }
    }

    pub fn from_config(config: &StaticLocationConfig) -> Self {
        Self {
            location: Location::new(config.latitude, config.longitude),
            accuracy_meters: config.accuracy_meters,
        }
    }

    fn fix(&self) -> PositionFix {
        PositionFix {
            accuracy_meters: self.accuracy_meters,
            ..PositionFix::new(self.location, Utc::now())
        }
    }
}

#[async_trait]
impl GeolocationPort for StaticGeolocationAdapter {
    fn is_supported(&self) -> bool {
        true
    }

    async fn current_position(
        &self,
        _options: &PositionOptions,
    ) -> Result<PositionFix, GeolocationError> {
        Ok(self.fix())
    }

    async fn watch_position(
        &self,
        _options: &PositionOptions,
    ) -> Result<PositionWatch, GeolocationError> {
        let (tx, watch) = PositionWatch::channel(1);
        let fix = self.fix();

        tokio::spawn(async move {
            if tx.send(Ok(fix)).await.is_ok() {
                tx.closed().await;
            }
            debug!("Static position watch ended");
        });

        Ok(watch)
    }
}
