//! One-shot device position reads

use std::fmt;
use std::sync::Arc;

use domain::Location;
use tracing::{debug, instrument};

use crate::ports::{GeolocationError, GeolocationPort, PositionOptions};

/// Reads the current device position from the platform
///
/// Every request asks for high accuracy, a 5 second timeout and no cached
/// fixes. Failures are returned as-is; there is no retry.
pub struct PositionReader {
    geolocation: Arc<dyn GeolocationPort>,
    options: PositionOptions,
}

impl fmt::Debug for PositionReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PositionReader")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl PositionReader {
    pub fn new(geolocation: Arc<dyn GeolocationPort>) -> Self {
        Self {
            geolocation,
            options: PositionOptions::default(),
        }
    }

    /// Read the current position
    #[instrument(skip(self))]
    pub async fn get_current_position(&self) -> Result<Location, GeolocationError> {
        if !self.geolocation.is_supported() {
            return Err(GeolocationError::UnsupportedPlatform);
        }

        let fix = self.geolocation.current_position(&self.options).await?;
        debug!(location = %fix.location, accuracy = ?fix.accuracy_meters, "Current position");
        Ok(fix.to_location())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{MockGeolocationPort, PositionFix};
    use chrono::Utc;
    use std::time::Duration;

    #[tokio::test]
    async fn returns_platform_position() {
        let mut port = MockGeolocationPort::new();
        port.expect_is_supported().return_const(true);
        port.expect_current_position()
            .times(1)
            .returning(|_| Ok(PositionFix::new(Location::new(40.7128, -74.006), Utc::now())));

        let reader = PositionReader::new(Arc::new(port));
        let location = reader.get_current_position().await.unwrap();
        assert_eq!(location, Location::new(40.7128, -74.006));
    }

    #[tokio::test]
    async fn requests_high_accuracy_without_cache() {
        let mut port = MockGeolocationPort::new();
        port.expect_is_supported().return_const(true);
        port.expect_current_position()
            .withf(|options| {
                options.high_accuracy
                    && options.timeout == Duration::from_millis(5000)
                    && options.maximum_age.is_zero()
            })
            .times(1)
            .returning(|_| Ok(PositionFix::new(Location::new(0.0, 0.0), Utc::now())));

        let reader = PositionReader::new(Arc::new(port));
        assert!(reader.get_current_position().await.is_ok());
    }

    #[tokio::test]
    async fn unsupported_platform() {
        let mut port = MockGeolocationPort::new();
        port.expect_is_supported().return_const(false);
        port.expect_current_position().never();

        let reader = PositionReader::new(Arc::new(port));
        assert_eq!(
            reader.get_current_position().await,
            Err(GeolocationError::UnsupportedPlatform)
        );
    }

    #[tokio::test]
    async fn platform_errors_propagate() {
        for error in [
            GeolocationError::PermissionDenied("denied".to_string()),
            GeolocationError::Timeout,
            GeolocationError::PositionUnavailable("no satellites".to_string()),
        ] {
            let mut port = MockGeolocationPort::new();
            port.expect_is_supported().return_const(true);
            let returned = error.clone();
            port.expect_current_position()
                .times(1)
                .returning(move |_| Err(returned.clone()));

            let reader = PositionReader::new(Arc::new(port));
            assert_eq!(reader.get_current_position().await, Err(error));
        }
    }
}
