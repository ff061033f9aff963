//! gpsd adapter - Implements GeolocationPort using integration_gpsd

use std::fmt;
use std::sync::Arc;

use application::ports::{
    GeolocationError, GeolocationPort, PositionFix, PositionOptions, PositionWatch,
};
use async_trait::async_trait;
use chrono::Utc;
use domain::Location;
use integration_gpsd::{GpsClient, GpsFix, GpsdClient, GpsdConfig, GpsdError};
use tracing::{debug, instrument, warn};

/// Map gpsd failures onto the platform error vocabulary
fn map_gpsd_error(err: GpsdError) -> GeolocationError {
    match err {
        GpsdError::NoFix { .. } => GeolocationError::Timeout,
        GpsdError::ConnectionFailed(msg) | GpsdError::Io(msg) => {
            GeolocationError::PositionUnavailable(msg)
        },
        GpsdError::ConnectionClosed => {
            GeolocationError::PositionUnavailable("gpsd closed the connection".to_string())
        },
    }
}

fn to_position_fix(fix: GpsFix) -> PositionFix {
    PositionFix {
        location: Location::new(fix.latitude, fix.longitude),
        accuracy_meters: fix.horizontal_error_meters,
        altitude_meters: fix.altitude_meters,
        speed_mps: fix.speed_mps,
        heading_degrees: fix.track_degrees,
        timestamp: fix.time.unwrap_or_else(Utc::now),
    }
}

/// Geolocation backed by a gpsd daemon
///
/// High-accuracy requests only accept 3D fixes. gpsd reports live fixes, so
/// `maximum_age` has no effect. A watch reports [`GeolocationError::Timeout`]
/// each time `timeout` passes without a fix and keeps watching.
pub struct GpsdGeolocationAdapter {
    client: Arc<dyn GpsClient>,
    buffer: usize,
}

impl fmt::Debug for GpsdGeolocationAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GpsdGeolocationAdapter")
            .field("client", &"GpsClient")
            .field("buffer", &self.buffer)
            .finish()
    }
}

impl GpsdGeolocationAdapter {
    /// Create an adapter for the configured daemon
    pub fn new(config: &GpsdConfig) -> Self {
        Self::with_client(
            Arc::new(GpsdClient::new(config.clone())),
            config.channel_buffer,
        )
    }

    /// Create an adapter over any GPS client
    pub fn with_client(client: Arc<dyn GpsClient>, buffer: usize) -> Self {
        Self {
            client,
            buffer: buffer.max(1),
        }
    }
}

#[async_trait]
impl GeolocationPort for GpsdGeolocationAdapter {
    fn is_supported(&self) -> bool {
        true
    }

    #[instrument(skip(self))]
    async fn current_position(
        &self,
        options: &PositionOptions,
    ) -> Result<PositionFix, GeolocationError> {
        let fix = self
            .client
            .current_fix(options.high_accuracy, options.timeout)
            .await
            .map_err(|e| {
                warn!(error = %e, "gpsd position read failed");
                map_gpsd_error(e)
            })?;

        Ok(to_position_fix(fix))
    }

    #[instrument(skip(self))]
    async fn watch_position(
        &self,
        options: &PositionOptions,
    ) -> Result<PositionWatch, GeolocationError> {
        let mut fixes = self
            .client
            .watch(options.high_accuracy)
            .await
            .map_err(map_gpsd_error)?;
        let (tx, watch) = PositionWatch::channel(self.buffer);
        let fix_timeout = options.timeout;

        tokio::spawn(async move {
            loop {
                let update = tokio::select! {
                    () = tx.closed() => {
                        debug!("Position watch cancelled");
                        break;
                    }
                    next = tokio::time::timeout(fix_timeout, fixes.recv()) => match next {
                        Ok(Some(result)) => result.map(to_position_fix).map_err(map_gpsd_error),
                        Ok(None) => break,
                        Err(_) => {
                            debug!(timeout = ?fix_timeout, "No fix within the watch timeout");
                            Err(GeolocationError::Timeout)
                        },
                    },
                };
                if tx.send(update).await.is_err() {
                    break;
                }
            }
        });

        Ok(watch)
    }
}
