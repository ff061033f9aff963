//! Geolocation port
//!
//! Defines the interface to the platform's location capability: a one-shot
//! position read and a cancellable continuous subscription.
//! Implemented by adapters in the infrastructure layer.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::Location;
#[cfg(test)]
use mockall::automock;
use thiserror::Error;
use tokio::sync::mpsc;

/// Geolocation port errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeolocationError {
    #[error("Geolocation is not supported on this platform")]
    UnsupportedPlatform,

    #[error("Location permission denied: {0}")]
    PermissionDenied(String),

    #[error("Location request timed out")]
    Timeout,

    #[error("Position unavailable: {0}")]
    PositionUnavailable(String),
}

/// Options passed to every position request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    /// Ask the platform for its most accurate fix
    pub high_accuracy: bool,
    /// Give up if no fix arrives within this time
    pub timeout: Duration,
    /// Maximum age of a cached fix; zero disables cached results
    pub maximum_age: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_millis(5000),
            maximum_age: Duration::ZERO,
        }
    }
}

/// A single position sample reported by the platform
#[derive(Debug, Clone, PartialEq)]
pub struct PositionFix {
    pub location: Location,
    /// Horizontal accuracy radius in meters
    pub accuracy_meters: Option<f64>,
    pub altitude_meters: Option<f64>,
    /// Ground speed in meters per second
    pub speed_mps: Option<f64>,
    /// Course over ground in degrees from true north
    pub heading_degrees: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

impl PositionFix {
    /// Create a fix carrying only a location
    #[must_use]
    pub const fn new(location: Location, timestamp: DateTime<Utc>) -> Self {
        Self {
            location,
            accuracy_meters: None,
            altitude_meters: None,
            speed_mps: None,
            heading_degrees: None,
            timestamp,
        }
    }

    /// Reduce the fix to its coordinates
    #[must_use]
    pub const fn to_location(&self) -> Location {
        self.location
    }
}

/// One update delivered by a position subscription
pub type PositionUpdate = Result<PositionFix, GeolocationError>;

/// Cancellable subscription to continuous position updates
///
/// Updates arrive in the order the platform produced them. Producers hold the
/// matching [`mpsc::Sender`] and should stop once `Sender::closed` resolves,
/// which happens on [`PositionWatch::cancel`] or drop.
#[derive(Debug)]
pub struct PositionWatch {
    updates: mpsc::Receiver<PositionUpdate>,
    cancelled: bool,
}

impl PositionWatch {
    /// Create a watch and the sender a platform adapter feeds it through
    #[must_use]
    pub fn channel(buffer: usize) -> (mpsc::Sender<PositionUpdate>, Self) {
        let (tx, rx) = mpsc::channel(buffer);
        (tx, Self::new(rx))
    }

    /// Wrap an existing receiver
    #[must_use]
    pub const fn new(updates: mpsc::Receiver<PositionUpdate>) -> Self {
        Self {
            updates,
            cancelled: false,
        }
    }

    /// Wait for the next update
    ///
    /// Returns `None` once the watch is cancelled or the platform ends it.
    pub async fn next(&mut self) -> Option<PositionUpdate> {
        if self.cancelled {
            return None;
        }
        self.updates.recv().await
    }

    /// Cancel the subscription. Calling this more than once is a no-op.
    pub fn cancel(&mut self) {
        if !self.cancelled {
            self.cancelled = true;
            self.updates.close();
        }
    }

    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

impl Drop for PositionWatch {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Port for the platform geolocation capability
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GeolocationPort: Send + Sync {
    /// Whether the host exposes any geolocation capability
    fn is_supported(&self) -> bool;

    /// Read the current position once
    async fn current_position(
        &self,
        options: &PositionOptions,
    ) -> Result<PositionFix, GeolocationError>;

    /// Subscribe to continuous position updates
    async fn watch_position(
        &self,
        options: &PositionOptions,
    ) -> Result<PositionWatch, GeolocationError>;
}
