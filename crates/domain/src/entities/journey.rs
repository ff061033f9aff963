//! Journey entity
//!
//! Accumulates travelled distance over a sequence of tracked positions.
//! The caller owns the journey and feeds it locations as they arrive.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::value_objects::{Location, haversine_distance};

/// State of a single tracked journey
///
/// `total_distance` only grows while the journey is active and is frozen
/// once [`Journey::stop`] has been called.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Journey {
    is_active: bool,
    start_time: Option<DateTime<Utc>>,
    end_time: Option<DateTime<Utc>>,
    /// Accumulated distance in meters
    total_distance: f64,
    current_location: Option<Location>,
}

impl Journey {
    /// Create an idle journey that has not been started yet
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a journey that is already active, started at `now`
    #[must_use]
    pub fn started_at(now: DateTime<Utc>) -> Self {
        Self {
            is_active: true,
            start_time: Some(now),
            ..Self::default()
        }
    }

    /// Start the journey
    ///
    /// Restarting a stopped journey resets distance and position.
    pub fn start(&mut self, now: DateTime<Utc>) -> Result<(), DomainError> {
        if self.is_active {
            return Err(DomainError::JourneyAlreadyActive);
        }
        *self = Self::started_at(now);
        Ok(())
    }

    /// Record a new position and return the distance added in meters
    ///
    /// The first position of a journey adds nothing.
    pub fn record_position(&mut self, location: Location) -> Result<f64, DomainError> {
        if !self.is_active {
            return Err(DomainError::JourneyNotActive);
        }

        let increment = self
            .current_location
            .as_ref()
            .map_or(0.0, |last| haversine_distance(last, &location));

        self.total_distance += increment;
        self.current_location = Some(location);
        Ok(increment)
    }

    /// Stop the journey, freezing its distance
    pub fn stop(&mut self, now: DateTime<Utc>) -> Result<(), DomainError> {
        if !self.is_active {
            return Err(DomainError::JourneyNotActive);
        }
        self.is_active = false;
        self.end_time = Some(now);
        Ok(())
    }

    /// Whether positions are currently being accumulated
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.is_active
    }

    #[must_use]
    pub const fn start_time(&self) -> Option<DateTime<Utc>> {
        self.start_time
    }

    #[must_use]
    pub const fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }

    /// Total distance travelled in meters
    #[must_use]
    pub const fn total_distance(&self) -> f64 {
        self.total_distance
    }

    #[must_use]
    pub const fn current_location(&self) -> Option<Location> {
        self.current_location
    }

    /// Time spent on the journey
    ///
    /// Measured up to `now` while active, up to the end time once stopped.
    /// `None` if the journey was never started.
    #[must_use]
    pub fn elapsed(&self, now: DateTime<Utc>) -> Option<Duration> {
        let start = self.start_time?;
        let end = self.end_time.unwrap_or(now);
        Some(end - start)
    }
}
