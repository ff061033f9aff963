//! Geographic location value object

use serde::{Deserialize, Serialize};
use std::fmt;

/// Mean Earth radius used by the haversine calculation
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// A geographic location with latitude and longitude in degrees
///
/// Coordinates are not range-checked. Out-of-range values are handed to the
/// platform or map provider as-is, which may reject them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Latitude in degrees
    latitude: f64,
    /// Longitude in degrees
    longitude: f64,
}

impl Location {
    /// Create a new location
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Get the latitude
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Get the longitude
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Great-circle distance to another location in meters
    #[must_use]
    pub fn distance_to(&self, other: &Self) -> f64 {
        haversine_distance(self, other)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

impl From<(f64, f64)> for Location {
    fn from((latitude, longitude): (f64, f64)) -> Self {
        Self::new(latitude, longitude)
    }
}

/// Calculate the great-circle distance between two locations in meters
///
/// Uses the haversine formula on a sphere of radius [`EARTH_RADIUS_METERS`].
/// Symmetric, and zero for identical points.
#[must_use]
pub fn haversine_distance(a: &Location, b: &Location) -> f64 {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    let delta_phi = (b.latitude - a.latitude).to_radians();
    let delta_lambda = (b.longitude - a.longitude).to_radians();

    let h = (phi1.cos() * phi2.cos()).mul_add(
        (delta_lambda / 2.0).sin().powi(2),
        (delta_phi / 2.0).sin().powi(2),
    )
    .clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_METERS * c
}
