//! Spherical geometry as computed by the Maps SDK geometry library
//!
//! The SDK models the earth as a sphere with the WGS84 equatorial radius, so
//! its distances differ slightly from a mean-radius haversine.

use crate::models::LatLng;

/// Earth radius used by the Maps geometry library, in meters
pub const EARTH_RADIUS_METERS: f64 = 6_378_137.0;

/// Angle between two points in radians
fn central_angle(from: LatLng, to: LatLng) -> f64 {
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();
    let half_dlat = (lat2 - lat1) / 2.0;
    let half_dlng = (to.lng - from.lng).to_radians() / 2.0;

    let h = (lat1.cos() * lat2.cos()).mul_add(
        half_dlng.sin().powi(2),
        half_dlat.sin().powi(2),
    );
    2.0 * h.sqrt().min(1.0).asin()
}

/// Shortest distance between two points in meters
#[must_use]
pub fn compute_distance_between(from: LatLng, to: LatLng) -> f64 {
    central_angle(from, to) * EARTH_RADIUS_METERS
}

/// Length of a path in meters
#[must_use]
pub fn compute_length(path: &[LatLng]) -> f64 {
    path.windows(2)
        .map(|pair| compute_distance_between(pair[0], pair[1]))
        .sum()
}
