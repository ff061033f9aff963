//! Google Maps web service models
//!
//! Mirrors the JSON returned by the Geocoding and Directions APIs. Fields the
//! client does not use are left out; unknown fields are ignored.

use serde::{Deserialize, Serialize};

/// A coordinate pair as the Maps APIs encode it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// `lat,lng` as used in query parameters
    #[must_use]
    pub fn to_query_value(&self) -> String {
        format!("{},{}", self.lat, self.lng)
    }
}

/// Geometry of a geocoding result
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
    #[serde(default)]
    pub location_type: Option<String>,
}

/// A single geocoding match
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeocodeEntry {
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub place_id: Option<String>,
    pub geometry: Geometry,
}

/// Raw Geocoding API response
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GeocodeResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<GeocodeEntry>,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// Display text with a numeric value (meters or seconds)
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TextValue {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub value: u64,
}

/// Encoded polyline
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Polyline {
    #[serde(default)]
    pub points: String,
}

/// One maneuver within a leg
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DirectionsStep {
    #[serde(default)]
    pub html_instructions: String,
    pub start_location: LatLng,
    pub end_location: LatLng,
    #[serde(default)]
    pub distance: TextValue,
    #[serde(default)]
    pub duration: TextValue,
    #[serde(default)]
    pub travel_mode: Option<String>,
}

/// The part of a route between two consecutive waypoints
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DirectionsLeg {
    #[serde(default)]
    pub start_address: String,
    #[serde(default)]
    pub end_address: String,
    pub start_location: LatLng,
    pub end_location: LatLng,
    #[serde(default)]
    pub distance: TextValue,
    #[serde(default)]
    pub duration: TextValue,
    #[serde(default)]
    pub steps: Vec<DirectionsStep>,
}

/// A candidate route
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DirectionsRoute {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub legs: Vec<DirectionsLeg>,
    #[serde(default)]
    pub waypoint_order: Vec<usize>,
    #[serde(default)]
    pub overview_polyline: Option<Polyline>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

/// Directions API response
///
/// Returned as-is, including non-OK statuses.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DirectionsResponse {
    pub status: String,
    #[serde(default)]
    pub routes: Vec<DirectionsRoute>,
    #[serde(default)]
    pub error_message: Option<String>,
}

impl DirectionsResponse {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == "OK"
    }
}

/// Parameters of a directions request
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionsQuery {
    pub origin: LatLng,
    pub destination: LatLng,
    /// `driving`, `walking`, `bicycling` or `transit`
    pub mode: String,
    pub waypoints: Vec<LatLng>,
    pub optimize_waypoints: bool,
}

impl DirectionsQuery {
    /// Driving directions between two points
    #[must_use]
    pub fn driving(origin: LatLng, destination: LatLng) -> Self {
        Self {
            origin,
            destination,
            mode: "driving".to_string(),
            waypoints: Vec::new(),
            optimize_waypoints: true,
        }
    }

    /// Value of the `waypoints` query parameter, if any
    #[must_use]
    pub fn waypoints_param(&self) -> Option<String> {
        if self.waypoints.is_empty() {
            return None;
        }

        let joined = self
            .waypoints
            .iter()
            .map(LatLng::to_query_value)
            .collect::<Vec<_>>()
            .join("|");

        Some(if self.optimize_waypoints {
            format!("optimize:true|{joined}")
        } else {
            joined
        })
    }
}
