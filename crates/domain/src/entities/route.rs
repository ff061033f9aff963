//! Route types
//!
//! Provider-neutral representation of a directions request and its result.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value_objects::Location;

/// Mode of travel for a route request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    #[default]
    Driving,
    Walking,
    Bicycling,
    Transit,
}

impl TravelMode {
    /// Lowercase identifier as used in provider query strings
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Driving => "driving",
            Self::Walking => "walking",
            Self::Bicycling => "bicycling",
            Self::Transit => "transit",
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A point-to-point route request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRequest {
    pub origin: Location,
    pub destination: Location,
    pub travel_mode: TravelMode,
    /// Let the provider reorder intermediate waypoints
    pub optimize_waypoints: bool,
}

impl RouteRequest {
    /// Driving request with waypoint optimization enabled
    #[must_use]
    pub const fn driving(origin: Location, destination: Location) -> Self {
        Self {
            origin,
            destination,
            travel_mode: TravelMode::Driving,
            optimize_waypoints: true,
        }
    }
}

/// Status code reported by the directions provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DirectionsStatus {
    Ok,
    NotFound,
    ZeroResults,
    MaxWaypointsExceeded,
    MaxRouteLengthExceeded,
    InvalidRequest,
    OverQueryLimit,
    RequestDenied,
    #[serde(other)]
    UnknownError,
}

impl DirectionsStatus {
    /// Parse a provider status code, mapping unrecognized codes to `UnknownError`
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code {
            "OK" => Self::Ok,
            "NOT_FOUND" => Self::NotFound,
            "ZERO_RESULTS" => Self::ZeroResults,
            "MAX_WAYPOINTS_EXCEEDED" => Self::MaxWaypointsExceeded,
            "MAX_ROUTE_LENGTH_EXCEEDED" => Self::MaxRouteLengthExceeded,
            "INVALID_REQUEST" => Self::InvalidRequest,
            "OVER_QUERY_LIMIT" => Self::OverQueryLimit,
            "REQUEST_DENIED" => Self::RequestDenied,
            _ => Self::UnknownError,
        }
    }

    /// Provider status code
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::NotFound => "NOT_FOUND",
            Self::ZeroResults => "ZERO_RESULTS",
            Self::MaxWaypointsExceeded => "MAX_WAYPOINTS_EXCEEDED",
            Self::MaxRouteLengthExceeded => "MAX_ROUTE_LENGTH_EXCEEDED",
            Self::InvalidRequest => "INVALID_REQUEST",
            Self::OverQueryLimit => "OVER_QUERY_LIMIT",
            Self::RequestDenied => "REQUEST_DENIED",
            Self::UnknownError => "UNKNOWN_ERROR",
        }
    }

    #[must_use]
    pub const fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl fmt::Display for DirectionsStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Result of a successful directions request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteResult {
    /// Alternative routes, best first
    pub routes: Vec<Route>,
}

impl RouteResult {
    /// The provider's preferred route
    #[must_use]
    pub fn primary(&self) -> Option<&Route> {
        self.routes.first()
    }
}

/// A complete route from origin to destination
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Short textual description (usually the main road)
    pub summary: String,
    pub legs: Vec<RouteLeg>,
    /// Order of intermediate waypoints after optimization
    #[serde(default)]
    pub waypoint_order: Vec<usize>,
    /// Encoded polyline of the whole route
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overview_polyline: Option<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl Route {
    /// Sum of all leg distances in meters
    #[must_use]
    pub fn total_distance_meters(&self) -> u64 {
        self.legs.iter().map(|leg| leg.distance_meters).sum()
    }

    /// Sum of all leg durations in seconds
    #[must_use]
    pub fn total_duration_secs(&self) -> u64 {
        self.legs.iter().map(|leg| leg.duration_secs).sum()
    }
}

/// One leg of a route between two consecutive waypoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteLeg {
    pub start_address: String,
    pub end_address: String,
    pub start_location: Location,
    pub end_location: Location,
    pub distance_meters: u64,
    pub duration_secs: u64,
    #[serde(default)]
    pub steps: Vec<RouteStep>,
}

/// A single navigation instruction within a leg
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStep {
    /// Instruction text (may contain provider markup)
    pub instructions: String,
    pub start_location: Location,
    pub end_location: Location,
    pub distance_meters: u64,
    pub duration_secs: u64,
}
