//! Map SDK port
//!
//! Defines the interface to a third-party mapping provider: a loader that
//! establishes a session and hands out geocoder and directions handles, plus
//! the provider's spherical geometry utility.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use domain::{DirectionsStatus, Location, RouteRequest, RouteResult};
#[cfg(test)]
use mockall::automock;
use thiserror::Error;

/// Map provider errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapsError {
    /// Loading the SDK failed and retries are exhausted
    #[error("Failed to initialize map provider after multiple attempts: {0}")]
    InitializationFailed(String),

    /// A handle was missing after initialization
    #[error("Map provider not initialized")]
    NotInitialized,

    /// Geocoding returned no results
    #[error("Location not found: {0}")]
    LocationNotFound(String),

    /// Directions request finished with a non-OK status
    #[error("Failed to get directions: {0}")]
    DirectionsFailed(DirectionsStatus),

    /// Provider rejected the request or could not be reached
    #[error("Map provider error ({status}): {message}")]
    Provider {
        /// Provider status code or transport error class
        status: String,
        message: String,
    },
}

impl MapsError {
    /// Create a provider error
    pub fn provider(status: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            status: status.into(),
            message: message.into(),
        }
    }
}

/// A single geocoding match
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeResult {
    pub location: Location,
    pub formatted_address: Option<String>,
    pub place_id: Option<String>,
}

impl GeocodeResult {
    #[must_use]
    pub const fn new(location: Location) -> Self {
        Self {
            location,
            formatted_address: None,
            place_id: None,
        }
    }
}

/// Raw outcome of a directions request
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionsResponse {
    pub status: DirectionsStatus,
    /// Present when the provider returned routes
    pub result: Option<RouteResult>,
}

/// Address-to-coordinate lookups
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Geocode a free-form address; an empty list means no match
    async fn geocode(&self, address: &str) -> Result<Vec<GeocodeResult>, MapsError>;
}

/// Route computation
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DirectionsService: Send + Sync {
    /// Request routes; non-OK provider statuses are reported in the response
    async fn route(&self, request: &RouteRequest) -> Result<DirectionsResponse, MapsError>;
}

/// Service handles available once the SDK is loaded
///
/// A loader may provide only some services; using a missing one fails with
/// [`MapsError::NotInitialized`].
#[derive(Clone)]
pub struct MapSdkHandles {
    pub geocoder: Option<Arc<dyn Geocoder>>,
    pub directions: Option<Arc<dyn DirectionsService>>,
}

impl MapSdkHandles {
    /// Handles with every service available
    pub fn new(geocoder: Arc<dyn Geocoder>, directions: Arc<dyn DirectionsService>) -> Self {
        Self {
            geocoder: Some(geocoder),
            directions: Some(directions),
        }
    }
}

impl fmt::Debug for MapSdkHandles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapSdkHandles")
            .field("geocoder", &self.geocoder.is_some())
            .field("directions", &self.directions.is_some())
            .finish()
    }
}

/// Loader for a mapping provider SDK
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MapSdkLoader: Send + Sync {
    /// Load the SDK and construct its service handles
    async fn load(&self) -> Result<MapSdkHandles, MapsError>;

    /// Distance in meters using the provider's spherical geometry
    ///
    /// Pure computation, available without a loaded session.
    fn compute_distance_between(&self, origin: &Location, destination: &Location) -> f64;
}
