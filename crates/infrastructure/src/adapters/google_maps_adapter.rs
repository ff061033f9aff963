//! Google Maps adapter - Implements the map SDK ports using integration_maps

use std::fmt;
use std::sync::Arc;

use application::ports::{
    DirectionsResponse, DirectionsService, GeocodeResult, Geocoder, MapSdkHandles, MapSdkLoader,
    MapsError,
};
use async_trait::async_trait;
use domain::{
    DirectionsStatus, Location, Route, RouteLeg, RouteRequest, RouteResult, RouteStep,
};
use integration_maps::{
    DirectionsLeg, DirectionsQuery, DirectionsRoute, DirectionsStep, GeocodeEntry,
    GoogleMapsClient, GoogleMapsConfig, LatLng, MapsApiError, MapsClient,
};
use tracing::{debug, info, instrument, warn};

fn to_lat_lng(location: &Location) -> LatLng {
    LatLng::new(location.latitude(), location.longitude())
}

fn to_location(lat_lng: LatLng) -> Location {
    Location::new(lat_lng.lat, lat_lng.lng)
}

fn map_api_error(err: &MapsApiError) -> MapsError {
    MapsError::provider(err.status(), err.to_string())
}

fn convert_geocode_entry(entry: GeocodeEntry) -> GeocodeResult {
    GeocodeResult {
        location: to_location(entry.geometry.location),
        formatted_address: entry.formatted_address,
        place_id: entry.place_id,
    }
}

fn convert_step(step: DirectionsStep) -> RouteStep {
    RouteStep {
        instructions: step.html_instructions,
        start_location: to_location(step.start_location),
        end_location: to_location(step.end_location),
        distance_meters: step.distance.value,
        duration_secs: step.duration.value,
    }
}

fn convert_leg(leg: DirectionsLeg) -> RouteLeg {
    RouteLeg {
        start_address: leg.start_address,
        end_address: leg.end_address,
        start_location: to_location(leg.start_location),
        end_location: to_location(leg.end_location),
        distance_meters: leg.distance.value,
        duration_secs: leg.duration.value,
        steps: leg.steps.into_iter().map(convert_step).collect(),
    }
}

fn convert_route(route: DirectionsRoute) -> Route {
    Route {
        summary: route.summary,
        legs: route.legs.into_iter().map(convert_leg).collect(),
        waypoint_order: route.waypoint_order,
        overview_polyline: route.overview_polyline.map(|p| p.points),
        warnings: route.warnings,
    }
}

/// Geocoder handle backed by the Geocoding API
pub struct GoogleGeocoder {
    client: Arc<dyn MapsClient>,
}

impl fmt::Debug for GoogleGeocoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleGeocoder")
            .field("client", &"MapsClient")
            .finish()
    }
}

impl GoogleGeocoder {
    pub fn new(client: Arc<dyn MapsClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Geocoder for GoogleGeocoder {
    #[instrument(skip(self))]
    async fn geocode(&self, address: &str) -> Result<Vec<GeocodeResult>, MapsError> {
        let entries = self.client.geocode(address).await.map_err(|e| {
            warn!(error = %e, "Geocoding failed");
            map_api_error(&e)
        })?;

        debug!(count = entries.len(), "Geocoded address");
        Ok(entries.into_iter().map(convert_geocode_entry).collect())
    }
}

/// Directions handle backed by the Directions API
pub struct GoogleDirections {
    client: Arc<dyn MapsClient>,
}

impl fmt::Debug for GoogleDirections {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleDirections")
            .field("client", &"MapsClient")
            .finish()
    }
}

impl GoogleDirections {
    pub fn new(client: Arc<dyn MapsClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DirectionsService for GoogleDirections {
    #[instrument(skip(self), fields(origin = %request.origin, destination = %request.destination))]
    async fn route(&self, request: &RouteRequest) -> Result<DirectionsResponse, MapsError> {
        let query = DirectionsQuery {
            mode: request.travel_mode.as_str().to_string(),
            optimize_waypoints: request.optimize_waypoints,
            ..DirectionsQuery::driving(to_lat_lng(&request.origin), to_lat_lng(&request.destination))
        };

        let response = self.client.directions(&query).await.map_err(|e| {
            warn!(error = %e, "Directions request failed");
            map_api_error(&e)
        })?;

        let status = DirectionsStatus::from_code(&response.status);
        let result = if status.is_ok() && !response.routes.is_empty() {
            Some(RouteResult {
                routes: response.routes.into_iter().map(convert_route).collect(),
            })
        } else {
            None
        };

        Ok(DirectionsResponse { status, result })
    }
}

/// Loader for the Google Maps Platform
///
/// Loading validates the configuration and builds the HTTP client; geocoder
/// and directions handles share that client.
pub struct GoogleMapsLoader {
    config: GoogleMapsConfig,
}

impl fmt::Debug for GoogleMapsLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleMapsLoader")
            .field("config", &self.config)
            .finish()
    }
}

impl GoogleMapsLoader {
    pub fn new(config: GoogleMapsConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl MapSdkLoader for GoogleMapsLoader {
    #[instrument(skip(self))]
    async fn load(&self) -> Result<MapSdkHandles, MapsError> {
        self.config
            .validate()
            .map_err(|e| MapsError::provider("CONFIGURATION_ERROR", e))?;

        let client: Arc<dyn MapsClient> =
            Arc::new(GoogleMapsClient::new(&self.config).map_err(|e| map_api_error(&e))?);

        info!(
            version = %self.config.version,
            libraries = ?self.config.libraries,
            language = %self.config.language,
            region = %self.config.region,
            "Google Maps loaded"
        );

        Ok(MapSdkHandles::new(
            Arc::new(GoogleGeocoder::new(Arc::clone(&client))),
            Arc::new(GoogleDirections::new(client)),
        ))
    }

    fn compute_distance_between(&self, origin: &Location, destination: &Location) -> f64 {
        integration_maps::compute_distance_between(to_lat_lng(origin), to_lat_lng(destination))
    }
}
