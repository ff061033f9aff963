//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod geolocation_port;
mod map_sdk_port;

#[cfg(test)]
pub use geolocation_port::MockGeolocationPort;
pub use geolocation_port::{
    GeolocationError, GeolocationPort, PositionFix, PositionOptions, PositionUpdate, PositionWatch,
};
#[cfg(test)]
pub use map_sdk_port::{MockDirectionsService, MockGeocoder, MockMapSdkLoader};
pub use map_sdk_port::{
    DirectionsResponse, DirectionsService, GeocodeResult, Geocoder, MapSdkHandles, MapSdkLoader,
    MapsError,
};
