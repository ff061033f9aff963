//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod google_maps_adapter;
mod gpsd_geolocation_adapter;
mod static_geolocation_adapter;

pub use google_maps_adapter::{GoogleDirections, GoogleGeocoder, GoogleMapsLoader};
pub use gpsd_geolocation_adapter::GpsdGeolocationAdapter;
pub use static_geolocation_adapter::StaticGeolocationAdapter;
