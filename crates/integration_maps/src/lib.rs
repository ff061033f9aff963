//! Google Maps Platform integration for Geotrack
//!
//! Provides address geocoding and driving directions via the Google Maps
//! [web services](https://developers.google.com/maps/documentation/geocoding)
//! together with the spherical geometry helpers the Maps SDK ships.
//!
//! # Architecture
//!
//! [`MapsClient`] defines the interface for geocoding and directions,
//! implemented by [`GoogleMapsClient`]. Responses are returned as the raw
//! provider models; status interpretation beyond `OK`/`ZERO_RESULTS` for
//! geocoding is left to the caller.
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_maps::{GoogleMapsClient, GoogleMapsConfig, MapsClient};
//!
//! let config = GoogleMapsConfig::with_api_key("my-key");
//! let client = GoogleMapsClient::new(&config)?;
//!
//! let results = client.geocode("Brandenburger Tor, Berlin").await?;
//! ```

mod client;
mod config;
mod error;
mod models;
pub mod spherical;

pub use client::{GoogleMapsClient, MapsClient};
pub use config::GoogleMapsConfig;
pub use error::MapsApiError;
pub use models::{
    DirectionsLeg, DirectionsQuery, DirectionsResponse, DirectionsRoute, DirectionsStep,
    GeocodeEntry, Geometry, LatLng, Polyline, TextValue,
};
pub use spherical::compute_distance_between;
