//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer: Google Maps for the map
//! provider, gpsd or a fixed location for geolocation. Also owns configuration
//! loading, logging setup and the service wiring.

pub mod adapters;
pub mod config;
pub mod context;
pub mod telemetry;

pub use adapters::*;
pub use config::{
    AppConfig, GeolocationAppConfig, GeolocationProvider, StaticLocationConfig,
};
pub use context::ServiceContext;
pub use telemetry::{TelemetryConfig, TelemetryError, init_tracing};
