//! Value Objects - Immutable, identity-less domain primitives

mod location;

pub use location::{EARTH_RADIUS_METERS, Location, haversine_distance};
