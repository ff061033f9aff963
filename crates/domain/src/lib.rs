//! Domain layer for Geotrack
//!
//! Contains the location value object, the journey entity, route types and
//! the great-circle distance calculation. This layer performs no I/O.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
