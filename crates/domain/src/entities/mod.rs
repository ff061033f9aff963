//! Domain entities - Objects with identity and lifecycle

mod journey;
mod route;

pub use journey::Journey;
pub use route::{
    DirectionsStatus, Route, RouteLeg, RouteRequest, RouteResult, RouteStep, TravelMode,
};
