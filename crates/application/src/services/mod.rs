//! Application services
//!
//! Each service is constructed once by the composition root and shared by
//! handle. None of them depends on another.

mod journey_tracker;
mod map_provider_client;
mod position_reader;
mod retry_policy;

pub use journey_tracker::JourneyTracker;
pub use map_provider_client::{InitializationState, MapProviderClient};
pub use position_reader::PositionReader;
pub use retry_policy::RetryPolicy;
