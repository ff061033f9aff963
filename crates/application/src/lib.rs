//! Application layer - Use cases and orchestration
//!
//! Contains the position reader, journey tracker and map provider client,
//! together with the port definitions they are written against.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
