//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Journey has not been started or has already been stopped
    #[error("Journey is not active")]
    JourneyNotActive,

    /// Journey was started twice
    #[error("Journey is already active")]
    JourneyAlreadyActive,
}
