//! Application-level errors

use domain::DomainError;
use thiserror::Error;

use crate::ports::{GeolocationError, MapsError};

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Platform geolocation error
    #[error(transparent)]
    Geolocation(#[from] GeolocationError),

    /// Map provider error
    #[error(transparent)]
    Maps(#[from] MapsError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ApplicationError {
    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Geolocation(GeolocationError::Timeout | GeolocationError::PositionUnavailable(_))
                | Self::Maps(MapsError::Provider { .. })
        )
    }
}
