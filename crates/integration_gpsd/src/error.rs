//! gpsd error types

use thiserror::Error;

/// Errors that can occur while talking to gpsd
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GpsdError {
    /// Could not connect to the daemon
    #[error("Connection to gpsd failed: {0}")]
    ConnectionFailed(String),

    /// Reading from or writing to the socket failed
    #[error("gpsd I/O error: {0}")]
    Io(String),

    /// The daemon closed the connection
    #[error("gpsd closed the connection")]
    ConnectionClosed,

    /// No usable fix arrived in time
    #[error("No GPS fix within {timeout_ms} ms")]
    NoFix {
        /// The timeout in milliseconds
        timeout_ms: u64,
    },
}

impl GpsdError {
    /// Returns true if this error is retryable
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_) | Self::ConnectionClosed | Self::NoFix { .. }
        )
    }
}

impl From<std::io::Error> for GpsdError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
