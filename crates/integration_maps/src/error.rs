//! Google Maps error types

use thiserror::Error;

/// Errors that can occur when calling the Google Maps web services
#[derive(Debug, Error)]
pub enum MapsApiError {
    /// Connection to the Maps service failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// HTTP request returned a non-success status
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Failed to parse the response body
    #[error("Parse error: {0}")]
    ParseError(String),

    /// The service answered with a non-OK status
    #[error("Maps API error ({status}): {message}")]
    Api {
        /// Provider status code, e.g. `REQUEST_DENIED`
        status: String,
        /// Provider error message, if any
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Request timeout
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },
}

impl MapsApiError {
    /// Returns true if this error is retryable
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::ConnectionFailed(_) | Self::RequestFailed(_) | Self::Timeout { .. } => true,
            Self::Api { status, .. } => {
                matches!(status.as_str(), "OVER_QUERY_LIMIT" | "UNKNOWN_ERROR")
            },
            Self::ParseError(_) | Self::ConfigurationError(_) => false,
        }
    }

    /// Short status label for the error
    #[must_use]
    pub fn status(&self) -> &str {
        match self {
            Self::ConnectionFailed(_) => "CONNECTION_FAILED",
            Self::RequestFailed(_) => "REQUEST_FAILED",
            Self::ParseError(_) => "PARSE_ERROR",
            Self::Api { status, .. } => status,
            Self::ConfigurationError(_) => "CONFIGURATION_ERROR",
            Self::Timeout { .. } => "TIMEOUT",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(status: &str) -> MapsApiError {
        MapsApiError::Api {
            status: status.to_string(),
            message: String::new(),
        }
    }

    #[test]
    fn retryable_errors() {
        assert!(MapsApiError::ConnectionFailed("test".to_string()).is_retryable());
        assert!(MapsApiError::RequestFailed("HTTP 503".to_string()).is_retryable());
        assert!(MapsApiError::Timeout { timeout_secs: 10 }.is_retryable());
        assert!(api("OVER_QUERY_LIMIT").is_retryable());
        assert!(api("UNKNOWN_ERROR").is_retryable());
    }

    #[test]
    fn non_retryable_errors() {
        assert!(!MapsApiError::ParseError("test".to_string()).is_retryable());
        assert!(!MapsApiError::ConfigurationError("test".to_string()).is_retryable());
        assert!(!api("REQUEST_DENIED").is_retryable());
        assert!(!api("INVALID_REQUEST").is_retryable());
    }

    #[test]
    fn status_labels() {
        assert_eq!(api("REQUEST_DENIED").status(), "REQUEST_DENIED");
        assert_eq!(MapsApiError::Timeout { timeout_secs: 1 }.status(), "TIMEOUT");
    }

    #[test]
    fn error_display() {
        let err = MapsApiError::Api {
            status: "REQUEST_DENIED".to_string(),
            message: "The provided API key is invalid.".to_string(),
        };
        assert!(err.to_string().contains("REQUEST_DENIED"));
        assert!(err.to_string().contains("API key is invalid"));

        let err = MapsApiError::Timeout { timeout_secs: 10 };
        assert!(err.to_string().contains("10"));
    }
}
