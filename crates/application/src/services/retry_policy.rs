//! Bounded exponential backoff for map provider initialization

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Retry behavior for loading the map provider SDK
///
/// The n-th retry (1-based) waits `base_delay_ms * multiplier^(n-1)`, capped
/// at `max_delay_ms`. With the defaults that is 1000, 2000 and 4000 ms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Delay before the first retry in milliseconds (default: 1000ms)
    #[serde(default = "default_base_delay")]
    pub base_delay_ms: u64,

    /// Upper bound for a single delay in milliseconds (default: 60000ms)
    #[serde(default = "default_max_delay")]
    pub max_delay_ms: u64,

    /// Growth factor between consecutive delays (default: 2.0)
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,

    /// Maximum number of retries after the first failed attempt (default: 3)
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Reset the retry counter when retries are exhausted
    ///
    /// Off by default: the counter then only resets on success, so a fresh
    /// `initialize()` after exhaustion makes a single attempt without retries.
    #[serde(default)]
    pub reset_on_exhaustion: bool,
}

const fn default_base_delay() -> u64 {
    1000
}

const fn default_max_delay() -> u64 {
    60_000
}

const fn default_multiplier() -> f64 {
    2.0
}

const fn default_max_retries() -> u32 {
    3
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            base_delay_ms: default_base_delay(),
            max_delay_ms: default_max_delay(),
            multiplier: default_multiplier(),
            max_retries: default_max_retries(),
            reset_on_exhaustion: false,
        }
    }
}

impl RetryPolicy {
    /// Policy that never retries
    #[must_use]
    pub fn no_retries() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Delay before the given retry (1-based)
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_wrap,
        clippy::cast_sign_loss,
        clippy::cast_possible_truncation
    )]
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1) as i32;
        let delay = (self.base_delay_ms as f64) * self.multiplier.powi(exponent);
        let capped = delay.min(self.max_delay_ms as f64).max(0.0);
        Duration::from_millis(capped as u64)
    }

    /// Validate the policy
    ///
    /// # Errors
    ///
    /// Returns an error if the policy is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.multiplier < 1.0 {
            return Err("multiplier must be at least 1.0".to_string());
        }
        if self.max_delay_ms < self.base_delay_ms {
            return Err("max_delay_ms must not be smaller than base_delay_ms".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.base_delay_ms, 1000);
        assert_eq!(policy.max_retries, 3);
        assert!((policy.multiplier - 2.0).abs() < f64::EPSILON);
        assert!(!policy.reset_on_exhaustion);
    }

    #[test]
    fn delays_double_per_retry() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for_retry(1), Duration::from_millis(1000));
        assert_eq!(policy.delay_for_retry(2), Duration::from_millis(2000));
        assert_eq!(policy.delay_for_retry(3), Duration::from_millis(4000));
    }

    #[test]
    fn retry_zero_uses_base_delay() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for_retry(0), Duration::from_millis(1000));
    }

    #[test]
    fn delay_capped_at_max() {
        let policy = RetryPolicy {
            max_delay_ms: 2500,
            ..RetryPolicy::default()
        };
        assert_eq!(policy.delay_for_retry(2), Duration::from_millis(2000));
        assert_eq!(policy.delay_for_retry(3), Duration::from_millis(2500));
        assert_eq!(policy.delay_for_retry(30), Duration::from_millis(2500));
    }

    #[test]
    fn no_retries_policy() {
        assert_eq!(RetryPolicy::no_retries().max_retries, 0);
    }

    #[test]
    fn validation() {
        assert!(RetryPolicy::default().validate().is_ok());
        assert!(
            RetryPolicy {
                multiplier: 0.5,
                ..RetryPolicy::default()
            }
            .validate()
            .is_err()
        );
        assert!(
            RetryPolicy {
                max_delay_ms: 10,
                ..RetryPolicy::default()
            }
            .validate()
            .is_err()
        );
    }

    #[test]
    fn deserialization_fills_defaults() {
        let json = r#"{"max_retries":5,"reset_on_exhaustion":true}"#;
        let policy: RetryPolicy = serde_json::from_str(json).unwrap();
        assert_eq!(policy.max_retries, 5);
        assert!(policy.reset_on_exhaustion);
        assert_eq!(policy.base_delay_ms, 1000);
    }
}
