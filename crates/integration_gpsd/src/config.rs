//! gpsd connection configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for connecting to a gpsd daemon
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GpsdConfig {
    /// Host gpsd listens on
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port (gpsd default: 2947)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Connection timeout in seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Buffered fixes per watch before the reader applies backpressure
    #[serde(default = "default_channel_buffer")]
    pub channel_buffer: usize,

    /// Pause before a watch reconnects after losing the daemon
    #[serde(default = "default_reconnect_delay_ms")]
    pub reconnect_delay_ms: u64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

const fn default_port() -> u16 {
    2947
}

const fn default_connect_timeout_secs() -> u64 {
    5
}

const fn default_channel_buffer() -> usize {
    32
}

const fn default_reconnect_delay_ms() -> u64 {
    1000
}

impl Default for GpsdConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            connect_timeout_secs: default_connect_timeout_secs(),
            channel_buffer: default_channel_buffer(),
            reconnect_delay_ms: default_reconnect_delay_ms(),
        }
    }
}

impl GpsdConfig {
    /// Create a configuration pointing at a local test listener
    #[must_use]
    pub fn for_testing(port: u16) -> Self {
        Self {
            port,
            connect_timeout_secs: 1,
            channel_buffer: 4,
            reconnect_delay_ms: 50,
            ..Default::default()
        }
    }

    #[must_use]
    pub const fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }

    /// `host:port` socket address string
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.host.is_empty() {
            return Err("host must not be empty".to_string());
        }

        if self.port == 0 {
            return Err("port must be greater than 0".to_string());
        }

        if self.connect_timeout_secs == 0 {
            return Err("connect_timeout_secs must be greater than 0".to_string());
        }

        if self.channel_buffer == 0 {
            return Err("channel_buffer must be greater than 0".to_string());
        }

        Ok(())
    }
}
