//! gpsd integration for Geotrack
//!
//! Reads position fixes from a [gpsd](https://gpsd.io) daemon using its JSON
//! protocol over TCP. The client enables watch mode with
//! `?WATCH={"enable":true,"json":true};` and consumes `TPV` (time-position-velocity)
//! reports; everything else on the stream is ignored.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use integration_gpsd::{GpsdClient, GpsdConfig, GpsClient};
//!
//! let client = GpsdClient::new(GpsdConfig::default());
//! let fix = client.current_fix(true, Duration::from_secs(5)).await?;
//! println!("{}, {}", fix.latitude, fix.longitude);
//! ```

mod client;
mod config;
mod error;
mod models;

pub use client::{FixStream, GpsClient, GpsdClient};
pub use config::GpsdConfig;
pub use error::GpsdError;
pub use models::{FixMode, GpsFix, GpsdMessage, Tpv};
