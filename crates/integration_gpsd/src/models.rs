//! gpsd JSON protocol models

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A report line from gpsd, keyed on its `class` field
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "class")]
pub enum GpsdMessage {
    /// Time-position-velocity report
    #[serde(rename = "TPV")]
    Tpv(Tpv),

    /// Daemon version banner sent on connect
    #[serde(rename = "VERSION")]
    Version {
        #[serde(default)]
        release: String,
    },

    /// Any other report class (SKY, DEVICES, WATCH, ...)
    #[serde(other)]
    Other,
}

impl GpsdMessage {
    /// Parse one line of gpsd output
    ///
    /// # Errors
    ///
    /// Returns an error if the line is not a gpsd JSON object.
    pub fn parse(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line.trim())
    }
}

/// Quality of a fix as reported in the TPV `mode` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FixMode {
    NoFix,
    TwoD,
    ThreeD,
}

impl FixMode {
    #[must_use]
    pub const fn from_mode(mode: u8) -> Self {
        match mode {
            3 => Self::ThreeD,
            2 => Self::TwoD,
            _ => Self::NoFix,
        }
    }
}

/// Raw TPV report
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Tpv {
    #[serde(default)]
    pub device: Option<String>,
    /// 0 = unknown, 1 = no fix, 2 = 2D, 3 = 3D
    #[serde(default)]
    pub mode: u8,
    #[serde(default)]
    pub time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    /// Altitude, height above ellipsoid
    #[serde(default, rename = "altHAE")]
    pub alt_hae: Option<f64>,
    /// Altitude, MSL (older daemons)
    #[serde(default)]
    pub alt: Option<f64>,
    /// Estimated horizontal position error in meters
    #[serde(default)]
    pub eph: Option<f64>,
    #[serde(default)]
    pub epx: Option<f64>,
    #[serde(default)]
    pub epy: Option<f64>,
    /// Speed over ground in m/s
    #[serde(default)]
    pub speed: Option<f64>,
    /// Course over ground, degrees from true north
    #[serde(default)]
    pub track: Option<f64>,
}

impl Tpv {
    #[must_use]
    pub const fn fix_mode(&self) -> FixMode {
        FixMode::from_mode(self.mode)
    }

    /// Horizontal accuracy, preferring `eph` over the larger of `epx`/`epy`
    #[must_use]
    pub fn horizontal_error(&self) -> Option<f64> {
        self.eph.or(match (self.epx, self.epy) {
            (Some(x), Some(y)) => Some(x.max(y)),
            (x, y) => x.or(y),
        })
    }

    /// Convert to a fix if the report carries a usable position
    #[must_use]
    pub fn to_fix(&self) -> Option<GpsFix> {
        let mode = self.fix_mode();
        if mode < FixMode::TwoD {
            return None;
        }

        Some(GpsFix {
            latitude: self.lat?,
            longitude: self.lon?,
            mode,
            time: self.time,
            altitude_meters: if mode == FixMode::ThreeD {
                self.alt_hae.or(self.alt)
            } else {
                None
            },
            horizontal_error_meters: self.horizontal_error(),
            speed_mps: self.speed,
            track_degrees: self.track,
            device: self.device.clone(),
        })
    }
}

/// A usable position fix
#[derive(Debug, Clone, PartialEq)]
pub struct GpsFix {
    pub latitude: f64,
    pub longitude: f64,
    pub mode: FixMode,
    pub time: Option<DateTime<Utc>>,
    pub altitude_meters: Option<f64>,
    pub horizontal_error_meters: Option<f64>,
    pub speed_mps: Option<f64>,
    pub track_degrees: Option<f64>,
    pub device: Option<String>,
}

impl GpsFix {
    /// Whether this fix satisfies a high-accuracy request
    #[must_use]
    pub fn is_3d(&self) -> bool {
        self.mode == FixMode::ThreeD
    }
}
