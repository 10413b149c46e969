//! Raw telemetry types pushed by the field gateway

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Point-in-time snapshot from the field sensor node
///
/// Every field is optional: the gateway forwards whatever channels reported
/// in the last push, and a missing channel means "no data", never zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    /// Epoch milliseconds of the push
    #[serde(default)]
    pub timestamp: Option<i64>,

    /// Air temperature (°C)
    #[serde(default)]
    pub temperature: Option<f64>,
    /// Relative humidity (%)
    #[serde(default)]
    pub humidity: Option<f64>,

    /// Soil moisture at 15 cm — surface layer (%)
    #[serde(default)]
    pub moisture_15cm: Option<f64>,
    /// Soil moisture at 30 cm — mid layer (%)
    #[serde(default)]
    pub moisture_30cm: Option<f64>,
    /// Soil moisture at 45 cm — root zone (%)
    #[serde(default)]
    pub moisture_45cm: Option<f64>,

    /// Rain sensor digital state
    #[serde(default)]
    pub rain_active: Option<bool>,
    /// Rain intensity (0-100)
    #[serde(default)]
    pub rain_intensity: Option<f64>,
    /// Ambient light (lux)
    #[serde(default)]
    pub light_lux: Option<f64>,
    /// Air quality index (0-100)
    #[serde(default)]
    pub air_quality: Option<f64>,
}

impl SensorReading {
    /// Soil moisture depths in fixed gateway order (15, 30, 45 cm).
    ///
    /// The order is part of the anomaly-report contract and must not change.
    pub fn moisture_depths(&self) -> [(&'static str, Option<f64>); 3] {
        [
            ("moisture_15cm", self.moisture_15cm),
            ("moisture_30cm", self.moisture_30cm),
            ("moisture_45cm", self.moisture_45cm),
        ]
    }
}

/// Generic time-series sample consumed by trend and anomaly functions
///
/// `value` is `None` when the sensor dropped the sample; null samples are
/// filtered out before any computation, never treated as zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimestampedValue {
    /// Epoch milliseconds
    pub timestamp: i64,
    pub value: Option<f64>,
}

impl TimestampedValue {
    pub const fn new(timestamp: i64, value: Option<f64>) -> Self {
        Self { timestamp, value }
    }

    /// Build a sample from a `chrono` instant.
    pub fn at(instant: DateTime<Utc>, value: Option<f64>) -> Self {
        Self {
            timestamp: instant.timestamp_millis(),
            value,
        }
    }
}

/// Elapsed hours between two epoch-millisecond instants.
pub fn hours_between(earlier: i64, later: i64) -> f64 {
    (later - earlier) as f64 / 3_600_000.0
}

/// Daily temperature extremes for Tmax/Tmin heat-unit accumulation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyTemperature {
    /// Daily maximum (°C), `None` if the day had no valid samples
    pub max_temp: Option<f64>,
    /// Daily minimum (°C)
    pub min_temp: Option<f64>,
}

impl DailyTemperature {
    pub const fn new(max_temp: Option<f64>, min_temp: Option<f64>) -> Self {
        Self { max_temp, min_temp }
    }
}

/// Historical series kept by the external time-series store
///
/// The store owns retention and ordering guarantees; the engine sorts
/// defensively and filters null samples on every call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SensorHistory {
    #[serde(default)]
    pub temperature: Vec<TimestampedValue>,
    #[serde(default)]
    pub humidity: Vec<TimestampedValue>,
    /// Surface-layer (15 cm) moisture series
    #[serde(default)]
    pub moisture: Vec<TimestampedValue>,
}
