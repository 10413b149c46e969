//! Anomaly records, severities, and per-sensor detection limits

use serde::{Deserialize, Serialize};

/// Anomaly severity, ordered so `High` compares greatest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::Medium => write!(f, "MEDIUM"),
            Self::High => write!(f, "HIGH"),
        }
    }
}

/// Sensor families the detector knows limits for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorKind {
    Moisture,
    Temperature,
    Humidity,
}

impl SensorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Moisture => "moisture",
            Self::Temperature => "temperature",
            Self::Humidity => "humidity",
        }
    }

    /// Detection limits for this sensor family.
    ///
    /// Reads the field config when initialized, otherwise built-in defaults.
    pub fn limits(self) -> SensorLimits {
        if crate::config::is_initialized() {
            crate::config::get().anomaly.limits_for(self)
        } else {
            default_limits(self)
        }
    }
}

impl std::fmt::Display for SensorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Plausibility limits for one sensor family
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorLimits {
    /// Lowest physically plausible reading
    pub min: f64,
    /// Highest physically plausible reading
    pub max: f64,
    /// Fastest plausible change (units per hour)
    pub max_change_per_hour: f64,
    /// Hours of bit-identical readings before the sensor counts as stuck
    pub stuck_threshold_hours: f64,
}

/// Built-in detection limits per sensor family.
pub const fn default_limits(kind: SensorKind) -> SensorLimits {
    match kind {
        SensorKind::Moisture => SensorLimits {
            min: 0.0,
            max: 100.0,
            max_change_per_hour: 20.0,
            stuck_threshold_hours: 6.0,
        },
        SensorKind::Temperature => SensorLimits {
            min: -10.0,
            max: 55.0,
            max_change_per_hour: 10.0,
            stuck_threshold_hours: 6.0,
        },
        SensorKind::Humidity => SensorLimits {
            min: 0.0,
            max: 100.0,
            max_change_per_hour: 30.0,
            stuck_threshold_hours: 6.0,
        },
    }
}

/// Classification of a detected anomaly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyKind {
    OutOfRangeLow,
    OutOfRangeHigh,
    SuddenChange,
    StuckSensor,
}

/// One detected anomaly
///
/// Ephemeral: regenerated from scratch on every evaluation, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    #[serde(rename = "type")]
    pub kind: AnomalyKind,
    pub message: String,
    pub severity: Severity,
    pub sensor_type: SensorKind,
    /// Concrete channel name, e.g. `moisture_15cm`, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sensor: Option<String>,
    /// Observed rate for sudden-change anomalies (units per hour)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_rate: Option<f64>,
    /// The frozen value for stuck-sensor anomalies
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stuck_value: Option<f64>,
}

impl Anomaly {
    pub fn new(kind: AnomalyKind, sensor_type: SensorKind, severity: Severity, message: String) -> Self {
        Self {
            kind,
            message,
            severity,
            sensor_type,
            sensor: None,
            change_rate: None,
            stuck_value: None,
        }
    }
}

/// Overall sensor fleet verdict derived from an anomaly sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Healthy,
    Critical,
    Warning,
    Minor,
}

/// Health verdict plus its dashboard label
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SensorHealth {
    pub status: HealthStatus,
    pub label: &'static str,
}
