//! Temperature-Humidity Index and heat-stress classification
//!
//! THI is the evapotranspiration stress proxy the dashboard alerts on.
//! Formula: `THI = 0.8·T + (H/100)·(T − 14.4) + 46.4`

use serde::{Deserialize, Serialize};

/// THI at or above this value raises the dashboard alert
pub const THI_ALERT_THRESHOLD: f64 = 78.0;

/// Heat-stress grade, ordered by ascending THI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StressGrade {
    Unknown,
    Normal,
    Mild,
    Moderate,
    High,
    Severe,
}

/// Heat-stress band with its dashboard presentation fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StressLevel {
    pub level: StressGrade,
    pub label: &'static str,
    /// Severity color tag consumed by the presentation layer
    pub color: &'static str,
    pub is_alert: bool,
    pub message: &'static str,
}

/// Ordered THI bands, scanned first-match-wins.
///
/// Each entry is (exclusive upper bound, band); lower bounds are implied
/// by the previous entry, making every band half-open `[lower, upper)`.
const THI_BANDS: [(f64, StressLevel); 5] = [
    (
        68.0,
        StressLevel {
            level: StressGrade::Normal,
            label: "Normal",
            color: "success",
            is_alert: false,
            message: "Ideal conditions for growth",
        },
    ),
    (
        72.0,
        StressLevel {
            level: StressGrade::Mild,
            label: "Mild Stress",
            color: "info",
            is_alert: false,
            message: "Monitor conditions closely",
        },
    ),
    (
        THI_ALERT_THRESHOLD,
        StressLevel {
            level: StressGrade::Moderate,
            label: "Moderate Stress",
            color: "warning",
            is_alert: false,
            message: "Increased evapotranspiration",
        },
    ),
    (
        82.0,
        StressLevel {
            level: StressGrade::High,
            label: "High Stress",
            color: "danger",
            is_alert: true,
            message: "High evapotranspiration - irrigate!",
        },
    ),
    (
        f64::INFINITY,
        StressLevel {
            level: StressGrade::Severe,
            label: "Severe Stress",
            color: "danger",
            is_alert: true,
            message: "Critical heat stress - immediate action needed",
        },
    ),
];

/// Calculate the Temperature-Humidity Index, rounded to 1 decimal.
///
/// Returns `None` if either input is missing — absence of data is never
/// treated as zero.
pub fn calculate_thi(temperature: Option<f64>, humidity: Option<f64>) -> Option<f64> {
    let t = temperature?;
    let h = humidity?;
    let thi = 0.8 * t + (h / 100.0) * (t - 14.4) + 46.4;
    Some((thi * 10.0).round() / 10.0)
}

/// Classify a THI value into its stress band.
///
/// `None` maps to the unknown band, which never alerts.
pub fn stress_level(thi: Option<f64>) -> StressLevel {
    let Some(thi) = thi else {
        return StressLevel {
            level: StressGrade::Unknown,
            label: "No Data",
            color: "gray",
            is_alert: false,
            message: "Sensor data unavailable",
        };
    };

    for (upper, band) in &THI_BANDS {
        if thi < *upper {
            return band.clone();
        }
    }
    // Unreachable: the last band's upper bound is +inf
    THI_BANDS[THI_BANDS.len() - 1].1.clone()
}

/// Dew point temperature (°C) via the Magnus formula.
pub fn dew_point(temperature: Option<f64>, humidity: Option<f64>) -> Option<f64> {
    let t = temperature?;
    let h = humidity?;
    let a = 17.27;
    let b = 237.7;
    let alpha = (a * t) / (b + t) + (h / 100.0).ln();
    Some(b * alpha / (a - alpha))
}

/// "Feels like" temperature (°C), heat-index approximation.
///
/// The humidity correction only applies from 27 °C upward; below that the
/// air temperature is returned unchanged.
pub fn feels_like(temperature: Option<f64>, humidity: Option<f64>) -> Option<f64> {
    let t = temperature?;
    let h = humidity?;
    if t >= 27.0 {
        let vapor = h / 100.0 * 6.105 * (17.27 * t / (237.7 + t)).exp();
        Some(t + 0.33 * vapor - 4.0)
    } else {
        Some(t)
    }
}
