//! Moisture depletion, infiltration, and irrigation-timing analytics
//!
//! Depletion is a two-point rate over the reading window; infiltration
//! compares surface against root-zone averages. Both tolerate unsorted
//! input and null samples.

use serde::{Deserialize, Serialize};

use crate::types::{hours_between, GrowthStage, TimestampedValue};

/// Moisture trend over the analyzed window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Depleting,
    Stable,
    Increasing,
}

/// Depletion analysis result
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepletionResult {
    /// Percent change per hour, rounded to 2 decimals; `None` when the
    /// window is too short to measure
    pub rate: Option<f64>,
    pub trend: Trend,
    /// Projected hours until moisture crosses the critical floor, rounded;
    /// only set while actively losing moisture above the floor
    pub hours_until_critical: Option<f64>,
    /// Most recent valid moisture value in the window
    pub current_moisture: Option<f64>,
}

impl DepletionResult {
    /// Neutral result for windows that cannot be measured.
    const fn insufficient() -> Self {
        Self {
            rate: None,
            trend: Trend::Stable,
            hours_until_critical: None,
            current_moisture: None,
        }
    }
}

fn cfg_critical_level() -> f64 {
    if crate::config::is_initialized() {
        crate::config::get().moisture.critical_level
    } else {
        40.0
    }
}

fn cfg_trend_rates() -> (f64, f64) {
    if crate::config::is_initialized() {
        let m = &crate::config::get().moisture;
        (m.depleting_rate, m.increasing_rate)
    } else {
        (-0.5, 0.5)
    }
}

/// Measure the moisture depletion rate over a reading window.
///
/// Sorts ascending by time, drops null samples, and needs at least two
/// usable points spanning a positive interval; anything less returns the
/// neutral "stable" result. While depleting above the critical floor, the
/// crossing time is projected linearly.
pub fn depletion_rate(readings: &[TimestampedValue]) -> DepletionResult {
    let mut valid: Vec<(i64, f64)> = readings
        .iter()
        .filter_map(|r| r.value.map(|v| (r.timestamp, v)))
        .collect();
    if valid.len() < 2 {
        return DepletionResult::insufficient();
    }
    valid.sort_by_key(|(ts, _)| *ts);

    let (first_ts, first_value) = valid[0];
    let (last_ts, last_value) = valid[valid.len() - 1];

    let elapsed = hours_between(first_ts, last_ts);
    if elapsed <= 0.0 {
        return DepletionResult::insufficient();
    }

    let rate = (last_value - first_value) / elapsed;

    let (depleting_below, increasing_above) = cfg_trend_rates();
    let trend = if rate < depleting_below {
        Trend::Depleting
    } else if rate > increasing_above {
        Trend::Increasing
    } else {
        Trend::Stable
    };

    let critical = cfg_critical_level();
    let hours_until_critical = if rate < 0.0 && last_value > critical {
        Some(((last_value - critical) / rate.abs()).round())
    } else {
        None
    };

    DepletionResult {
        rate: Some((rate * 100.0).round() / 100.0),
        trend,
        hours_until_critical,
        current_moisture: Some(last_value),
    }
}

/// Infiltration speed class, from the surface/root-zone differential
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InfiltrationSpeed {
    Slow,
    Moderate,
    Fast,
    Saturated,
}

/// Infiltration analysis result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfiltrationResult {
    pub speed: Option<InfiltrationSpeed>,
    /// Drainage verdict: poor / normal / good / waterlogged / unknown
    pub status: &'static str,
    /// Estimated surface-to-root-zone lag
    pub lag_hours: Option<f64>,
    /// Rounded series averages, for the profile visualization
    pub surface_avg: Option<f64>,
    pub root_avg: Option<f64>,
    pub differential: Option<f64>,
}

fn series_average(readings: &[TimestampedValue]) -> Option<f64> {
    let values: Vec<f64> = readings.iter().filter_map(|r| r.value).collect();
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Classify how quickly surface water reaches the root zone.
///
/// A large surface-over-root differential means water is pooling on top;
/// a non-positive one means the profile is saturated through. Either
/// series empty (after null filtering) yields the unknown result.
pub fn infiltration_speed(
    surface_readings: &[TimestampedValue],
    root_zone_readings: &[TimestampedValue],
) -> InfiltrationResult {
    let (Some(surface_avg), Some(root_avg)) = (
        series_average(surface_readings),
        series_average(root_zone_readings),
    ) else {
        return InfiltrationResult {
            speed: None,
            status: "unknown",
            lag_hours: None,
            surface_avg: None,
            root_avg: None,
            differential: None,
        };
    };

    let differential = surface_avg - root_avg;

    let (speed, status, lag_hours) = if differential > 15.0 {
        (InfiltrationSpeed::Slow, "poor", 4.0)
    } else if differential > 8.0 {
        (InfiltrationSpeed::Moderate, "normal", 2.0)
    } else if differential > 0.0 {
        (InfiltrationSpeed::Fast, "good", 1.0)
    } else {
        (InfiltrationSpeed::Saturated, "waterlogged", 0.0)
    };

    InfiltrationResult {
        speed: Some(speed),
        status,
        lag_hours: Some(lag_hours),
        surface_avg: Some(surface_avg.round()),
        root_avg: Some(root_avg.round()),
        differential: Some(differential.round()),
    }
}

/// Irrigation timing projection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IrrigationEstimate {
    /// Hours until moisture reaches the trigger target, rounded; 0 = now
    pub hours_until: f64,
    pub recommended: bool,
}

/// Project when irrigation will be due.
///
/// Non-negative depletion or moisture already at/below target means
/// irrigate now. Otherwise the crossing is projected linearly and
/// irrigation is recommended once it falls inside the planning horizon.
pub fn irrigation_estimate(
    current_moisture: f64,
    depletion_rate: f64,
    target_moisture: f64,
) -> IrrigationEstimate {
    if depletion_rate >= 0.0 || current_moisture <= target_moisture {
        return IrrigationEstimate { hours_until: 0.0, recommended: true };
    }

    let horizon = if crate::config::is_initialized() {
        crate::config::get().moisture.recommend_within_hours
    } else {
        6.0
    };

    let hours_until = (current_moisture - target_moisture) / depletion_rate.abs();
    IrrigationEstimate {
        hours_until: hours_until.round(),
        recommended: hours_until < horizon,
    }
}

/// Moisture verdict against the active growth stage's target band
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoistureStatus {
    pub status: MoistureStatusKind,
    pub label: &'static str,
    pub color: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoistureStatusKind {
    Low,
    Optimal,
    High,
}

/// Judge a moisture reading against the stage's target band.
pub fn moisture_status(value: f64, stage: GrowthStage) -> MoistureStatus {
    let band = stage.moisture_band();
    if value < band.min {
        MoistureStatus {
            status: MoistureStatusKind::Low,
            label: "Low",
            color: "danger",
            message: "Irrigation recommended",
        }
    } else if value > band.max {
        MoistureStatus {
            status: MoistureStatusKind::High,
            label: "High",
            color: "warning",
            message: "Risk of waterlogging",
        }
    } else {
        MoistureStatus {
            status: MoistureStatusKind::Optimal,
            label: "Optimal",
            color: "success",
            message: "Moisture level ideal",
        }
    }
}
