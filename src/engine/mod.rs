//! Derived-Metrics Engine
//!
//! Pure agronomic computations over raw sensor data - no I/O, no shared
//! state, no ML. Every function is call/return over its arguments; callers
//! schedule recomputation on each telemetry push.
//!
//! ## Instantaneous formulas
//! - `calculate_thi()` / `stress_level()` - heat stress
//! - `calculate_vpd()` / `calculate_cwsi()` - water stress
//! - `dew_point()` / `feels_like()` - auxiliary weather figures
//!
//! ## Window analytics
//! - `accumulated_gdd()` / `growth_stage()` - phenology from heat units
//! - `depletion_rate()` / `infiltration_speed()` - moisture movement
//! - `detect_anomalies()` / `sensor_health()` - sensor plausibility

pub mod anomaly;
pub mod gdd;
pub mod heat_stress;
pub mod moisture;
pub mod water_stress;

pub use anomaly::{
    check_out_of_range, check_stuck_sensor, check_sudden_change, detect_anomalies, sensor_health,
};
pub use gdd::{
    accumulated_gdd, daily_gdd, days_to_next_stage, gdd_from_readings, gdd_summary, growth_stage,
    GddSummary, ReadingGdd, StageEstimate, StageProgress, SUGARCANE_BASE_TEMP,
};
pub use heat_stress::{
    calculate_thi, dew_point, feels_like, stress_level, StressGrade, StressLevel,
    THI_ALERT_THRESHOLD,
};
pub use moisture::{
    depletion_rate, infiltration_speed, irrigation_estimate, moisture_status, DepletionResult,
    InfiltrationResult, InfiltrationSpeed, IrrigationEstimate, MoistureStatus, MoistureStatusKind,
    Trend,
};
pub use water_stress::{calculate_cwsi, calculate_vpd, CwsiResult};

use serde::Serialize;

use crate::types::{Anomaly, SensorHealth, SensorHistory, SensorReading};

/// One-call roll-up of every derived metric the dashboard renders
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldMetrics {
    /// Mean of the soil depths that reported; `None` when none did
    pub avg_moisture: Option<f64>,
    pub thi: Option<f64>,
    pub stress: StressLevel,
    pub cwsi: CwsiResult,
    /// Reading-based GDD pair (dashboard aggregation mode)
    pub gdd: ReadingGdd,
    /// Depletion over the surface moisture series
    pub depletion: DepletionResult,
    pub anomalies: Vec<Anomaly>,
    pub health: SensorHealth,
}

/// Compute the full metric set from the latest snapshot plus history.
///
/// Called on every telemetry push. Absent moisture depths are skipped in
/// the average, not counted as zero.
pub fn field_update(current: &SensorReading, history: &SensorHistory) -> FieldMetrics {
    let depths: Vec<f64> = current
        .moisture_depths()
        .iter()
        .filter_map(|(_, v)| *v)
        .collect();
    let avg_moisture = if depths.is_empty() {
        None
    } else {
        Some(depths.iter().sum::<f64>() / depths.len() as f64)
    };

    let thi = calculate_thi(current.temperature, current.humidity);
    let stress = stress_level(thi);
    let cwsi = calculate_cwsi(current.temperature, current.humidity, avg_moisture);
    let gdd = gdd_from_readings(&history.temperature);
    let depletion = depletion_rate(&history.moisture);
    let anomalies = detect_anomalies(current, history);
    let health = sensor_health(&anomalies);

    FieldMetrics {
        avg_moisture,
        thi,
        stress,
        cwsi,
        gdd,
        depletion,
        anomalies,
        health,
    }
}
