//! Growing Degree Days accumulation and phenological stage inference
//!
//! Heat units drive sugarcane development; accumulated GDD positions the
//! crop inside the stage bands defined in `types::stage`.
//!
//! Two accumulation modes exist and are deliberately kept distinct:
//! - `accumulated_gdd()`: classic daily Tmax/Tmin pairing
//! - `gdd_from_readings()`: raw-reading summation used by the dashboard
//!   aggregation path, which has no max/min pairing available

use serde::{Deserialize, Serialize};

use crate::types::{DailyTemperature, GddBand, GrowthStage, TimestampedValue, GDD_STAGE_BANDS};

/// Sugarcane base temperature (°C) — no development below this
pub const SUGARCANE_BASE_TEMP: f64 = 10.0;

/// Base temperature from field config when initialized, else the constant.
fn cfg_base_temp() -> f64 {
    if crate::config::is_initialized() {
        crate::config::get().gdd.base_temp_c
    } else {
        SUGARCANE_BASE_TEMP
    }
}

/// Stage bands from field config when initialized, else the constants.
fn cfg_stage_bands() -> [(GrowthStage, GddBand); 4] {
    if crate::config::is_initialized() {
        crate::config::get().gdd.ordered_bands()
    } else {
        GDD_STAGE_BANDS
    }
}

/// Heat units for one day: `max(0, (Tmax + Tmin) / 2 − base)`.
///
/// A day missing either extreme contributes zero — the accumulator never
/// invents heat from partial data.
pub fn daily_gdd(max_temp: Option<f64>, min_temp: Option<f64>, base_temp: f64) -> f64 {
    match (max_temp, min_temp) {
        (Some(max), Some(min)) => ((max + min) / 2.0 - base_temp).max(0.0),
        _ => 0.0,
    }
}

/// Sum daily GDD over a date-ordered history.
pub fn accumulated_gdd(history: &[DailyTemperature]) -> f64 {
    let base = cfg_base_temp();
    history
        .iter()
        .map(|day| daily_gdd(day.max_temp, day.min_temp, base))
        .sum()
}

/// Position within the current phenological stage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StageProgress {
    pub stage: GrowthStage,
    /// Percent progress through the stage band, rounded
    pub progress: f64,
    /// Heat units consumed inside this band, rounded
    pub gdd_in_stage: f64,
    /// Heat units remaining to the next band, rounded; 0 at harvest
    pub gdd_to_next: f64,
}

/// Locate accumulated GDD inside the ordered stage bands.
///
/// Linear first-match scan over half-open bands `[min, max)`. At or beyond
/// the maturity band's end the synthetic `Harvest` stage is returned at
/// 100% progress with zero remaining.
pub fn growth_stage(accumulated: f64) -> StageProgress {
    let bands = cfg_stage_bands();
    for (stage, band) in bands {
        if accumulated >= band.min && accumulated < band.max {
            let span = band.max - band.min;
            let progress = (accumulated - band.min) / span * 100.0;
            return StageProgress {
                stage,
                progress: progress.round(),
                gdd_in_stage: (accumulated - band.min).round(),
                gdd_to_next: (band.max - accumulated).round(),
            };
        }
    }

    // Past the final band: harvest-ready, measured from maturity onset
    let maturity_min = bands[bands.len() - 1].1.min;
    StageProgress {
        stage: GrowthStage::Harvest,
        progress: 100.0,
        gdd_in_stage: (accumulated - maturity_min).round(),
        gdd_to_next: 0.0,
    }
}

/// Days until the next stage at the observed accumulation pace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageEstimate {
    pub days: Option<u32>,
    pub next_stage: Option<GrowthStage>,
}

/// Estimate days to the next stage: `ceil(remaining / avg_daily_gdd)`.
///
/// Returns the empty estimate when nothing remains (harvest) or the pace
/// is non-positive — no division by zero, no negative forecasts.
pub fn days_to_next_stage(accumulated: f64, avg_daily_gdd: f64) -> StageEstimate {
    let progress = growth_stage(accumulated);
    if progress.gdd_to_next <= 0.0 || avg_daily_gdd <= 0.0 {
        return StageEstimate { days: None, next_stage: None };
    }

    StageEstimate {
        days: Some((progress.gdd_to_next / avg_daily_gdd).ceil() as u32),
        next_stage: progress.stage.next(),
    }
}

/// Display roll-up for the GDD dashboard card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GddSummary {
    pub total_gdd: f64,
    pub current_stage: GrowthStage,
    pub stage_progress: f64,
    pub days_to_next_stage: Option<u32>,
    pub next_stage: Option<GrowthStage>,
    pub gdd_today: f64,
}

/// Assemble the dashboard summary from accumulated and average daily GDD.
pub fn gdd_summary(accumulated: f64, avg_daily_gdd: f64) -> GddSummary {
    let progress = growth_stage(accumulated);
    let estimate = days_to_next_stage(accumulated, avg_daily_gdd);

    GddSummary {
        total_gdd: accumulated.round(),
        current_stage: progress.stage,
        stage_progress: progress.progress,
        days_to_next_stage: estimate.days,
        next_stage: estimate.next_stage,
        gdd_today: avg_daily_gdd,
    }
}

/// Reading-based accumulation pair (dashboard aggregation mode)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReadingGdd {
    /// Sum of per-reading heat units, rounded
    pub accumulated: f64,
    /// The last valid reading's contribution, rounded
    pub today: f64,
}

/// Sum `max(0, T − base)` over all valid readings in a temperature series.
///
/// Simplified mode that needs no Tmax/Tmin pairing: each reading stands in
/// for a day, and the final valid reading's contribution is reported as
/// "today". Null readings are skipped, never zeroed. This is intentionally
/// not merged with `accumulated_gdd()` — the two modes serve different
/// data shapes.
pub fn gdd_from_readings(readings: &[TimestampedValue]) -> ReadingGdd {
    let base = cfg_base_temp();
    let mut accumulated = 0.0;
    let mut today = 0.0;

    let last_index = readings.len().wrapping_sub(1);
    for (index, reading) in readings.iter().enumerate() {
        if let Some(temp) = reading.value {
            let units = (temp - base).max(0.0);
            accumulated += units;
            if index == last_index {
                today = units;
            }
        }
    }

    ReadingGdd {
        accumulated: accumulated.round(),
        today: today.round(),
    }
}
