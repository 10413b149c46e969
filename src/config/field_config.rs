//! Field Configuration - agronomy tables as grower-tunable TOML values
//!
//! Every table the engine consumes (GDD stage bands, per-stage moisture
//! targets, anomaly limits, moisture analytics tunables) is a field here.
//! Each struct implements `Default` with values matching the built-in
//! constants, so behavior is unchanged when no config file is present.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use crate::types::{
    default_limits, default_moisture_band, GddBand, GrowthStage, MoistureBand, SensorKind,
    SensorLimits, GDD_STAGE_BANDS,
};

/// Errors from loading or validating a field config file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),
    #[error("failed to parse {0}: {1}")]
    Parse(PathBuf, #[source] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Root configuration for one monitored field.
///
/// Load with `FieldConfig::load()` which searches:
/// 1. `$CANESENSE_CONFIG` env var
/// 2. `./field_config.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FieldConfig {
    /// Field identification
    #[serde(default)]
    pub field: FieldInfo,

    /// Heat-unit accumulation parameters
    #[serde(default)]
    pub gdd: GddConfig,

    /// Per-stage soil-moisture target bands
    #[serde(default)]
    pub stages: StageMoistureConfig,

    /// Moisture analytics tunables
    #[serde(default)]
    pub moisture: MoistureConfig,

    /// Anomaly detection limits per sensor family
    #[serde(default)]
    pub anomaly: AnomalyConfig,
}

/// Field identification block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldInfo {
    pub name: String,
    pub crop: String,
    /// Planting date, used by the presentation layer for calendar overlays
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planting_date: Option<NaiveDate>,
}

impl Default for FieldInfo {
    fn default() -> Self {
        Self {
            name: "unnamed-field".to_string(),
            crop: "sugarcane".to_string(),
            planting_date: None,
        }
    }
}

/// Heat-unit accumulation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GddConfig {
    /// Base temperature below which no development occurs (°C)
    pub base_temp_c: f64,
    /// Stage bands in ascending GDD order; must be contiguous
    pub germination: GddBand,
    pub tillering: GddBand,
    pub grand_growth: GddBand,
    pub maturity: GddBand,
}

impl GddConfig {
    /// GDD band for a stage; `Harvest` has no band of its own.
    pub fn band_for(&self, stage: GrowthStage) -> Option<GddBand> {
        match stage {
            GrowthStage::Germination => Some(self.germination),
            GrowthStage::Tillering => Some(self.tillering),
            GrowthStage::GrandGrowth => Some(self.grand_growth),
            GrowthStage::Maturity => Some(self.maturity),
            GrowthStage::Harvest => None,
        }
    }

    /// Bands in ascending order, paired with their stage.
    pub fn ordered_bands(&self) -> [(GrowthStage, GddBand); 4] {
        [
            (GrowthStage::Germination, self.germination),
            (GrowthStage::Tillering, self.tillering),
            (GrowthStage::GrandGrowth, self.grand_growth),
            (GrowthStage::Maturity, self.maturity),
        ]
    }
}

impl Default for GddConfig {
    fn default() -> Self {
        Self {
            base_temp_c: crate::engine::SUGARCANE_BASE_TEMP,
            germination: GDD_STAGE_BANDS[0].1,
            tillering: GDD_STAGE_BANDS[1].1,
            grand_growth: GDD_STAGE_BANDS[2].1,
            maturity: GDD_STAGE_BANDS[3].1,
        }
    }
}

/// Per-stage soil-moisture target bands (percent)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageMoistureConfig {
    pub germination: MoistureBand,
    pub tillering: MoistureBand,
    pub grand_growth: MoistureBand,
    pub maturity: MoistureBand,
}

impl StageMoistureConfig {
    /// Moisture band for a stage; `Harvest` reuses the maturity band.
    pub fn band_for(&self, stage: GrowthStage) -> MoistureBand {
        match stage {
            GrowthStage::Germination => self.germination,
            GrowthStage::Tillering => self.tillering,
            GrowthStage::GrandGrowth => self.grand_growth,
            GrowthStage::Maturity | GrowthStage::Harvest => self.maturity,
        }
    }
}

impl Default for StageMoistureConfig {
    fn default() -> Self {
        Self {
            germination: default_moisture_band(GrowthStage::Germination),
            tillering: default_moisture_band(GrowthStage::Tillering),
            grand_growth: default_moisture_band(GrowthStage::GrandGrowth),
            maturity: default_moisture_band(GrowthStage::Maturity),
        }
    }
}

/// Moisture analytics tunables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoistureConfig {
    /// Moisture floor (%) the depletion projection counts down to
    pub critical_level: f64,
    /// Default irrigation trigger target (%)
    pub irrigation_target: f64,
    /// Depletion rate (%/h) below which the trend reads "depleting"
    pub depleting_rate: f64,
    /// Rate (%/h) above which the trend reads "increasing"
    pub increasing_rate: f64,
    /// Irrigation is recommended when projected to be due within this many hours
    pub recommend_within_hours: f64,
}

impl Default for MoistureConfig {
    fn default() -> Self {
        Self {
            critical_level: 40.0,
            irrigation_target: 50.0,
            depleting_rate: -0.5,
            increasing_rate: 0.5,
            recommend_within_hours: 6.0,
        }
    }
}

/// Anomaly detection limits per sensor family
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnomalyConfig {
    pub moisture: SensorLimits,
    pub temperature: SensorLimits,
    pub humidity: SensorLimits,
}

impl AnomalyConfig {
    pub fn limits_for(&self, kind: SensorKind) -> SensorLimits {
        match kind {
            SensorKind::Moisture => self.moisture,
            SensorKind::Temperature => self.temperature,
            SensorKind::Humidity => self.humidity,
        }
    }
}

impl Default for AnomalyConfig {
    fn default() -> Self {
        Self {
            moisture: default_limits(SensorKind::Moisture),
            temperature: default_limits(SensorKind::Temperature),
            humidity: default_limits(SensorKind::Humidity),
        }
    }
}

impl FieldConfig {
    /// Load configuration using the standard search order:
    /// 1. `$CANESENSE_CONFIG` environment variable
    /// 2. `./field_config.toml` in the current working directory
    /// 3. Built-in defaults
    pub fn load() -> Self {
        if let Ok(path) = std::env::var("CANESENSE_CONFIG") {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), field = %config.field.name, "Loaded field config from CANESENSE_CONFIG");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from CANESENSE_CONFIG, falling back");
                    }
                }
            } else {
                warn!(path = %path, "CANESENSE_CONFIG points to non-existent file, falling back");
            }
        }

        let local = PathBuf::from("field_config.toml");
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!(field = %config.field.name, "Loaded field config from ./field_config.toml");
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./field_config.toml, using defaults");
                }
            }
        }

        info!("No field_config.toml found — using built-in defaults");
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        let config: Self =
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the table invariants the engine relies on.
    ///
    /// GDD bands must be ascending and contiguous; moisture bands must
    /// bracket their optimal value. Moisture bands are independent per
    /// stage — no cross-stage continuity is required.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let bands = self.gdd.ordered_bands();
        for pair in bands.windows(2) {
            let (prev_stage, prev) = pair[0];
            let (next_stage, next) = pair[1];
            if (prev.max - next.min).abs() > f64::EPSILON {
                return Err(ConfigError::Invalid(format!(
                    "gdd bands must be contiguous: {prev_stage} ends at {} but {next_stage} starts at {}",
                    prev.max, next.min
                )));
            }
        }
        for (stage, band) in bands {
            if band.min >= band.max {
                return Err(ConfigError::Invalid(format!(
                    "gdd band for {stage} has min {} >= max {}",
                    band.min, band.max
                )));
            }
        }

        for stage in [
            GrowthStage::Germination,
            GrowthStage::Tillering,
            GrowthStage::GrandGrowth,
            GrowthStage::Maturity,
        ] {
            let band = self.stages.band_for(stage);
            if !(band.min <= band.optimal && band.optimal <= band.max) {
                return Err(ConfigError::Invalid(format!(
                    "moisture band for {stage} must satisfy min <= optimal <= max, got {}/{}/{}",
                    band.min, band.optimal, band.max
                )));
            }
        }

        if self.moisture.depleting_rate >= self.moisture.increasing_rate {
            return Err(ConfigError::Invalid(
                "moisture.depleting_rate must be below moisture.increasing_rate".to_string(),
            ));
        }

        Ok(())
    }

    /// Serialize the current config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Invalid(format!("serialize failed: {e}")))
    }
}
