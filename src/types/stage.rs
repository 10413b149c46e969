//! Sugarcane phenological stages and per-stage moisture targets

use serde::{Deserialize, Serialize};

/// Phenological growth stage, ordered by accumulated heat units
///
/// `Harvest` is synthetic: it is never a GDD band of its own, only the
/// state reached once the maturity band is exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GrowthStage {
    Germination,
    Tillering,
    GrandGrowth,
    Maturity,
    Harvest,
}

impl GrowthStage {
    /// Display name used by the dashboard
    pub const fn name(self) -> &'static str {
        match self {
            Self::Germination => "Germination",
            Self::Tillering => "Tillering",
            Self::GrandGrowth => "Grand Growth",
            Self::Maturity => "Maturity",
            Self::Harvest => "Harvest Ready",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Germination => "Sprouting phase - high moisture required",
            Self::Tillering => "Active root & shoot development",
            Self::GrandGrowth => "Maximum cane elongation phase",
            Self::Maturity => "Ripening - reduced water for sugar concentration",
            Self::Harvest => "Heat-unit target reached - ready for harvest",
        }
    }

    /// Typical calendar duration under Maharashtra conditions
    pub const fn duration(self) -> &'static str {
        match self {
            Self::Germination => "0-35 days",
            Self::Tillering => "35-100 days",
            Self::GrandGrowth => "100-270 days",
            Self::Maturity => "270-360 days",
            Self::Harvest => "360+ days",
        }
    }

    /// Stage following this one in GDD order, `None` past harvest.
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Germination => Some(Self::Tillering),
            Self::Tillering => Some(Self::GrandGrowth),
            Self::GrandGrowth => Some(Self::Maturity),
            Self::Maturity => Some(Self::Harvest),
            Self::Harvest => None,
        }
    }

    /// Moisture target band for this stage.
    ///
    /// Reads the field config when initialized, otherwise the built-in
    /// agronomy defaults. `Harvest` reuses the maturity band.
    pub fn moisture_band(self) -> MoistureBand {
        if crate::config::is_initialized() {
            crate::config::get().stages.band_for(self)
        } else {
            default_moisture_band(self)
        }
    }
}

impl std::fmt::Display for GrowthStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Soil-moisture target band (percent) for one growth stage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoistureBand {
    pub min: f64,
    pub max: f64,
    pub optimal: f64,
}

/// Built-in moisture bands per stage (percent).
///
/// Germination needs the wettest profile; maturity is deliberately drier
/// to concentrate sugar.
pub const fn default_moisture_band(stage: GrowthStage) -> MoistureBand {
    match stage {
        GrowthStage::Germination => MoistureBand { min: 70.0, max: 90.0, optimal: 80.0 },
        GrowthStage::Tillering => MoistureBand { min: 65.0, max: 85.0, optimal: 75.0 },
        GrowthStage::GrandGrowth => MoistureBand { min: 60.0, max: 80.0, optimal: 70.0 },
        GrowthStage::Maturity | GrowthStage::Harvest => {
            MoistureBand { min: 50.0, max: 70.0, optimal: 60.0 }
        }
    }
}

/// Accumulated-heat-unit band `[min, max)` for one stage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GddBand {
    pub min: f64,
    pub max: f64,
}

/// GDD stage bands in ascending order. Contiguous and non-overlapping:
/// each band's `max` is the next band's `min`.
pub const GDD_STAGE_BANDS: [(GrowthStage, GddBand); 4] = [
    (GrowthStage::Germination, GddBand { min: 0.0, max: 350.0 }),
    (GrowthStage::Tillering, GddBand { min: 350.0, max: 1000.0 }),
    (GrowthStage::GrandGrowth, GddBand { min: 1000.0, max: 2800.0 }),
    (GrowthStage::Maturity, GddBand { min: 2800.0, max: 4000.0 }),
];

/// Sensor depth metadata for the three-probe soil profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SensorDepth {
    pub depth_cm: u8,
    pub label: &'static str,
}

/// 15 cm probe - top soil
pub const DEPTH_SURFACE: SensorDepth = SensorDepth { depth_cm: 15, label: "Surface" };
/// 30 cm probe - middle layer
pub const DEPTH_MID: SensorDepth = SensorDepth { depth_cm: 30, label: "Mid Zone" };
/// 45 cm probe - deep root moisture
pub const DEPTH_ROOT: SensorDepth = SensorDepth { depth_cm: 45, label: "Root Zone" };

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gdd_bands_contiguous() {
        for pair in GDD_STAGE_BANDS.windows(2) {
            assert!(
                (pair[0].1.max - pair[1].1.min).abs() < f64::EPSILON,
                "{} band must end where {} begins",
                pair[0].0,
                pair[1].0
            );
        }
    }

    #[test]
    fn test_stage_order() {
        assert_eq!(GrowthStage::Germination.next(), Some(GrowthStage::Tillering));
        assert_eq!(GrowthStage::Maturity.next(), Some(GrowthStage::Harvest));
        assert_eq!(GrowthStage::Harvest.next(), None);
    }

    #[test]
    fn test_default_bands_ordered() {
        for stage in [
            GrowthStage::Germination,
            GrowthStage::Tillering,
            GrowthStage::GrandGrowth,
            GrowthStage::Maturity,
        ] {
            let band = default_moisture_band(stage);
            assert!(band.min < band.optimal && band.optimal < band.max);
        }
    }

    #[test]
    fn test_stage_serializes_screaming_snake() {
        let json = serde_json::to_string(&GrowthStage::GrandGrowth).unwrap();
        assert_eq!(json, "\"GRAND_GROWTH\"");
    }
}
