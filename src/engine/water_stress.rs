//! Vapor Pressure Deficit and Crop Water Stress Index
//!
//! CWSI is a 0-1 water-stress scale: 0 = well-watered, 1 = fully stressed.
//! This is the simplified VPD-normalized variant, optionally penalized by
//! low soil moisture.

use serde::Serialize;

use super::heat_stress::StressGrade;

/// VPD (kPa) at which the normalized index saturates at 1.0
const VPD_SATURATION_KPA: f64 = 3.0;

/// CWSI result with its classification and recommendation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CwsiResult {
    /// Index in [0, 1], `None` when temperature or humidity is missing
    pub value: Option<f64>,
    pub level: StressGrade,
    pub message: &'static str,
    /// Underlying VPD (kPa) the index was derived from
    pub vpd: Option<f64>,
}

/// Calculate Vapor Pressure Deficit (kPa), rounded to 2 decimals.
///
/// Saturation vapor pressure via the Tetens formula, actual vapor pressure
/// scaled by relative humidity.
pub fn calculate_vpd(temperature: Option<f64>, humidity: Option<f64>) -> Option<f64> {
    let t = temperature?;
    let h = humidity?;
    let es = 0.6108 * (17.27 * t / (t + 237.3)).exp();
    let ea = es * (h / 100.0);
    Some(((es - ea) * 100.0).round() / 100.0)
}

/// Calculate the Crop Water Stress Index.
///
/// `VPD / 3` clamped to [0, 1] is the base index; soil moisture below 40%
/// adds 0.2, below 60% adds 0.1, then the sum is re-clamped. Missing
/// temperature or humidity yields an unknown result, never a guess.
pub fn calculate_cwsi(
    temperature: Option<f64>,
    humidity: Option<f64>,
    soil_moisture: Option<f64>,
) -> CwsiResult {
    let Some(vpd) = calculate_vpd(temperature, humidity) else {
        return CwsiResult {
            value: None,
            level: StressGrade::Unknown,
            message: "Insufficient data",
            vpd: None,
        };
    };

    let mut cwsi = (vpd / VPD_SATURATION_KPA).clamp(0.0, 1.0);

    if let Some(moisture) = soil_moisture {
        let penalty = if moisture < 40.0 {
            0.2
        } else if moisture < 60.0 {
            0.1
        } else {
            0.0
        };
        cwsi = (cwsi + penalty).clamp(0.0, 1.0);
    }

    let (level, message) = classify(cwsi);

    CwsiResult {
        value: Some((cwsi * 100.0).round() / 100.0),
        level,
        message,
        vpd: Some(vpd),
    }
}

/// Ordered CWSI bands, first-match-wins on exclusive upper bound.
const CWSI_BANDS: [(f64, StressGrade, &str); 5] = [
    (0.2, StressGrade::Normal, "No water stress - optimal conditions"),
    (0.4, StressGrade::Mild, "Mild stress - monitor closely"),
    (0.6, StressGrade::Moderate, "Moderate stress - consider irrigation"),
    (0.8, StressGrade::High, "High stress - irrigation recommended"),
    (f64::INFINITY, StressGrade::Severe, "Severe stress - immediate irrigation needed"),
];

fn classify(cwsi: f64) -> (StressGrade, &'static str) {
    for (upper, grade, message) in &CWSI_BANDS {
        if cwsi < *upper {
            return (*grade, message);
        }
    }
    let last = CWSI_BANDS[CWSI_BANDS.len() - 1];
    (last.1, last.2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vpd_reference_value() {
        let vpd = calculate_vpd(Some(25.0), Some(60.0)).unwrap();
        assert!((vpd - 1.27).abs() < 0.05, "VPD(25,60) should be ~1.27 kPa, got {vpd}");
    }

    #[test]
    fn test_vpd_round_trip() {
        // ea recovered from es - VPD must match es*H/100 within rounding
        let t: f64 = 25.0;
        let h = 60.0;
        let es = 0.6108 * (17.27 * t / (t + 237.3)).exp();
        let vpd = calculate_vpd(Some(t), Some(h)).unwrap();
        let ea = es - vpd;
        assert!((ea - es * h / 100.0).abs() < 0.01);
    }

    #[test]
    fn test_vpd_saturated_air_is_zero() {
        let vpd = calculate_vpd(Some(30.0), Some(100.0)).unwrap();
        assert!(vpd.abs() < 0.01, "saturated air has no deficit, got {vpd}");
    }

    #[test]
    fn test_cwsi_missing_inputs() {
        let result = calculate_cwsi(None, Some(50.0), Some(60.0));
        assert_eq!(result.value, None);
        assert_eq!(result.level, StressGrade::Unknown);
        assert_eq!(result.vpd, None);
    }

    #[test]
    fn test_cwsi_dry_soil_penalty() {
        // Hot dry air over dry soil: +0.2 penalty pushes toward 1
        let result = calculate_cwsi(Some(35.0), Some(40.0), Some(30.0));
        let value = result.value.unwrap();
        assert!(value <= 1.0, "CWSI must stay clamped to [0,1], got {value}");
        assert!(
            matches!(result.level, StressGrade::High | StressGrade::Severe),
            "low soil moisture in hot dry air should read high/severe, got {:?}",
            result.level
        );
    }

    #[test]
    fn test_cwsi_penalty_tiers() {
        let base = calculate_cwsi(Some(28.0), Some(60.0), None).value.unwrap();
        let damp = calculate_cwsi(Some(28.0), Some(60.0), Some(55.0)).value.unwrap();
        let wet = calculate_cwsi(Some(28.0), Some(60.0), Some(75.0)).value.unwrap();
        assert!((damp - base - 0.1).abs() < 0.011, "moisture <60 adds 0.1");
        assert!((wet - base).abs() < 0.011, "moisture >=60 adds nothing");
    }

    #[test]
    fn test_cwsi_well_watered_no_stress() {
        let result = calculate_cwsi(Some(22.0), Some(85.0), Some(80.0));
        assert_eq!(result.level, StressGrade::Normal);
        assert!(result.value.unwrap() < 0.2);
    }

    #[test]
    fn test_cwsi_band_boundaries() {
        // classify() is half-open on the upper bound
        assert_eq!(classify(0.19).0, StressGrade::Normal);
        assert_eq!(classify(0.2).0, StressGrade::Mild);
        assert_eq!(classify(0.8).0, StressGrade::Severe);
    }
}
