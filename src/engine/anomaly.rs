//! Sensor anomaly detection and fleet health verdict
//!
//! Three independent checks feed one sweep:
//! - out-of-range: physically implausible instantaneous values
//! - sudden change: rate-of-change violations between close readings
//! - stuck sensor: bit-identical values over an implausibly long span
//!
//! Every anomaly is regenerated from scratch per evaluation; nothing here
//! keeps state between calls.

use tracing::debug;

use crate::types::{
    hours_between, Anomaly, AnomalyKind, HealthStatus, SensorHealth, SensorKind, SensorReading,
    SensorHistory, Severity, TimestampedValue,
};

/// Readings closer together than this (hours) but non-coincident are
/// eligible for the rate-of-change check
const SUDDEN_CHANGE_WINDOW_HOURS: f64 = 2.0;

/// How many trailing readings the stuck check inspects
const STUCK_WINDOW: usize = 6;

/// Minimum trailing readings required before a stuck verdict
const STUCK_MIN_READINGS: usize = 3;

/// Flag a value outside the sensor family's plausible range.
pub fn check_out_of_range(value: f64, kind: SensorKind) -> Option<Anomaly> {
    let limits = kind.limits();

    if value < limits.min {
        return Some(Anomaly::new(
            AnomalyKind::OutOfRangeLow,
            kind,
            Severity::High,
            format!("{kind} reading below minimum ({value} < {})", limits.min),
        ));
    }

    if value > limits.max {
        return Some(Anomaly::new(
            AnomalyKind::OutOfRangeHigh,
            kind,
            Severity::High,
            format!("{kind} reading above maximum ({value} > {})", limits.max),
        ));
    }

    None
}

fn sorted_valid(readings: &[TimestampedValue]) -> Vec<(i64, f64)> {
    let mut valid: Vec<(i64, f64)> = readings
        .iter()
        .filter_map(|r| r.value.map(|v| (r.timestamp, v)))
        .collect();
    valid.sort_by_key(|(ts, _)| *ts);
    valid
}

/// Flag the first consecutive pair whose rate of change exceeds the
/// family limit.
///
/// Only pairs spaced within the sudden-change window count; wider gaps
/// legitimately allow large drift. The scan stops at the first violation —
/// one ticket per sweep is enough for the operator.
pub fn check_sudden_change(readings: &[TimestampedValue], kind: SensorKind) -> Option<Anomaly> {
    let valid = sorted_valid(readings);
    if valid.len() < 2 {
        return None;
    }

    let limits = kind.limits();

    for pair in valid.windows(2) {
        let (prev_ts, prev_value) = pair[0];
        let (curr_ts, curr_value) = pair[1];
        let elapsed = hours_between(prev_ts, curr_ts);

        if elapsed > 0.0 && elapsed <= SUDDEN_CHANGE_WINDOW_HOURS {
            let change_rate = (curr_value - prev_value).abs() / elapsed;
            if change_rate > limits.max_change_per_hour {
                let severity = if change_rate > limits.max_change_per_hour * 2.0 {
                    Severity::High
                } else {
                    Severity::Medium
                };
                let mut anomaly = Anomaly::new(
                    AnomalyKind::SuddenChange,
                    kind,
                    severity,
                    format!("Rapid {kind} change: {:.0} per hour", change_rate.round()),
                );
                anomaly.change_rate = Some(change_rate.round());
                return Some(anomaly);
            }
        }
    }

    None
}

/// Flag a sensor frozen on one value for longer than plausible.
///
/// Inspects the trailing window; every value must be bit-identical and the
/// covered span must reach the family's stuck threshold.
pub fn check_stuck_sensor(readings: &[TimestampedValue], kind: SensorKind) -> Option<Anomaly> {
    let valid = sorted_valid(readings);
    if valid.len() < STUCK_MIN_READINGS {
        return None;
    }

    let recent = &valid[valid.len().saturating_sub(STUCK_WINDOW)..];
    let first_value = recent[0].1;
    let all_same = recent.iter().all(|(_, v)| v.to_bits() == first_value.to_bits());
    if !all_same {
        return None;
    }

    let span = hours_between(recent[0].0, recent[recent.len() - 1].0);
    let limits = kind.limits();
    if span < limits.stuck_threshold_hours {
        return None;
    }

    let mut anomaly = Anomaly::new(
        AnomalyKind::StuckSensor,
        kind,
        Severity::Medium,
        format!("{kind} sensor stuck at {first_value} for {:.0}h", span.round()),
    );
    anomaly.stuck_value = Some(first_value);
    Some(anomaly)
}

/// Run the full anomaly sweep over a snapshot plus history.
///
/// Output order is fixed and part of the contract: moisture depths in
/// gateway order, then temperature, then humidity, then the anomalies
/// derived from the historical temperature series.
pub fn detect_anomalies(current: &SensorReading, historical: &SensorHistory) -> Vec<Anomaly> {
    let mut anomalies = Vec::new();

    for (sensor, value) in current.moisture_depths() {
        if let Some(value) = value {
            if let Some(mut anomaly) = check_out_of_range(value, SensorKind::Moisture) {
                anomaly.sensor = Some(sensor.to_string());
                anomalies.push(anomaly);
            }
        }
    }

    if let Some(temperature) = current.temperature {
        if let Some(mut anomaly) = check_out_of_range(temperature, SensorKind::Temperature) {
            anomaly.sensor = Some("temperature".to_string());
            anomalies.push(anomaly);
        }
    }

    if let Some(humidity) = current.humidity {
        if let Some(mut anomaly) = check_out_of_range(humidity, SensorKind::Humidity) {
            anomaly.sensor = Some("humidity".to_string());
            anomalies.push(anomaly);
        }
    }

    if !historical.temperature.is_empty() {
        if let Some(anomaly) = check_sudden_change(&historical.temperature, SensorKind::Temperature)
        {
            anomalies.push(anomaly);
        }
        if let Some(anomaly) = check_stuck_sensor(&historical.temperature, SensorKind::Temperature)
        {
            anomalies.push(anomaly);
        }
    }

    debug!(count = anomalies.len(), "anomaly sweep complete");
    anomalies
}

/// Aggregate a sweep into the fleet health verdict.
///
/// Empty sweep is healthy; any High anomaly makes the fleet critical; any
/// Medium makes it a warning; anything left is minor.
pub fn sensor_health(anomalies: &[Anomaly]) -> SensorHealth {
    if anomalies.is_empty() {
        return SensorHealth {
            status: HealthStatus::Healthy,
            label: "All Sensors Normal",
        };
    }

    if anomalies.iter().any(|a| a.severity == Severity::High) {
        return SensorHealth {
            status: HealthStatus::Critical,
            label: "Critical Issues Detected",
        };
    }

    if anomalies.iter().any(|a| a.severity == Severity::Medium) {
        return SensorHealth {
            status: HealthStatus::Warning,
            label: "Warnings Detected",
        };
    }

    SensorHealth {
        status: HealthStatus::Minor,
        label: "Minor Issues",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR_MS: i64 = 3_600_000;

    #[test]
    fn test_out_of_range_high() {
        let anomaly = check_out_of_range(150.0, SensorKind::Moisture).unwrap();
        assert_eq!(anomaly.kind, AnomalyKind::OutOfRangeHigh);
        assert_eq!(anomaly.severity, Severity::High);
        assert!(anomaly.message.contains("150"));
    }

    #[test]
    fn test_out_of_range_low() {
        let anomaly = check_out_of_range(-15.0, SensorKind::Temperature).unwrap();
        assert_eq!(anomaly.kind, AnomalyKind::OutOfRangeLow);
    }

    #[test]
    fn test_in_range_is_clean() {
        assert!(check_out_of_range(55.0, SensorKind::Moisture).is_none());
        assert!(check_out_of_range(0.0, SensorKind::Humidity).is_none());
        assert!(check_out_of_range(100.0, SensorKind::Humidity).is_none());
    }

    #[test]
    fn test_sudden_change_first_violation_wins() {
        // 25°C/h at index 1->2 and 30°C/h at 2->3; only the first reports
        let readings = [
            TimestampedValue::new(0, Some(20.0)),
            TimestampedValue::new(HOUR_MS, Some(45.0)),
            TimestampedValue::new(2 * HOUR_MS, Some(15.0)),
        ];
        let anomaly = check_sudden_change(&readings, SensorKind::Temperature).unwrap();
        assert_eq!(anomaly.change_rate, Some(25.0));
        assert_eq!(anomaly.severity, Severity::High, "25 > 2x the 10/h limit");
    }

    #[test]
    fn test_sudden_change_medium_severity() {
        // 15°C/h: above the 10/h limit but below 2x
        let readings = [
            TimestampedValue::new(0, Some(20.0)),
            TimestampedValue::new(HOUR_MS, Some(35.0)),
        ];
        let anomaly = check_sudden_change(&readings, SensorKind::Temperature).unwrap();
        assert_eq!(anomaly.severity, Severity::Medium);
    }

    #[test]
    fn test_sudden_change_ignores_wide_gaps() {
        // 30°C over 3 hours: gap exceeds the 2h pairing window
        let readings = [
            TimestampedValue::new(0, Some(20.0)),
            TimestampedValue::new(3 * HOUR_MS, Some(50.0)),
        ];
        assert!(check_sudden_change(&readings, SensorKind::Temperature).is_none());
    }

    #[test]
    fn test_sudden_change_skips_coincident_readings() {
        let readings = [
            TimestampedValue::new(HOUR_MS, Some(20.0)),
            TimestampedValue::new(HOUR_MS, Some(50.0)),
        ];
        assert!(check_sudden_change(&readings, SensorKind::Temperature).is_none());
    }

    fn stuck_series(count: usize, spacing_ms: i64) -> Vec<TimestampedValue> {
        (0..count)
            .map(|i| TimestampedValue::new(i as i64 * spacing_ms, Some(25.5)))
            .collect()
    }

    #[test]
    fn test_stuck_sensor_over_threshold() {
        // 6 identical readings spanning 7.5 hours
        let readings = stuck_series(6, 90 * 60 * 1000);
        let anomaly = check_stuck_sensor(&readings, SensorKind::Temperature).unwrap();
        assert_eq!(anomaly.kind, AnomalyKind::StuckSensor);
        assert_eq!(anomaly.severity, Severity::Medium);
        assert_eq!(anomaly.stuck_value, Some(25.5));
    }

    #[test]
    fn test_stuck_sensor_short_span_is_clean() {
        // 6 identical readings but only 2.5 hours covered
        let readings = stuck_series(6, 30 * 60 * 1000);
        assert!(check_stuck_sensor(&readings, SensorKind::Temperature).is_none());
    }

    #[test]
    fn test_stuck_sensor_needs_three_readings() {
        let readings = stuck_series(2, 4 * HOUR_MS);
        assert!(check_stuck_sensor(&readings, SensorKind::Temperature).is_none());
    }

    #[test]
    fn test_stuck_sensor_varying_values_clean() {
        let mut readings = stuck_series(6, 2 * HOUR_MS);
        readings[3].value = Some(25.6);
        assert!(check_stuck_sensor(&readings, SensorKind::Temperature).is_none());
    }

    #[test]
    fn test_stuck_sensor_only_trailing_window_counts() {
        // Old varying values, then 6 identical readings over 10 hours
        let mut readings: Vec<TimestampedValue> = vec![
            TimestampedValue::new(0, Some(18.0)),
            TimestampedValue::new(HOUR_MS, Some(21.0)),
        ];
        readings.extend((0..6).map(|i| {
            TimestampedValue::new((2 + i * 2) * HOUR_MS, Some(25.5))
        }));
        assert!(check_stuck_sensor(&readings, SensorKind::Temperature).is_some());
    }

    #[test]
    fn test_detect_anomalies_order_and_attribution() {
        let current = SensorReading {
            moisture_15cm: Some(150.0), // out of range high
            moisture_30cm: Some(60.0),
            moisture_45cm: Some(-5.0), // out of range low
            temperature: Some(60.0),   // out of range high
            humidity: Some(50.0),
            ..Default::default()
        };
        let anomalies = detect_anomalies(&current, &SensorHistory::default());

        assert_eq!(anomalies.len(), 3);
        assert_eq!(anomalies[0].sensor.as_deref(), Some("moisture_15cm"));
        assert_eq!(anomalies[0].kind, AnomalyKind::OutOfRangeHigh);
        assert_eq!(anomalies[1].sensor.as_deref(), Some("moisture_45cm"));
        assert_eq!(anomalies[1].kind, AnomalyKind::OutOfRangeLow);
        assert_eq!(anomalies[2].sensor.as_deref(), Some("temperature"));
    }

    #[test]
    fn test_detect_anomalies_includes_history_checks() {
        let current = SensorReading::default();
        let historical = SensorHistory {
            temperature: stuck_series(6, 2 * HOUR_MS),
            ..Default::default()
        };
        let anomalies = detect_anomalies(&current, &historical);
        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].kind, AnomalyKind::StuckSensor);
    }

    #[test]
    fn test_sensor_health_verdicts() {
        assert_eq!(sensor_health(&[]).status, HealthStatus::Healthy);

        let high = Anomaly::new(
            AnomalyKind::OutOfRangeHigh,
            SensorKind::Moisture,
            Severity::High,
            String::new(),
        );
        assert_eq!(sensor_health(&[high.clone()]).status, HealthStatus::Critical);

        let medium = Anomaly::new(
            AnomalyKind::StuckSensor,
            SensorKind::Temperature,
            Severity::Medium,
            String::new(),
        );
        assert_eq!(sensor_health(&[medium.clone()]).status, HealthStatus::Warning);
        // High dominates regardless of order
        assert_eq!(
            sensor_health(&[medium, high]).status,
            HealthStatus::Critical
        );

        let low = Anomaly::new(
            AnomalyKind::SuddenChange,
            SensorKind::Humidity,
            Severity::Low,
            String::new(),
        );
        assert_eq!(sensor_health(&[low]).status, HealthStatus::Minor);
    }
}
