//! Pipeline Regression Tests
//!
//! Drives the whole derived-metrics surface the way the dashboard does:
//! one snapshot plus history in, every metric object out. Asserts on the
//! documented reference values, deterministic anomaly ordering, and wire
//! shape stability under serde_json.

use canesense::engine::{self, StressGrade, Trend};
use canesense::types::{
    AnomalyKind, GrowthStage, HealthStatus, SensorHistory, SensorReading, Severity,
    TimestampedValue,
};

const HOUR_MS: i64 = 3_600_000;

/// A humid afternoon over a healthy moisture profile.
fn afternoon_snapshot() -> SensorReading {
    SensorReading {
        timestamp: Some(24 * HOUR_MS),
        temperature: Some(30.0),
        humidity: Some(70.0),
        moisture_15cm: Some(68.0),
        moisture_30cm: Some(64.0),
        moisture_45cm: Some(60.0),
        rain_active: Some(false),
        rain_intensity: Some(0.0),
        light_lux: Some(54_000.0),
        air_quality: Some(82.0),
    }
}

fn hourly(values: &[f64]) -> Vec<TimestampedValue> {
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| TimestampedValue::new(i as i64 * HOUR_MS, Some(v)))
        .collect()
}

#[test]
fn full_field_update_on_hot_afternoon() {
    let current = afternoon_snapshot();
    let history = SensorHistory {
        temperature: hourly(&[26.0, 28.0, 29.0, 30.0]),
        humidity: hourly(&[78.0, 74.0, 72.0, 70.0]),
        moisture: hourly(&[72.0, 70.5, 69.2, 68.0]),
    };

    let metrics = engine::field_update(&current, &history);

    // THI(30, 70) = 24 + 10.92 + 46.4 = 81.3: alerting high stress
    assert_eq!(metrics.thi, Some(81.3));
    assert_eq!(metrics.stress.level, StressGrade::High);
    assert!(metrics.stress.is_alert);

    // Average over the three depths
    assert_eq!(metrics.avg_moisture, Some(64.0));

    // CWSI derives from a real VPD and stays inside [0, 1]
    let cwsi = metrics.cwsi.value.unwrap();
    assert!((0.0..=1.0).contains(&cwsi));
    assert!(metrics.cwsi.vpd.unwrap() > 0.0);

    // Reading-mode GDD: (16+18+19+20), today = 20
    assert_eq!(metrics.gdd.accumulated, 73.0);
    assert_eq!(metrics.gdd.today, 20.0);

    // Moisture fell 4 points over 3 hours
    assert_eq!(metrics.depletion.trend, Trend::Depleting);
    assert_eq!(metrics.depletion.rate, Some(-1.33));
    assert!(metrics.depletion.hours_until_critical.is_some());

    // Nothing implausible in this data
    assert!(metrics.anomalies.is_empty());
    assert_eq!(metrics.health.status, HealthStatus::Healthy);
}

#[test]
fn faulty_sensors_surface_in_fixed_order() {
    let mut current = afternoon_snapshot();
    current.moisture_15cm = Some(150.0); // impossible reading
    current.humidity = Some(104.0); // impossible reading

    // Temperature frozen solid for 10 hours
    let history = SensorHistory {
        temperature: (0..6)
            .map(|i| TimestampedValue::new(i * 2 * HOUR_MS, Some(25.5)))
            .collect(),
        ..Default::default()
    };

    let metrics = engine::field_update(&current, &history);

    assert_eq!(metrics.anomalies.len(), 3);
    // Moisture depths first, then humidity, then history-derived
    assert_eq!(metrics.anomalies[0].kind, AnomalyKind::OutOfRangeHigh);
    assert_eq!(metrics.anomalies[0].sensor.as_deref(), Some("moisture_15cm"));
    assert_eq!(metrics.anomalies[0].severity, Severity::High);
    assert_eq!(metrics.anomalies[1].sensor.as_deref(), Some("humidity"));
    assert_eq!(metrics.anomalies[2].kind, AnomalyKind::StuckSensor);
    assert_eq!(metrics.anomalies[2].stuck_value, Some(25.5));

    assert_eq!(metrics.health.status, HealthStatus::Critical);
}

#[test]
fn derived_metrics_are_deterministic() {
    let current = afternoon_snapshot();
    let history = SensorHistory {
        temperature: hourly(&[27.0, 31.0, 29.5]),
        moisture: hourly(&[66.0, 64.0, 63.1]),
        ..Default::default()
    };

    let first = engine::field_update(&current, &history);
    let second = engine::field_update(&current, &history);
    assert_eq!(first, second, "identical inputs must yield identical output");

    let first_json = serde_json::to_string(&first).unwrap();
    let second_json = serde_json::to_string(&second).unwrap();
    assert_eq!(first_json, second_json);
}

#[test]
fn phenology_path_from_daily_extremes() {
    use canesense::types::DailyTemperature;

    // Two warm days: (25-10) + (27-10) = 32 heat units
    let history = [
        DailyTemperature::new(Some(30.0), Some(20.0)),
        DailyTemperature::new(Some(32.0), Some(22.0)),
    ];
    let total = engine::accumulated_gdd(&history);
    assert_eq!(total, 32.0);

    let progress = engine::growth_stage(total);
    assert_eq!(progress.stage, GrowthStage::Germination);
    assert_eq!(progress.progress, 9.0);

    let estimate = engine::days_to_next_stage(total, 16.0);
    assert_eq!(estimate.days, Some(20), "ceil(318/16)");
    assert_eq!(estimate.next_stage, Some(GrowthStage::Tillering));
}

#[test]
fn irrigation_planning_chain() {
    // Depletion feeds the irrigation estimate exactly as the dashboard wires it
    let moisture = hourly(&[62.0, 60.5, 59.0, 57.5, 56.0]);
    let depletion = engine::depletion_rate(&moisture);
    assert_eq!(depletion.trend, Trend::Depleting);

    let estimate = engine::irrigation_estimate(
        depletion.current_moisture.unwrap(),
        depletion.rate.unwrap(),
        50.0,
    );
    assert_eq!(estimate.hours_until, 4.0, "(56-50)/1.5");
    assert!(estimate.recommended, "due within the 6h horizon");
}

#[test]
fn anomaly_wire_shape_is_stable() {
    let current = SensorReading {
        moisture_15cm: Some(150.0),
        ..Default::default()
    };
    let anomalies = engine::detect_anomalies(&current, &SensorHistory::default());
    assert_eq!(anomalies.len(), 1);

    let value = serde_json::to_value(&anomalies[0]).unwrap();
    assert_eq!(value["type"], "out_of_range_high");
    assert_eq!(value["severity"], "HIGH");
    assert_eq!(value["sensor_type"], "moisture");
    assert_eq!(value["sensor"], "moisture_15cm");
}

#[test]
fn cwsi_wire_shape_is_stable() {
    let result = engine::calculate_cwsi(Some(35.0), Some(40.0), Some(30.0));
    let value = serde_json::to_value(&result).unwrap();
    assert!(value["value"].as_f64().unwrap() <= 1.0);
    assert!(value["vpd"].as_f64().is_some());
    assert!(
        value["level"] == "high" || value["level"] == "severe",
        "dry soil under hot dry air must read high or severe, got {}",
        value["level"]
    );
}
