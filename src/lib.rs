//! CaneSense: Agronomic Derived-Metrics Engine
//!
//! Pure computation library behind the sugarcane field dashboard. Raw
//! sensor snapshots and short time-series windows flow in; heat-stress,
//! water-stress, phenology, moisture, and sensor-health verdicts flow out.
//!
//! ## Architecture
//!
//! - **Engine**: stateless agronomic formulas and window analytics
//!   (THI, VPD/CWSI, GDD, depletion/infiltration, anomaly detection)
//! - **Types**: serializable value objects and the static agronomy tables
//! - **Config**: grower-tunable TOML overrides for every table
//! - **Cache**: explicit TTL cache for external data collaborators
//!
//! Data flows one way: readings → engine → derived metric objects →
//! presentation (out of scope). No function here blocks, caches, or keeps
//! state between calls.

pub mod cache;
pub mod config;
pub mod engine;
pub mod types;

// Re-export field configuration
pub use config::{ConfigError, FieldConfig};

// Re-export commonly used types
pub use types::{
    Anomaly, AnomalyKind, DailyTemperature, GrowthStage, HealthStatus, MoistureBand, SensorHealth,
    SensorHistory, SensorKind, SensorLimits, SensorReading, Severity, TimestampedValue,
};

// Re-export the engine surface
pub use engine::{
    calculate_cwsi, calculate_thi, calculate_vpd, days_to_next_stage, depletion_rate,
    detect_anomalies, field_update, gdd_from_readings, growth_stage, infiltration_speed,
    irrigation_estimate, sensor_health, stress_level, CwsiResult, DepletionResult, FieldMetrics,
    StressGrade, StressLevel, THI_ALERT_THRESHOLD,
};

// Re-export the cache
pub use cache::TtlCache;
