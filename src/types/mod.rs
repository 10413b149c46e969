//! Shared data structures for the field telemetry pipeline
//!
//! - `SensorReading` / `TimestampedValue`: raw gateway snapshots and series
//! - `GrowthStage` + bands: static agronomy tables consumed by the engine
//! - `Anomaly` / `SensorHealth`: detector outputs
//!
//! Everything here is a plain serializable value object; lifecycle is
//! construct, consume, discard within a single evaluation call.

mod anomaly;
mod reading;
mod stage;

pub use anomaly::*;
pub use reading::*;
pub use stage::*;
