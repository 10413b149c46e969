//! Field Configuration Module
//!
//! Per-field configuration loaded from TOML, replacing hardcoded agronomy
//! tables with grower-tunable values.
//!
//! ## Loading Order
//!
//! 1. `CANESENSE_CONFIG` environment variable (path to TOML file)
//! 2. `field_config.toml` in the current working directory
//! 3. Built-in defaults (matching the hardcoded constants)
//!
//! ## Usage
//!
//! Call `config::init()` once at startup, then `config::get()` anywhere:
//!
//! ```ignore
//! // In main():
//! config::init(FieldConfig::load());
//!
//! // Anywhere in the codebase:
//! let base = config::get().gdd.base_temp_c;
//! ```

mod field_config;

pub use field_config::*;

use std::sync::OnceLock;

/// Global field configuration, initialized once at startup.
static FIELD_CONFIG: OnceLock<FieldConfig> = OnceLock::new();

/// Initialize the global field configuration.
///
/// Must be called at most once; repeat calls are ignored with a warning.
pub fn init(config: FieldConfig) {
    if FIELD_CONFIG.set(config).is_err() {
        tracing::warn!("config::init() called more than once — ignoring");
    }
}

/// Get a reference to the global field configuration.
///
/// Falls back to built-in defaults if `init()` was never called, so
/// library consumers that skip configuration still get correct tables.
pub fn get() -> &'static FieldConfig {
    FIELD_CONFIG.get_or_init(FieldConfig::default)
}

/// Check whether the config has been initialized.
///
/// Engine table accessors use this to avoid forcing the OnceLock during
/// tests that exercise the built-in constants.
pub fn is_initialized() -> bool {
    FIELD_CONFIG.get().is_some()
}
