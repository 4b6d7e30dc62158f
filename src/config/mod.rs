//! Configuration
//!
//! Layered configuration (defaults, optional TOML file, `PARAMETERIZED__*`
//! environment) deserialized into [`ParamConfig`]. [`install`] publishes the
//! runtime-relevant part process-wide; instance naming and override views read
//! it through [`current`].

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;

use crate::logging::LoggingConfig;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Environment variable prefix
pub const ENV_PREFIX: &str = "PARAMETERIZED";

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParamConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub overrides: OverridesConfig,

    #[serde(default)]
    pub naming: NamingConfig,
}

/// Override view behavior
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OverridesConfig {
    /// Reject override keywords that name no parameter instead of warning
    #[serde(default)]
    pub strict: bool,
}

/// Generated instance names
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamingConfig {
    /// Zero-padded width of the per-class counter (`Widget00003`)
    #[serde(default = "default_counter_width")]
    pub counter_width: usize,
}

fn default_counter_width() -> usize {
    5
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            counter_width: default_counter_width(),
        }
    }
}

/// Settings consulted at runtime by the parameter core
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeSettings {
    pub strict_overrides: bool,
    pub counter_width: usize,
}

static RUNTIME: RwLock<RuntimeSettings> = parking_lot::const_rwlock(RuntimeSettings {
    strict_overrides: false,
    counter_width: 5,
});

impl From<&ParamConfig> for RuntimeSettings {
    fn from(config: &ParamConfig) -> Self {
        Self {
            strict_overrides: config.overrides.strict,
            counter_width: config.naming.counter_width,
        }
    }
}

/// Make `config` the process-wide runtime settings
pub fn install(config: &ParamConfig) {
    *RUNTIME.write() = RuntimeSettings::from(config);
}

/// Current runtime settings
pub fn current() -> RuntimeSettings {
    *RUNTIME.read()
}
