//! Config composition: default values and the merge service.

pub mod service;

use ::config::builder::DefaultState;
use ::config::{ConfigBuilder, ConfigError};

/// Builder seeded with the lowest-precedence defaults.
pub(crate) fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    ::config::Config::builder()
        .set_default("overrides.strict", false)?
        .set_default("naming.counter_width", 5_i64)
}
