//! TOML file source

use ::config::builder::DefaultState;
use ::config::{ConfigBuilder, ConfigError, File, FileFormat};
use std::path::Path;

/// Add a required TOML file to builder.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    path: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let source = File::from(path).format(FileFormat::Toml).required(true);
    Ok(builder.add_source(source))
}
