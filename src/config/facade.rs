//! ConfigLoader facade delegating to merge service.

use super::merge::service::MergeService;
use super::ParamConfig;
use crate::error::ParamError;
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from defaults and environment.
    pub fn load() -> Result<ParamConfig, ParamError> {
        MergeService::load(None)
    }

    /// Load configuration from a specific TOML file with environment overlay.
    pub fn load_from_file(path: &Path) -> Result<ParamConfig, ParamError> {
        MergeService::load(Some(path))
    }

    /// Load a file and install the result as the runtime settings.
    pub fn load_and_install(path: Option<&Path>) -> Result<ParamConfig, ParamError> {
        let config = MergeService::load(path)?;
        super::install(&config);
        Ok(config)
    }

    /// Create default configuration.
    pub fn default() -> ParamConfig {
        ParamConfig::default()
    }
}
