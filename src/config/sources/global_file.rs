//! Global config file source: $XDG_CONFIG_HOME/merkleprint/config.toml or ~/.config/merkleprint/config.toml

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File};
use directories::BaseDirs;
use std::path::PathBuf;
use tracing::debug;

/// Path to global config file.
pub fn global_config_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.config_dir().join("merkleprint").join("config.toml"))
}

/// Add global config file source to builder if it exists.
pub fn add_to_builder(
    mut builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    if let Some(path) = global_config_path() {
        if path.exists() {
            builder = builder.add_source(File::from(path).required(false));
        } else {
            debug!(config_path = %path.display(), "No global configuration file");
        }
    }
    Ok(builder)
}
