//! ConfigLoader: assembles the layered sources and deserializes the result.

use super::merge::merge_policy;
use super::sources::{global_file, workspace_file};
use super::MerkleprintConfig;
use crate::error::ApiError;
use config::File;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Loads [`MerkleprintConfig`] from defaults, files, and environment
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a workspace
    ///
    /// Precedence (lowest to highest): defaults, global file, workspace
    /// files, environment.
    pub fn load(workspace_root: &Path) -> Result<MerkleprintConfig, ApiError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = merge_policy::add_environment(builder);

        let config: MerkleprintConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        debug!(workspace = %workspace_root.display(), "Configuration loaded");
        Ok(config)
    }

    /// Load configuration from one explicit file, skipping global and workspace files
    pub fn load_from_file(path: &Path) -> Result<MerkleprintConfig, ApiError> {
        if !path.exists() {
            return Err(ApiError::ConfigError(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        let builder = merge_policy::builder_with_defaults()?
            .add_source(File::from(path.to_path_buf()).required(true));
        let builder = merge_policy::add_environment(builder);

        let config: MerkleprintConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        debug!(config_path = %path.display(), "Configuration loaded from file");
        Ok(config)
    }

    /// Location of the global config file, if a home directory is known
    pub fn global_config_path() -> Option<PathBuf> {
        global_file::global_config_path()
    }

    /// Built-in defaults only
    pub fn default() -> MerkleprintConfig {
        MerkleprintConfig::default()
    }
}
