//! Workspace config file source: merkleprint.toml and merkleprint.{env}.toml

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File};
use std::path::Path;

/// Add workspace config files to builder.
/// Precedence: merkleprint.toml (base) then merkleprint.{MERKLEPRINT_ENV}.toml.
pub fn add_to_builder(
    mut builder: ConfigBuilder<DefaultState>,
    workspace_root: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let base_config_path = workspace_root.join("merkleprint.toml");
    if base_config_path.exists() {
        builder = builder.add_source(File::from(base_config_path).required(false));
    }

    if let Ok(env_name) = std::env::var("MERKLEPRINT_ENV") {
        let env_config_path = workspace_root.join(format!("merkleprint.{}.toml", env_name));
        if env_config_path.exists() {
            builder = builder.add_source(File::from(env_config_path).required(false));
        }
    }

    Ok(builder)
}
