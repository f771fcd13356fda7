//! Merge rules: defaults, override order, environment overrides.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment};

/// Prefix for environment overrides, e.g. `MERKLEPRINT__HASHING__TIMEOUT_SECS`
pub const ENV_PREFIX: &str = "MERKLEPRINT";

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("hashing.timeout_secs", 30)?
        .set_default("hashing.algorithm", "sha256")?
        .set_default("logging.level", "info")
}

/// Environment variables override every file source.
pub fn add_environment(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true),
    )
}
