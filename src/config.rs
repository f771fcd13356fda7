//! Configuration System
//!
//! Layered configuration for the hashing pipeline: built-in defaults, a global
//! config file, a workspace config file, and `MERKLEPRINT__*` environment
//! variables, in increasing order of precedence. CLI flags are applied on top
//! by the binary.

use crate::error::ApiError;
use crate::logging::LoggingConfig;
use crate::scheduler::{
    SchedulerConfig, DEFAULT_CHUNK_SIZE, DEFAULT_LARGE_FILE_LIMIT, DEFAULT_SMALL_FILE_THRESHOLD,
    DEFAULT_TIMEOUT,
};
use crate::tree::hasher::HashAlgorithm;
use crate::tree::walker::WalkerConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MerkleprintConfig {
    /// Scheduler and digest settings
    #[serde(default)]
    pub hashing: HashingConfig,

    /// Directory expansion settings
    #[serde(default)]
    pub walker: WalkerConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Hashing settings as they appear in config files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashingConfig {
    /// Deadline for one batch, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Optional cap on worker count (host parallelism applies regardless)
    #[serde(default)]
    pub max_workers: Option<usize>,

    /// Files up to this many bytes are hashed in one read
    #[serde(default = "default_small_file_threshold")]
    pub small_file_threshold: u64,

    /// Files above this many bytes are rejected
    #[serde(default = "default_large_file_limit")]
    pub large_file_limit: u64,

    /// Read size for streamed files
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    #[serde(default)]
    pub algorithm: HashAlgorithm,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

fn default_small_file_threshold() -> u64 {
    DEFAULT_SMALL_FILE_THRESHOLD
}

fn default_large_file_limit() -> u64 {
    DEFAULT_LARGE_FILE_LIMIT
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_workers: None,
            small_file_threshold: default_small_file_threshold(),
            large_file_limit: default_large_file_limit(),
            chunk_size: default_chunk_size(),
            algorithm: HashAlgorithm::default(),
        }
    }
}

impl HashingConfig {
    pub fn to_scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig {
            timeout: Duration::from_secs(self.timeout_secs),
            max_workers: self.max_workers,
            small_file_threshold: self.small_file_threshold,
            large_file_limit: self.large_file_limit,
            chunk_size: self.chunk_size,
            algorithm: self.algorithm,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than zero".to_string());
        }
        self.to_scheduler_config().validate()
    }
}

impl MerkleprintConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = Vec::new();

        if let Err(e) = self.hashing.validate() {
            errors.push(format!("hashing: {}", e));
        }
        if let Err(e) = self.logging.validate() {
            errors.push(format!("logging: {}", e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                errors.join("\n")
            )))
        }
    }
}
