//! Logging System
//!
//! Structured logging using the `tracing` crate. Level, format (text or JSON),
//! and destination (stdout, stderr, or a file) come from configuration and
//! can be overridden by `MERKLEPRINT_LOG*` environment variables.

use crate::error::ApiError;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Master switch; when false no subscriber is installed
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: json, text
    #[serde(default = "default_format")]
    pub format: String,

    /// Output destination: stdout, stderr, file
    #[serde(default = "default_output")]
    pub output: String,

    /// Log file path (when output is "file"); defaults to the user data dir
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Enable colored output (text format, terminal outputs only)
    #[serde(default = "default_true")]
    pub color: bool,

    /// Module-specific log levels
    #[serde(default)]
    pub modules: HashMap<String, String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_output() -> String {
    "stderr".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            level: default_log_level(),
            format: default_format(),
            output: default_output(),
            file: None,
            color: default_true(),
            modules: HashMap::new(),
        }
    }
}

impl LoggingConfig {
    pub fn validate(&self) -> Result<(), String> {
        parse_format(&self.format)?;
        parse_output(&self.output)?;
        match self.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" | "off" => Ok(()),
            other => Err(format!("Invalid log level: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogOutput {
    Stdout,
    Stderr,
    File,
}

fn parse_format(format: &str) -> Result<LogFormat, String> {
    match format {
        "text" => Ok(LogFormat::Text),
        "json" => Ok(LogFormat::Json),
        other => Err(format!(
            "Invalid log format: {} (must be 'json' or 'text')",
            other
        )),
    }
}

fn parse_output(output: &str) -> Result<LogOutput, String> {
    match output {
        "stdout" => Ok(LogOutput::Stdout),
        "stderr" => Ok(LogOutput::Stderr),
        "file" => Ok(LogOutput::File),
        other => Err(format!(
            "Invalid log output: {} (must be 'stdout', 'stderr', or 'file')",
            other
        )),
    }
}

/// Default log file under the platform data directory
pub fn default_log_file() -> Option<PathBuf> {
    ProjectDirs::from("", "", "merkleprint").map(|dirs| dirs.data_local_dir().join("merkleprint.log"))
}

/// Initialize the logging system
///
/// Priority order (highest to lowest):
/// 1. Environment variables (MERKLEPRINT_LOG, MERKLEPRINT_LOG_FORMAT, MERKLEPRINT_LOG_OUTPUT)
/// 2. The given configuration (already merged with CLI flags by the caller)
/// 3. Defaults
pub fn init_logging(config: Option<&LoggingConfig>) -> Result<(), ApiError> {
    let defaults = LoggingConfig::default();
    let config = config.unwrap_or(&defaults);

    if !config.enabled {
        return Ok(());
    }

    let filter = build_env_filter(config)?;
    let format = determine_format(config)?;
    let output = determine_output(config)?;

    let writer = match output {
        LogOutput::Stdout => BoxMakeWriter::new(std::io::stdout),
        LogOutput::Stderr => BoxMakeWriter::new(std::io::stderr),
        LogOutput::File => BoxMakeWriter::new(Mutex::new(open_log_file(config)?)),
    };
    let use_color = config.color && output != LogOutput::File && format == LogFormat::Text;

    let base_subscriber = Registry::default().with(filter);
    let result = match format {
        LogFormat::Json => base_subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(writer),
            )
            .try_init(),
        LogFormat::Text => base_subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(use_color)
                    .with_writer(writer),
            )
            .try_init(),
    };

    result.map_err(|e| ApiError::ConfigError(format!("Failed to initialize logging: {}", e)))
}

fn open_log_file(config: &LoggingConfig) -> Result<std::fs::File, ApiError> {
    let log_file = config
        .file
        .clone()
        .or_else(default_log_file)
        .ok_or_else(|| ApiError::ConfigError("No log file path available".to_string()))?;

    if let Some(parent) = log_file.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ApiError::ConfigError(format!("Failed to create log directory: {}", e))
        })?;
    }
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)
        .map_err(|e| {
            ApiError::ConfigError(format!("Failed to open log file {:?}: {}", log_file, e))
        })
}

/// Build environment filter from config or environment variables
fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter, ApiError> {
    if let Ok(filter) = EnvFilter::try_from_env("MERKLEPRINT_LOG") {
        return Ok(filter);
    }

    if config.level == "off" {
        return Ok(EnvFilter::new("off"));
    }

    let mut filter = EnvFilter::new(&config.level);

    for (module, module_level) in &config.modules {
        let directive = format!("{}={}", module, module_level);
        filter = filter.add_directive(
            directive
                .parse()
                .map_err(|e| ApiError::ConfigError(format!("Invalid log directive: {}", e)))?,
        );
    }

    if let Ok(modules_str) = std::env::var("MERKLEPRINT_LOG_MODULES") {
        for module_spec in modules_str.split(',') {
            let parts: Vec<&str> = module_spec.split('=').collect();
            if parts.len() == 2 {
                let directive = format!("{}={}", parts[0].trim(), parts[1].trim());
                filter = filter.add_directive(directive.parse().map_err(|e| {
                    ApiError::ConfigError(format!("Invalid log directive from env: {}", e))
                })?);
            }
        }
    }

    Ok(filter)
}

fn determine_format(config: &LoggingConfig) -> Result<LogFormat, ApiError> {
    if let Ok(format) = std::env::var("MERKLEPRINT_LOG_FORMAT") {
        if let Ok(format) = parse_format(&format) {
            return Ok(format);
        }
    }
    parse_format(&config.format).map_err(ApiError::ConfigError)
}

fn determine_output(config: &LoggingConfig) -> Result<LogOutput, ApiError> {
    if let Ok(output) = std::env::var("MERKLEPRINT_LOG_OUTPUT") {
        return parse_output(&output).map_err(ApiError::ConfigError);
    }
    parse_output(&config.output).map_err(ApiError::ConfigError)
}
