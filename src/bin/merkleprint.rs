//! merkleprint CLI binary
//!
//! Hashes a file set in parallel and prints the Merkle root, optionally
//! saving or comparing JSON snapshots.

use clap::Parser;
use merkleprint::cli::{map_error, Cli, RunContext};
use merkleprint::config::ConfigLoader;
use merkleprint::logging::{init_logging, LoggingConfig};
use std::process;
use tracing::{error, info};

fn main() {
    let cli = Cli::parse();

    let logging_config = build_logging_config(&cli);

    if let Err(e) = init_logging(Some(&logging_config)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!("merkleprint starting");

    let context = match RunContext::new(cli.workspace.clone(), cli.config.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("Error loading configuration: {}", e);
            eprintln!("{}", map_error(&e));
            process::exit(1);
        }
    };

    match context.execute(&cli.command) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            error!("Command failed: {}", e);
            if let Some(rendered) = e.partial_output() {
                println!("{}", rendered);
            }
            eprintln!("{}", map_error(&e));
            process::exit(1);
        }
    }
}

/// Build logging configuration from CLI args and the config file.
///
/// Logging stays off unless `--verbose` or `--log-level` is given.
fn build_logging_config(cli: &Cli) -> LoggingConfig {
    if !cli.verbose && cli.log_level.is_none() {
        return LoggingConfig {
            enabled: false,
            ..LoggingConfig::default()
        };
    }

    let mut config = if let Some(ref config_path) = cli.config {
        ConfigLoader::load_from_file(config_path)
            .map(|c| c.logging)
            .unwrap_or_default()
    } else {
        ConfigLoader::load(&cli.workspace)
            .map(|c| c.logging)
            .unwrap_or_default()
    };

    config.enabled = true;
    if let Some(ref level) = cli.log_level {
        config.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.format = format.clone();
    }
    if let Some(ref output) = cli.log_output {
        config.output = output.clone();
    }
    if let Some(ref file) = cli.log_file {
        config.file = Some(file.clone());
        if cli.log_output.is_none() {
            config.output = "file".to_string();
        }
    }

    config
}
