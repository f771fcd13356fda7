//! CLI parse: clap types for merkleprint. No behavior; definitions only.

use crate::tree::hasher::HashAlgorithm;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// merkleprint - deterministic Merkle fingerprints of file sets
#[derive(Parser, Debug)]
#[command(name = "merkleprint")]
#[command(about = "Hash files in parallel and fold them into a Merkle tree root")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory (used to locate merkleprint.toml)
    #[arg(long, default_value = ".", global = true)]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (default: off)
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long, global = true)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Hash files (or a single directory, recursively) and build the tree
    Build {
        /// Files to hash, or one directory to expand
        paths: Vec<PathBuf>,

        /// Save the tree as JSON to this path
        #[arg(long)]
        save: Option<PathBuf>,

        /// Compare the new tree with a previously saved JSON snapshot
        #[arg(long)]
        compare: Option<PathBuf>,

        /// Batch timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Upper bound on hashing workers
        #[arg(long)]
        workers: Option<usize>,

        /// Hash function (sha256, blake3)
        #[arg(long)]
        algorithm: Option<HashAlgorithm>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Print a saved tree snapshot
    Show {
        /// Snapshot JSON file
        snapshot: PathBuf,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Compare two saved snapshots by root hash
    Compare {
        /// Earlier snapshot
        previous: PathBuf,

        /// Later snapshot
        current: PathBuf,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
