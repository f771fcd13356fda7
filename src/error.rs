//! Error types for the hashing pipeline and its surrounding tooling.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while enumerating, hashing, or scheduling files
#[derive(Debug, Error)]
pub enum HashError {
    #[error("no files provided")]
    NoFiles,

    #[error("cannot hash directories along with filepaths: {0:?}")]
    DirectoryInFileList(PathBuf),

    #[error("is a directory: {0:?}")]
    IsDirectory(PathBuf),

    #[error("file too large: {path:?} is {size} bytes (limit {limit})")]
    FileTooLarge { path: PathBuf, size: u64, limit: u64 },

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Invalid digest: {0}")]
    InvalidDigest(String),

    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("deadline exceeded after {0:?}")]
    DeadlineExceeded(Duration),

    #[error("not all files processed successfully: {received} of {expected}")]
    Incomplete { expected: usize, received: usize },

    #[error("operation cancelled")]
    Cancelled,

    #[error("runtime error: {0}")]
    Runtime(String),
}

impl HashError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        HashError::Io {
            path: path.into(),
            source,
        }
    }

    /// True for the "too slow" outcome, as opposed to broken input
    pub fn is_timeout(&self) -> bool {
        matches!(self, HashError::DeadlineExceeded(_))
    }

    /// True for errors caused by what the caller passed in
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            HashError::NoFiles
                | HashError::DirectoryInFileList(_)
                | HashError::IsDirectory(_)
                | HashError::FileTooLarge { .. }
                | HashError::InvalidPath(_)
        )
    }
}

/// Top-level errors surfaced by the library facade and CLI
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Hash(#[from] HashError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Snapshot error: {0}")]
    SnapshotError(String),

    #[error("Snapshot I/O error on {path:?}: {source}")]
    SnapshotIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not build Merkle tree: {0}")]
    EmptyTree(String),

    /// A command produced output before a later step failed
    #[error("Error loading comparison snapshot: {source}")]
    ComparisonUnavailable {
        rendered: String,
        #[source]
        source: Box<ApiError>,
    },
}

impl ApiError {
    /// Output already rendered by the failing command, if any
    pub fn partial_output(&self) -> Option<&str> {
        match self {
            ApiError::ComparisonUnavailable { rendered, .. } => Some(rendered),
            _ => None,
        }
    }
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
