//! End-to-end pipeline: enumerate inputs, hash them, fold into a Merkle tree

use crate::error::{ApiError, HashError};
use crate::scheduler::{HashScheduler, SchedulerConfig};
use crate::tree::builder::MerkleTree;
use crate::tree::walker::{self, Walker, WalkerConfig};
use crate::types::Digest;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// What to fingerprint
#[derive(Debug, Clone)]
pub enum PipelineInput {
    /// Explicit file list; directories are rejected
    Paths(Vec<PathBuf>),
    /// Directory expanded recursively
    Directory(PathBuf),
    /// In-memory buffers hashed in the order given
    Blocks(Vec<Vec<u8>>),
}

impl PipelineInput {
    /// Interpret command-line style arguments
    ///
    /// A single directory argument is expanded; anything else is treated as a
    /// list of files.
    pub fn from_args(args: Vec<PathBuf>) -> Result<Self, HashError> {
        match args.as_slice() {
            [] => Err(HashError::NoFiles),
            [only] if only.is_dir() => Ok(PipelineInput::Directory(only.clone())),
            _ => Ok(PipelineInput::Paths(args)),
        }
    }

    /// Expected number of jobs, when known before enumeration
    fn size_hint(&self) -> Option<usize> {
        match self {
            PipelineInput::Paths(paths) => Some(paths.len()),
            PipelineInput::Directory(_) => None,
            PipelineInput::Blocks(blocks) => Some(blocks.len()),
        }
    }
}

/// Hashing pipeline facade
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    scheduler: HashScheduler,
    walker_config: WalkerConfig,
}

impl Pipeline {
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            scheduler: HashScheduler::new(config),
            walker_config: WalkerConfig::default(),
        }
    }

    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker_config = config;
        self
    }

    pub fn scheduler(&self) -> &HashScheduler {
        &self.scheduler
    }

    /// Expand a directory and hash every file in it
    #[instrument(skip(self), fields(directory = %directory.display()))]
    pub async fn hash_directory(&self, directory: &Path) -> Result<Vec<Digest>, HashError> {
        let walker = Walker::with_config(directory.to_path_buf(), self.walker_config.clone());
        let files = tokio::task::spawn_blocking(move || walker.walk())
            .await
            .map_err(|e| HashError::Runtime(format!("directory walk panicked: {}", e)))??;

        debug!(file_count = files.len(), "Directory expanded");
        self.scheduler.hash_files(files).await
    }

    /// Hash an explicit list of files
    #[instrument(skip(self, paths), fields(path_count = paths.len()))]
    pub async fn hash_direct_paths(&self, paths: &[PathBuf]) -> Result<Vec<Digest>, HashError> {
        if paths.is_empty() {
            return Err(HashError::NoFiles);
        }
        let files = walker::resolve_direct_paths(paths)?;
        self.scheduler.hash_files(files).await
    }

    /// Run the full pipeline and return the tree
    pub async fn build(&self, input: PipelineInput) -> Result<MerkleTree, ApiError> {
        let leaves = match input {
            PipelineInput::Paths(paths) => self.hash_direct_paths(&paths).await?,
            PipelineInput::Directory(directory) => self.hash_directory(&directory).await?,
            PipelineInput::Blocks(blocks) => {
                if blocks.is_empty() {
                    return Err(HashError::NoFiles.into());
                }
                self.scheduler.hash_blocks(&blocks)
            }
        };

        let tree = MerkleTree::build(&leaves, self.scheduler.config().algorithm)
            .ok_or_else(|| ApiError::EmptyTree("no leaf digests".to_string()))?;

        info!(
            file_count = tree.leaf_count(),
            root_hash = %tree.root_hash(),
            "Merkle tree ready"
        );
        Ok(tree)
    }

    /// Run the pipeline on a dedicated multi-threaded runtime
    ///
    /// The runtime's thread pool is sized to the scheduler's worker count, so
    /// hashing runs in parallel even when called from synchronous code.
    pub fn build_blocking(&self, input: PipelineInput) -> Result<MerkleTree, ApiError> {
        let workers = self
            .scheduler
            .workers_for(input.size_hint().unwrap_or(usize::MAX));

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(workers)
            .thread_name("merkleprint-worker")
            .enable_all()
            .build()
            .map_err(|e| HashError::Runtime(format!("Failed to create runtime: {}", e)))?;

        runtime.block_on(self.build(input))
    }
}
