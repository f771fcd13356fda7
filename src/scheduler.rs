//! Bounded hashing scheduler
//!
//! A fixed pool of workers drains a bounded job queue, one file per job. A
//! single deadline covers the whole batch, and the first worker error cancels
//! everything still queued or streaming. Completion order is irrelevant:
//! results are sorted by path before the digests are handed back.

use crate::concurrency;
use crate::error::HashError;
use crate::tree::hasher::HashAlgorithm;
use crate::types::{Digest, HashResult};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, trace, warn};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_SMALL_FILE_THRESHOLD: u64 = 5 * 1024 * 1024;
pub const DEFAULT_LARGE_FILE_LIMIT: u64 = 50 * 1024 * 1024;
pub const DEFAULT_CHUNK_SIZE: usize = 1024 * 1024;

/// Scheduler tuning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Deadline for the whole batch
    pub timeout: Duration,
    /// Upper bound on workers in addition to host parallelism
    pub max_workers: Option<usize>,
    /// Files up to this size are read in one go
    pub small_file_threshold: u64,
    /// Files above this size are rejected
    pub large_file_limit: u64,
    /// Read size for streamed files
    pub chunk_size: usize,
    pub algorithm: HashAlgorithm,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            max_workers: None,
            small_file_threshold: DEFAULT_SMALL_FILE_THRESHOLD,
            large_file_limit: DEFAULT_LARGE_FILE_LIMIT,
            chunk_size: DEFAULT_CHUNK_SIZE,
            algorithm: HashAlgorithm::default(),
        }
    }
}

impl SchedulerConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = Some(max_workers);
        self
    }

    pub fn with_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.small_file_threshold > self.large_file_limit {
            return Err(format!(
                "small_file_threshold ({}) must not exceed large_file_limit ({})",
                self.small_file_threshold, self.large_file_limit
            ));
        }
        if self.chunk_size == 0 {
            return Err("chunk_size must be greater than zero".to_string());
        }
        if self.max_workers == Some(0) {
            return Err("max_workers must be greater than zero".to_string());
        }
        Ok(())
    }
}

/// Parallel file hasher
#[derive(Debug, Clone)]
pub struct HashScheduler {
    config: Arc<SchedulerConfig>,
}

impl HashScheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Workers a batch of `jobs` files would get
    pub fn workers_for(&self, jobs: usize) -> usize {
        concurrency::worker_count(jobs, self.config.max_workers)
    }

    /// Hash every file and return digests in sorted-path order
    ///
    /// Must run inside a tokio runtime; the degree of parallelism is bounded by
    /// the runtime's worker threads as well as by [`Self::workers_for`].
    #[instrument(skip(self, paths), fields(file_count = paths.len()))]
    pub async fn hash_files(&self, mut paths: Vec<PathBuf>) -> Result<Vec<Digest>, HashError> {
        if paths.is_empty() {
            return Err(HashError::NoFiles);
        }

        paths.sort();

        let expected = paths.len();
        let workers = self.workers_for(expected);
        let timeout = self.config.timeout;
        let deadline = Instant::now() + timeout;
        let cancel = CancellationToken::new();
        let start = Instant::now();

        info!(
            workers,
            timeout_ms = timeout.as_millis() as u64,
            algorithm = %self.config.algorithm,
            "Hashing batch started"
        );

        let (job_tx, job_rx) = mpsc::channel::<PathBuf>(expected);
        let job_rx = Arc::new(Mutex::new(job_rx));
        let (result_tx, result_rx) = mpsc::channel::<HashResult>(expected);
        let (error_tx, error_rx) = mpsc::channel::<HashError>(expected);

        // Dropping the set on return aborts any worker still running
        let mut tasks = JoinSet::new();
        for worker_id in 0..workers {
            tasks.spawn(run_worker(
                worker_id,
                Arc::clone(&job_rx),
                result_tx.clone(),
                error_tx.clone(),
                cancel.clone(),
                Arc::clone(&self.config),
            ));
        }
        // Result and error streams close once every worker has exited
        drop(result_tx);
        drop(error_tx);

        tasks.spawn(dispatch(paths, job_tx, cancel.clone()));

        let outcome = aggregate(expected, deadline, timeout, &cancel, result_rx, error_rx).await;
        cancel.cancel();

        let mut results = match outcome {
            Ok(results) => results,
            Err(err) => {
                warn!(error = %err, "Hashing batch failed");
                return Err(err);
            }
        };

        results.sort_by(|a, b| a.path.cmp(&b.path));

        info!(
            duration_ms = start.elapsed().as_millis() as u64,
            "Hashing batch completed"
        );

        Ok(results.into_iter().map(|r| r.digest).collect())
    }

    /// Leaf digests for in-memory buffers, in input order
    pub fn hash_blocks<B: AsRef<[u8]>>(&self, blocks: &[B]) -> Vec<Digest> {
        blocks
            .iter()
            .map(|block| self.config.algorithm.leaf_digest(block.as_ref()))
            .collect()
    }
}

impl Default for HashScheduler {
    fn default() -> Self {
        Self::new(SchedulerConfig::default())
    }
}

/// Wait for `expected` results, the first error, or the deadline
async fn aggregate(
    expected: usize,
    deadline: Instant,
    timeout: Duration,
    cancel: &CancellationToken,
    mut results: mpsc::Receiver<HashResult>,
    mut errors: mpsc::Receiver<HashError>,
) -> Result<Vec<HashResult>, HashError> {
    let sleep = tokio::time::sleep_until(deadline);
    tokio::pin!(sleep);

    let mut collected = Vec::with_capacity(expected);
    while collected.len() < expected {
        if Instant::now() >= deadline {
            cancel.cancel();
            return Err(HashError::DeadlineExceeded(timeout));
        }

        // Errors are checked first: a failing worker reports before it drops
        // its result sender, so a closed result stream never hides the cause.
        tokio::select! {
            biased;
            Some(err) = errors.recv() => {
                cancel.cancel();
                return Err(err);
            }
            _ = &mut sleep => {
                cancel.cancel();
                return Err(HashError::DeadlineExceeded(timeout));
            }
            result = results.recv() => match result {
                Some(result) => collected.push(result),
                None => {
                    return Err(HashError::Incomplete {
                        expected,
                        received: collected.len(),
                    });
                }
            }
        }
    }

    Ok(collected)
}

/// Feed paths into the job queue until done or cancelled
async fn dispatch(paths: Vec<PathBuf>, jobs: mpsc::Sender<PathBuf>, cancel: CancellationToken) {
    for path in paths {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return,
            sent = jobs.send(path) => {
                if sent.is_err() {
                    return;
                }
            }
        }
    }
}

async fn run_worker(
    worker_id: usize,
    jobs: Arc<Mutex<mpsc::Receiver<PathBuf>>>,
    results: mpsc::Sender<HashResult>,
    errors: mpsc::Sender<HashError>,
    cancel: CancellationToken,
    config: Arc<SchedulerConfig>,
) {
    loop {
        let job = tokio::select! {
            biased;
            _ = cancel.cancelled() => return,
            job = next_job(&jobs) => job,
        };

        let Some(path) = job else {
            return;
        };

        match hash_file(&path, &cancel, &config).await {
            Ok(digest) => {
                trace!(worker_id, path = %path.display(), "Hashed file");
                if results.send(HashResult::new(path, digest)).await.is_err() {
                    return;
                }
            }
            Err(HashError::Cancelled) => return,
            Err(err) => {
                debug!(worker_id, path = %path.display(), error = %err, "Worker failed");
                let _ = errors.send(err).await;
                cancel.cancel();
                return;
            }
        }
    }
}

async fn next_job(jobs: &Mutex<mpsc::Receiver<PathBuf>>) -> Option<PathBuf> {
    jobs.lock().await.recv().await
}

/// Hash one file's content
///
/// Small files are read whole; larger ones are streamed in chunks with a
/// cancellation check before every read. Directories and files over the size
/// limit are rejected.
pub async fn hash_file(
    path: &Path,
    cancel: &CancellationToken,
    config: &SchedulerConfig,
) -> Result<Digest, HashError> {
    if cancel.is_cancelled() {
        return Err(HashError::Cancelled);
    }

    let mut file = tokio::fs::File::open(path)
        .await
        .map_err(|e| HashError::io(path, e))?;
    let metadata = file.metadata().await.map_err(|e| HashError::io(path, e))?;

    if metadata.is_dir() {
        return Err(HashError::IsDirectory(path.to_path_buf()));
    }

    let size = metadata.len();
    let mut hasher = config.algorithm.hasher();

    if size <= config.small_file_threshold {
        let mut content = Vec::with_capacity(size as usize);
        file.read_to_end(&mut content)
            .await
            .map_err(|e| HashError::io(path, e))?;
        hasher.update(&content);
    } else if size <= config.large_file_limit {
        let mut buffer = vec![0u8; config.chunk_size];
        loop {
            if cancel.is_cancelled() {
                return Err(HashError::Cancelled);
            }

            let n = file
                .read(&mut buffer)
                .await
                .map_err(|e| HashError::io(path, e))?;
            if n == 0 {
                break;
            }
            hasher.update(&buffer[..n]);
        }
    } else {
        return Err(HashError::FileTooLarge {
            path: path.to_path_buf(),
            size,
            limit: config.large_file_limit,
        });
    }

    Ok(hasher.finalize())
}
