//! Worker sizing for the hashing pool
//!
//! Cancellation is shared through `tokio_util::sync::CancellationToken`: any
//! holder may fire it, and every holder awaits `cancelled()` inside
//! `tokio::select!` next to the operation it would otherwise block on.

/// Number of workers for a batch of `jobs`
///
/// `min(jobs, host parallelism, cap)`, never below 1.
pub fn worker_count(jobs: usize, cap: Option<usize>) -> usize {
    let host = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    let mut workers = jobs.min(host);
    if let Some(cap) = cap {
        workers = workers.min(cap);
    }
    workers.max(1)
}
