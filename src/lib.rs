//! merkleprint: parallel file hashing and Merkle tree fingerprints
//!
//! Files are hashed concurrently under a deadline, the digests are folded
//! into a binary Merkle tree in sorted-path order, and the resulting tree can
//! be saved as JSON and compared with earlier snapshots by root hash.

pub mod cli;
pub mod concurrency;
pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod scheduler;
pub mod snapshot;
pub mod tree;
pub mod types;

pub use error::{ApiError, HashError};
pub use pipeline::{Pipeline, PipelineInput};
pub use scheduler::{HashScheduler, SchedulerConfig};
pub use tree::{build_tree, HashAlgorithm, MerkleNode, MerkleTree};
pub use types::{Digest, HashResult, NodeIndex};
