//! Core identifiers shared across the hashing pipeline and tree builder.

use std::path::PathBuf;

/// 32-byte digest produced by every supported hash function
pub type Digest = [u8; 32];

/// Position of a node inside a tree's node arena
pub type NodeIndex = usize;

/// Digest of one file, tagged with the path it was computed from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashResult {
    pub path: PathBuf,
    pub digest: Digest,
}

impl HashResult {
    pub fn new(path: PathBuf, digest: Digest) -> Self {
        Self { path, digest }
    }
}
