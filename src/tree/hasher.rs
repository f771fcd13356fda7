//! Digest functions for leaves and internal nodes
//!
//! SHA-256 is the default; BLAKE3 is available for callers that want speed and
//! do not need compatibility with SHA-256 fingerprints.

use crate::error::HashError;
use crate::types::Digest;
use serde::{Deserialize, Serialize};
use sha2::Digest as _;
use std::fmt;
use std::str::FromStr;

/// Hash function used for both leaves and internal nodes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Sha256,
    Blake3,
}

impl HashAlgorithm {
    /// Start an incremental hasher for this algorithm
    pub fn hasher(self) -> ContentHasher {
        match self {
            HashAlgorithm::Sha256 => ContentHasher::Sha256(sha2::Sha256::new()),
            HashAlgorithm::Blake3 => ContentHasher::Blake3(Box::new(blake3::Hasher::new())),
        }
    }

    /// Hash a whole buffer in one pass
    pub fn leaf_digest(self, data: &[u8]) -> Digest {
        let mut hasher = self.hasher();
        hasher.update(data);
        hasher.finalize()
    }

    /// Combine optional children and optional data into a node digest
    ///
    /// Input order is left, right, data; absent parts contribute nothing.
    pub fn node_digest(
        self,
        left: Option<&Digest>,
        right: Option<&Digest>,
        data: Option<&[u8]>,
    ) -> Digest {
        let mut hasher = self.hasher();
        if let Some(left) = left {
            hasher.update(left);
        }
        if let Some(right) = right {
            hasher.update(right);
        }
        if let Some(data) = data {
            hasher.update(data);
        }
        hasher.finalize()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Blake3 => "blake3",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sha256" | "sha-256" => Ok(HashAlgorithm::Sha256),
            "blake3" => Ok(HashAlgorithm::Blake3),
            other => Err(format!(
                "Unknown hash algorithm: {} (must be 'sha256' or 'blake3')",
                other
            )),
        }
    }
}

/// Incremental hasher used for streaming file content
pub enum ContentHasher {
    Sha256(sha2::Sha256),
    Blake3(Box<blake3::Hasher>),
}

impl ContentHasher {
    pub fn update(&mut self, data: &[u8]) {
        match self {
            ContentHasher::Sha256(h) => h.update(data),
            ContentHasher::Blake3(h) => {
                h.update(data);
            }
        }
    }

    pub fn finalize(self) -> Digest {
        match self {
            ContentHasher::Sha256(h) => h.finalize().into(),
            ContentHasher::Blake3(h) => *h.finalize().as_bytes(),
        }
    }
}

/// Leaf digest with the default algorithm
pub fn leaf_digest(data: &[u8]) -> Digest {
    HashAlgorithm::default().leaf_digest(data)
}

/// Node digest with the default algorithm
pub fn node_digest(left: Option<&Digest>, right: Option<&Digest>, data: Option<&[u8]>) -> Digest {
    HashAlgorithm::default().node_digest(left, right, data)
}

/// Lowercase hex rendering of a digest
pub fn to_hex(digest: &Digest) -> String {
    hex::encode(digest)
}

/// Parse a 64-character hex string back into a digest
pub fn from_hex(s: &str) -> Result<Digest, HashError> {
    let bytes = hex::decode(s).map_err(|e| HashError::InvalidDigest(e.to_string()))?;
    bytes.try_into().map_err(|b: Vec<u8>| {
        HashError::InvalidDigest(format!("expected 32 bytes, got {}", b.len()))
    })
}
