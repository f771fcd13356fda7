//! JSON snapshots of a built tree, and root-hash comparison between trees

use crate::error::ApiError;
use crate::tree::builder::MerkleTree;
use crate::tree::hasher::{self, HashAlgorithm};
use crate::tree::node::MerkleNode;
use crate::types::{Digest, NodeIndex};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Serialized node: children are nested, hashes are standard base64
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<Box<SnapshotNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<Box<SnapshotNode>>,
    #[serde(with = "base64_digest")]
    pub hash: Digest,
}

/// Persisted form of a [`MerkleTree`]
///
/// `root_hash` is lowercase hex; node hashes are base64, the usual JSON
/// encoding of a byte array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeSnapshot {
    pub root: SnapshotNode,
    pub created_at: DateTime<Utc>,
    pub file_count: usize,
    pub root_hash: String,
    #[serde(default)]
    pub algorithm: HashAlgorithm,
}

impl TreeSnapshot {
    pub fn from_tree(tree: &MerkleTree) -> Self {
        Self {
            root: expand(tree.nodes(), tree.root_index()),
            created_at: tree.created_at(),
            file_count: tree.leaf_count(),
            root_hash: tree.root_hash(),
            algorithm: tree.algorithm(),
        }
    }

    /// Rebuild the tree, checking every internal hash against its children
    pub fn into_tree(self) -> Result<MerkleTree, ApiError> {
        if !hasher::to_hex(&self.root.hash).eq_ignore_ascii_case(&self.root_hash) {
            return Err(ApiError::SnapshotError(format!(
                "root_hash {} does not match root node hash {}",
                self.root_hash,
                hasher::to_hex(&self.root.hash)
            )));
        }

        let mut nodes = Vec::new();
        let root = flatten(&self.root, self.algorithm, &mut nodes)?;
        let tree = MerkleTree::from_parts(
            nodes,
            root,
            self.file_count,
            self.created_at,
            self.algorithm,
        );

        if !file_count_fits_depth(self.file_count, tree.depth()) {
            return Err(ApiError::SnapshotError(format!(
                "file_count {} is impossible for a tree of depth {}",
                self.file_count,
                tree.depth()
            )));
        }
        Ok(tree)
    }

    pub fn to_json(&self) -> Result<String, ApiError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ApiError::SnapshotError(format!("failed to serialize tree: {}", e)))
    }

    pub fn from_json(json: &str) -> Result<Self, ApiError> {
        serde_json::from_str(json)
            .map_err(|e| ApiError::SnapshotError(format!("failed to parse JSON: {}", e)))
    }
}

mod base64_digest {
    use crate::types::Digest;
    use base64::{engine::general_purpose::STANDARD, Engine};
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(digest: &Digest, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(digest))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Digest, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        let bytes = STANDARD.decode(encoded.as_bytes()).map_err(D::Error::custom)?;
        bytes
            .try_into()
            .map_err(|b: Vec<u8>| D::Error::custom(format!("expected 32 hash bytes, got {}", b.len())))
    }
}

/// Every leaf of a padded tree sits at `depth`, so `n` leaves need
/// `2^(depth-1) < n <= 2^depth`.
fn file_count_fits_depth(file_count: usize, depth: usize) -> bool {
    if depth == 0 {
        return file_count == 1;
    }
    match u32::try_from(depth).ok().and_then(|d| 1usize.checked_shl(d)) {
        Some(capacity) => file_count > capacity / 2 && file_count <= capacity,
        None => false,
    }
}

fn expand(nodes: &[MerkleNode], index: NodeIndex) -> SnapshotNode {
    let node = &nodes[index];
    SnapshotNode {
        left: node.left.map(|child| Box::new(expand(nodes, child))),
        right: node.right.map(|child| Box::new(expand(nodes, child))),
        hash: node.hash,
    }
}

fn flatten(
    node: &SnapshotNode,
    algorithm: HashAlgorithm,
    nodes: &mut Vec<MerkleNode>,
) -> Result<NodeIndex, ApiError> {
    let hash = node.hash;

    let merkle_node = match (&node.left, &node.right) {
        (None, None) => MerkleNode::leaf(hash),
        (Some(left), Some(right)) => {
            let left = flatten(left, algorithm, nodes)?;
            let right = flatten(right, algorithm, nodes)?;
            let expected =
                algorithm.node_digest(Some(&nodes[left].hash), Some(&nodes[right].hash), None);
            if expected != hash {
                return Err(ApiError::SnapshotError(format!(
                    "node {} does not match its children",
                    hasher::to_hex(&hash)
                )));
            }
            MerkleNode::internal(left, right, hash)
        }
        _ => {
            return Err(ApiError::SnapshotError(format!(
                "node {} has exactly one child",
                hasher::to_hex(&hash)
            )))
        }
    };

    nodes.push(merkle_node);
    Ok(nodes.len() - 1)
}

/// Write a tree to `path` as pretty-printed JSON
pub fn save_to_file(tree: &MerkleTree, path: &Path) -> Result<(), ApiError> {
    let json = TreeSnapshot::from_tree(tree).to_json()?;
    std::fs::write(path, json).map_err(|source| ApiError::SnapshotIo {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), root_hash = %tree.root_hash(), "Saved tree snapshot");
    Ok(())
}

/// Read a tree snapshot from `path`
pub fn load_from_file(path: &Path) -> Result<MerkleTree, ApiError> {
    let json = std::fs::read_to_string(path).map_err(|source| ApiError::SnapshotIo {
        path: path.to_path_buf(),
        source,
    })?;
    let tree = TreeSnapshot::from_json(&json)?.into_tree()?;
    debug!(path = %path.display(), root_hash = %tree.root_hash(), "Loaded tree snapshot");
    Ok(tree)
}

/// Outcome of comparing a current tree with a previous one
///
/// Equality is decided by root hash alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeComparison {
    pub identical: bool,
    pub current_root_hash: String,
    pub previous_root_hash: String,
    pub current_file_count: usize,
    pub previous_file_count: usize,
}

impl TreeComparison {
    pub fn new(current: &MerkleTree, previous: &MerkleTree) -> Self {
        Self {
            identical: current.same_root(previous),
            current_root_hash: current.root_hash(),
            previous_root_hash: previous.root_hash(),
            current_file_count: current.leaf_count(),
            previous_file_count: previous.leaf_count(),
        }
    }

    pub fn file_count_changed(&self) -> bool {
        self.current_file_count != self.previous_file_count
    }
}
