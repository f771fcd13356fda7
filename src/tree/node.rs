//! Merkle node representation

use crate::types::{Digest, NodeIndex};

/// One node of a Merkle tree, stored in the tree's arena
///
/// Leaves have no children. Internal nodes always have both, because odd
/// levels are padded by repeating the last node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MerkleNode {
    pub left: Option<NodeIndex>,
    pub right: Option<NodeIndex>,
    pub hash: Digest,
}

impl MerkleNode {
    pub fn leaf(hash: Digest) -> Self {
        Self {
            left: None,
            right: None,
            hash,
        }
    }

    pub fn internal(left: NodeIndex, right: NodeIndex, hash: Digest) -> Self {
        Self {
            left: Some(left),
            right: Some(right),
            hash,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}
