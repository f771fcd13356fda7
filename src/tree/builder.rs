//! Bottom-up Merkle tree construction over an ordered list of leaf digests

use crate::tree::hasher::{self, HashAlgorithm};
use crate::tree::node::MerkleNode;
use crate::types::{Digest, NodeIndex};
use chrono::{DateTime, Utc};
use std::time::Instant;
use tracing::{debug, instrument};

/// Immutable Merkle tree
///
/// Nodes live in an arena; a padded odd node is the same index referenced
/// twice by its parent, so no subtree is ever copied.
#[derive(Debug, Clone)]
pub struct MerkleTree {
    nodes: Vec<MerkleNode>,
    root: NodeIndex,
    leaf_count: usize,
    depth: usize,
    created_at: DateTime<Utc>,
    algorithm: HashAlgorithm,
}

impl MerkleTree {
    /// Build a tree from leaf digests, in the order given
    ///
    /// Returns `None` for an empty slice. Each level of odd length repeats
    /// its last node, then nodes are paired as `(nodes[i], nodes[i - 1])` for
    /// odd `i`: the odd-position node becomes the left child. Changing that
    /// order changes every root hash.
    #[instrument(skip(leaves), fields(leaf_count = leaves.len()))]
    pub fn build(leaves: &[Digest], algorithm: HashAlgorithm) -> Option<Self> {
        if leaves.is_empty() {
            return None;
        }

        let start = Instant::now();
        let mut nodes: Vec<MerkleNode> = Vec::with_capacity(leaves.len() * 2);
        let mut level: Vec<NodeIndex> = Vec::with_capacity(leaves.len() + 1);

        for leaf in leaves {
            level.push(nodes.len());
            nodes.push(MerkleNode::leaf(*leaf));
        }

        let mut depth = 0;
        while level.len() > 1 {
            if level.len() % 2 != 0 {
                let last = level[level.len() - 1];
                level.push(last);
            }

            let mut parents = Vec::with_capacity(level.len() / 2 + 1);
            for i in (1..level.len()).step_by(2) {
                let left = level[i];
                let right = level[i - 1];
                let hash = algorithm.node_digest(
                    Some(&nodes[left].hash),
                    Some(&nodes[right].hash),
                    None,
                );
                parents.push(nodes.len());
                nodes.push(MerkleNode::internal(left, right, hash));
            }

            level = parents;
            depth += 1;
        }

        let root = level[0];
        debug!(
            node_count = nodes.len(),
            depth,
            root_hash = %hasher::to_hex(&nodes[root].hash),
            duration_us = start.elapsed().as_micros() as u64,
            "Merkle tree built"
        );

        Some(Self {
            nodes,
            root,
            leaf_count: leaves.len(),
            depth,
            created_at: Utc::now(),
            algorithm,
        })
    }

    /// Hash raw buffers as leaves and build the tree, keeping input order
    pub fn from_blocks<B: AsRef<[u8]>>(blocks: &[B], algorithm: HashAlgorithm) -> Option<Self> {
        let leaves: Vec<Digest> = blocks
            .iter()
            .map(|block| algorithm.leaf_digest(block.as_ref()))
            .collect();
        Self::build(&leaves, algorithm)
    }

    /// Reassemble a tree from an existing arena (used when loading snapshots)
    pub(crate) fn from_parts(
        nodes: Vec<MerkleNode>,
        root: NodeIndex,
        leaf_count: usize,
        created_at: DateTime<Utc>,
        algorithm: HashAlgorithm,
    ) -> Self {
        let mut depth = 0;
        let mut cursor = nodes[root].left;
        while let Some(index) = cursor {
            depth += 1;
            cursor = nodes[index].left;
        }

        Self {
            nodes,
            root,
            leaf_count,
            depth,
            created_at,
            algorithm,
        }
    }

    pub fn root(&self) -> &MerkleNode {
        &self.nodes[self.root]
    }

    pub fn root_index(&self) -> NodeIndex {
        self.root
    }

    pub fn root_digest(&self) -> Digest {
        self.root().hash
    }

    /// Lowercase hex of the root digest
    pub fn root_hash(&self) -> String {
        hasher::to_hex(&self.root().hash)
    }

    pub fn node(&self, index: NodeIndex) -> Option<&MerkleNode> {
        self.nodes.get(index)
    }

    /// The node arena in insertion order
    ///
    /// Freshly built trees store leaves first; trees loaded from a snapshot
    /// store nodes in post-order. Walk from [`Self::root_index`] for structure.
    pub fn nodes(&self) -> &[MerkleNode] {
        &self.nodes
    }

    /// Children of a node as (left, right)
    pub fn children(&self, index: NodeIndex) -> Option<(&MerkleNode, &MerkleNode)> {
        let node = self.nodes.get(index)?;
        match (node.left, node.right) {
            (Some(left), Some(right)) => Some((&self.nodes[left], &self.nodes[right])),
            _ => None,
        }
    }

    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    /// Number of distinct nodes in the arena
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Levels above the leaves; zero for a single-leaf tree
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Root-hash equality
    ///
    /// Intentionally shallow: equal roots imply equal trees under collision
    /// resistance, so child nodes are not compared.
    pub fn same_root(&self, other: &MerkleTree) -> bool {
        self.root_digest() == other.root_digest()
    }
}

/// Build a tree with the default hash function
pub fn build_tree(leaves: &[Digest]) -> Option<MerkleTree> {
    MerkleTree::build(leaves, HashAlgorithm::default())
}
