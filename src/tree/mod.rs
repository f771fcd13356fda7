//! Merkle tree over file digests
//!
//! Leaves are content digests in sorted-path order; internal nodes combine
//! pairs of children until a single root remains.

pub mod builder;
pub mod hasher;
pub mod node;
pub mod path;
pub mod walker;

pub use builder::{build_tree, MerkleTree};
pub use hasher::HashAlgorithm;
pub use node::MerkleNode;
