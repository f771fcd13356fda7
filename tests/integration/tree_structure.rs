//! Shape of built trees: padding, child order, depth

use merkleprint::tree::hasher::{self, HashAlgorithm};
use merkleprint::{build_tree, MerkleTree};

fn leaves(n: usize) -> Vec<[u8; 32]> {
    (0..n)
        .map(|i| hasher::leaf_digest(format!("leaf-{}", i).as_bytes()))
        .collect()
}

fn pair(left: &[u8; 32], right: &[u8; 32]) -> [u8; 32] {
    hasher::node_digest(Some(left), Some(right), None)
}

#[test]
fn test_four_leaves_swapped_pairs() {
    let l = leaves(4);
    let tree = build_tree(&l).unwrap();

    let a = pair(&l[1], &l[0]);
    let b = pair(&l[3], &l[2]);
    assert_eq!(tree.root_digest(), pair(&b, &a));
    assert_eq!(tree.depth(), 2);
    assert_eq!(tree.node_count(), 7);
}

#[test]
fn test_odd_level_repeats_last_node() {
    let l = leaves(3);
    let tree = build_tree(&l).unwrap();

    let a = pair(&l[1], &l[0]);
    let b = pair(&l[2], &l[2]);
    assert_eq!(tree.root_digest(), pair(&b, &a));
    assert_eq!(tree.leaf_count(), 3);
}

#[test]
fn test_padded_node_is_shared_not_copied() {
    let tree = build_tree(&leaves(3)).unwrap();
    // three leaves, two level-one parents, one root
    assert_eq!(tree.node_count(), 6);

    let padded = tree
        .nodes()
        .iter()
        .find(|n| n.left.is_some() && n.left == n.right)
        .expect("padded parent");
    assert!(tree.node(padded.left.unwrap()).unwrap().is_leaf());
}

#[test]
fn test_single_leaf_is_root() {
    let l = leaves(1);
    let tree = build_tree(&l).unwrap();
    assert_eq!(tree.root_digest(), l[0]);
    assert!(tree.root().is_leaf());
    assert_eq!(tree.depth(), 0);
}

#[test]
fn test_empty_input_has_no_tree() {
    assert!(build_tree(&[]).is_none());
}

#[test]
fn test_every_internal_node_has_two_children() {
    for n in 1..20 {
        let tree = build_tree(&leaves(n)).unwrap();
        for node in tree.nodes() {
            assert_eq!(node.left.is_some(), node.right.is_some());
            if let (Some(left), Some(right)) = (node.left, node.right) {
                let expected = pair(&tree.nodes()[left].hash, &tree.nodes()[right].hash);
                assert_eq!(node.hash, expected);
            }
        }
    }
}

#[test]
fn test_algorithm_is_recorded() {
    let tree = MerkleTree::from_blocks(&[b"a", b"b"], HashAlgorithm::Blake3).unwrap();
    assert_eq!(tree.algorithm(), HashAlgorithm::Blake3);
    assert_eq!(tree.root_hash().len(), 64);
}
