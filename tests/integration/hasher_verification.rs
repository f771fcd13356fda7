//! Digest output checked against the reference sha2 and blake3 implementations

use merkleprint::tree::hasher::{self, HashAlgorithm};
use sha2::{Digest as _, Sha256};

#[test]
fn test_sha256_known_vector() {
    let digest = hasher::leaf_digest(b"hello");
    assert_eq!(
        hasher::to_hex(&digest),
        "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
    );
}

#[test]
fn test_sha256_empty_input() {
    assert_eq!(
        hasher::to_hex(&HashAlgorithm::Sha256.leaf_digest(b"")),
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    );
}

#[test]
fn test_blake3_matches_reference() {
    let data = b"merkleprint blake3 leaf";
    let ours = HashAlgorithm::Blake3.leaf_digest(data);
    assert_eq!(ours, *blake3::hash(data).as_bytes());
}

#[test]
fn test_node_digest_is_hash_of_concatenation() {
    let left = hasher::leaf_digest(b"left");
    let right = hasher::leaf_digest(b"right");

    let mut reference = Sha256::new();
    reference.update(left);
    reference.update(right);
    let expected: [u8; 32] = reference.finalize().into();

    assert_eq!(hasher::node_digest(Some(&left), Some(&right), None), expected);
}

#[test]
fn test_hex_roundtrip_and_rejection() {
    let digest = hasher::leaf_digest(b"x");
    assert_eq!(hasher::from_hex(&hasher::to_hex(&digest)).unwrap(), digest);
    assert!(hasher::from_hex("abcd").is_err());
    assert!(hasher::from_hex("not hex").is_err());
}
