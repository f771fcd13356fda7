//! Same inputs give the same root regardless of argument order or worker count

use merkleprint::tree::hasher::{self, HashAlgorithm};
use merkleprint::tree::walker::WalkerConfig;
use merkleprint::{build_tree, Pipeline, PipelineInput, SchedulerConfig};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn write_files(dir: &TempDir, files: &[(&str, &str)]) -> Vec<PathBuf> {
    files
        .iter()
        .map(|(name, content)| {
            let path = dir.path().join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(&path, content).unwrap();
            path
        })
        .collect()
}

#[test]
fn test_argument_order_does_not_change_root() {
    let dir = TempDir::new().unwrap();
    let paths = write_files(&dir, &[("a.txt", "one"), ("b.txt", "two"), ("c.txt", "three")]);
    let pipeline = Pipeline::default();

    let forward = pipeline
        .build_blocking(PipelineInput::Paths(paths.clone()))
        .unwrap();
    let mut reversed_paths = paths;
    reversed_paths.reverse();
    let reversed = pipeline
        .build_blocking(PipelineInput::Paths(reversed_paths))
        .unwrap();

    assert_eq!(forward.root_hash(), reversed.root_hash());
}

#[test]
fn test_root_matches_sorted_leaf_digests() {
    let dir = TempDir::new().unwrap();
    let paths = write_files(&dir, &[("z.txt", "zed"), ("m.txt", "em"), ("a.txt", "ay")]);

    let tree = Pipeline::default()
        .build_blocking(PipelineInput::Paths(paths))
        .unwrap();

    let expected = build_tree(&[
        hasher::leaf_digest(b"ay"),
        hasher::leaf_digest(b"em"),
        hasher::leaf_digest(b"zed"),
    ])
    .unwrap();
    assert_eq!(tree.root_hash(), expected.root_hash());
}

#[test]
fn test_worker_count_does_not_change_root() {
    let dir = TempDir::new().unwrap();
    let files: Vec<(String, String)> = (0..25)
        .map(|i| (format!("f{:02}.txt", i), format!("content {}", i)))
        .collect();
    let refs: Vec<(&str, &str)> = files
        .iter()
        .map(|(n, c)| (n.as_str(), c.as_str()))
        .collect();
    let paths = write_files(&dir, &refs);

    let single = Pipeline::new(SchedulerConfig::default().with_max_workers(1))
        .build_blocking(PipelineInput::Paths(paths.clone()))
        .unwrap();
    let many = Pipeline::new(SchedulerConfig::default().with_max_workers(8))
        .build_blocking(PipelineInput::Paths(paths))
        .unwrap();

    assert_eq!(single.root_hash(), many.root_hash());
    assert_eq!(single.leaf_count(), 25);
}

#[test]
fn test_directory_expansion_is_recursive_and_stable() {
    let dir = TempDir::new().unwrap();
    write_files(
        &dir,
        &[("top.txt", "t"), ("sub/inner.txt", "i"), ("sub/deeper/leaf.txt", "l")],
    );

    let pipeline = Pipeline::default();
    let first = pipeline
        .build_blocking(PipelineInput::Directory(dir.path().to_path_buf()))
        .unwrap();
    let second = pipeline
        .build_blocking(PipelineInput::Directory(dir.path().to_path_buf()))
        .unwrap();

    assert_eq!(first.leaf_count(), 3);
    assert_eq!(first.root_hash(), second.root_hash());
}

#[test]
fn test_ignore_patterns_skip_components() {
    let dir = TempDir::new().unwrap();
    write_files(&dir, &[("keep.txt", "k"), ("target/skip.txt", "s")]);

    let tree = Pipeline::default()
        .with_walker_config(WalkerConfig {
            ignore_patterns: vec!["target".to_string()],
            ..WalkerConfig::default()
        })
        .build_blocking(PipelineInput::Directory(dir.path().to_path_buf()))
        .unwrap();

    assert_eq!(tree.leaf_count(), 1);
}

#[test]
fn test_content_change_changes_root() {
    let dir = TempDir::new().unwrap();
    let paths = write_files(&dir, &[("a.txt", "before"), ("b.txt", "same")]);
    let pipeline = Pipeline::default();

    let before = pipeline
        .build_blocking(PipelineInput::Paths(paths.clone()))
        .unwrap();
    fs::write(&paths[0], "after").unwrap();
    let after = pipeline.build_blocking(PipelineInput::Paths(paths)).unwrap();

    assert_ne!(before.root_hash(), after.root_hash());
}

#[test]
fn test_blocks_keep_input_order() {
    let pipeline = Pipeline::new(SchedulerConfig::default().with_algorithm(HashAlgorithm::Blake3));
    let ab = pipeline
        .build_blocking(PipelineInput::Blocks(vec![b"a".to_vec(), b"b".to_vec()]))
        .unwrap();
    let ba = pipeline
        .build_blocking(PipelineInput::Blocks(vec![b"b".to_vec(), b"a".to_vec()]))
        .unwrap();
    assert_ne!(ab.root_hash(), ba.root_hash());
}

#[cfg(target_os = "linux")]
#[test]
fn test_directory_with_decomposed_and_non_utf8_names() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("caf\u{e9}.txt"), "composed").unwrap();
    fs::write(dir.path().join("cafe\u{301}.txt"), "decomposed").unwrap();
    fs::write(dir.path().join(OsStr::from_bytes(b"bad\xff.bin")), "raw").unwrap();

    let tree = Pipeline::default()
        .build_blocking(PipelineInput::Directory(dir.path().to_path_buf()))
        .unwrap();

    assert_eq!(tree.leaf_count(), 3);
}
