//! End-to-end command execution through the CLI run context

use clap::Parser;
use merkleprint::cli::{Cli, RunContext};
use merkleprint::config::MerkleprintConfig;
use std::fs;
use tempfile::TempDir;

fn run(args: &[&str], workspace: &TempDir) -> Result<String, merkleprint::ApiError> {
    let cli = Cli::try_parse_from(args).unwrap();
    RunContext::with_config(workspace.path().to_path_buf(), MerkleprintConfig::default())
        .execute(&cli.command)
}

#[test]
fn test_build_directory_then_show_snapshot() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("data");
    fs::create_dir_all(data.join("nested")).unwrap();
    fs::write(data.join("a.txt"), "a").unwrap();
    fs::write(data.join("nested/b.txt"), "b").unwrap();
    let saved = dir.path().join("tree.json");

    let built = run(
        &[
            "merkleprint",
            "build",
            data.to_str().unwrap(),
            "--save",
            saved.to_str().unwrap(),
        ],
        &dir,
    )
    .unwrap();
    assert!(built.contains("File Count: 2"));
    assert!(built.contains("Tree saved to"));

    let shown = run(&["merkleprint", "show", saved.to_str().unwrap()], &dir).unwrap();
    assert!(shown.contains("=== Saved Merkle Tree ==="));
    assert!(shown.contains("File Count: 2"));
}

#[test]
fn test_build_json_output() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("only.txt");
    fs::write(&file, "only").unwrap();

    let out = run(
        &[
            "merkleprint",
            "build",
            file.to_str().unwrap(),
            "--algorithm",
            "blake3",
            "--format",
            "json",
        ],
        &dir,
    )
    .unwrap();
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["file_count"], 1);
    assert_eq!(value["algorithm"], "blake3");
    assert_eq!(
        value["root_hash"],
        hex::encode(blake3::hash(b"only").as_bytes())
    );
}

#[test]
fn test_build_with_compare_detects_change() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("f.txt");
    fs::write(&file, "v1").unwrap();
    let saved = dir.path().join("v1.json");

    run(
        &[
            "merkleprint",
            "build",
            file.to_str().unwrap(),
            "--save",
            saved.to_str().unwrap(),
        ],
        &dir,
    )
    .unwrap();

    fs::write(&file, "v2").unwrap();
    let out = run(
        &[
            "merkleprint",
            "build",
            file.to_str().unwrap(),
            "--compare",
            saved.to_str().unwrap(),
        ],
        &dir,
    )
    .unwrap();
    assert!(out.contains("DIFFERENT"));
    assert!(!out.contains("File count changed"));
}

#[test]
fn test_timeout_zero_reports_deadline() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("f.txt");
    fs::write(&file, "data").unwrap();

    let err = run(
        &["merkleprint", "build", file.to_str().unwrap(), "--timeout", "0"],
        &dir,
    )
    .unwrap_err();
    assert!(merkleprint::cli::map_error(&err).contains("timed out"));
}
