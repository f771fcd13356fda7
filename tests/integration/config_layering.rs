//! Configuration precedence: defaults, workspace file, environment

use merkleprint::config::ConfigLoader;
use merkleprint::HashAlgorithm;
use std::sync::Mutex;
use tempfile::TempDir;

/// Serializes tests that touch MERKLEPRINT_* environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

#[test]
fn test_defaults_without_files() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let dir = TempDir::new().unwrap();

    let config = ConfigLoader::load(dir.path()).unwrap();
    assert_eq!(config.hashing.timeout_secs, 30);
    assert_eq!(config.hashing.algorithm, HashAlgorithm::Sha256);
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_environment_overrides_workspace_file() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("merkleprint.toml"),
        "[hashing]\ntimeout_secs = 10\nmax_workers = 2\n",
    )
    .unwrap();

    std::env::set_var("MERKLEPRINT__HASHING__TIMEOUT_SECS", "45");
    let result = ConfigLoader::load(dir.path());
    std::env::remove_var("MERKLEPRINT__HASHING__TIMEOUT_SECS");

    let config = result.unwrap();
    assert_eq!(config.hashing.timeout_secs, 45);
    assert_eq!(config.hashing.max_workers, Some(2));
}

#[test]
fn test_environment_specific_file_overrides_base() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("merkleprint.toml"),
        "[hashing]\nalgorithm = \"sha256\"\n",
    )
    .unwrap();
    std::fs::write(
        dir.path().join("merkleprint.ci.toml"),
        "[hashing]\nalgorithm = \"blake3\"\n",
    )
    .unwrap();

    std::env::set_var("MERKLEPRINT_ENV", "ci");
    let result = ConfigLoader::load(dir.path());
    std::env::remove_var("MERKLEPRINT_ENV");

    assert_eq!(result.unwrap().hashing.algorithm, HashAlgorithm::Blake3);
}

#[test]
fn test_invalid_workspace_file_is_rejected() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("merkleprint.toml"),
        "[logging]\nformat = \"xml\"\n",
    )
    .unwrap();

    assert!(ConfigLoader::load(dir.path()).is_err());
}
