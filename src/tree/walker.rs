//! File enumeration: recursive directory expansion and direct path lists

use crate::error::HashError;
use crate::tree::path;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};
use walkdir::{DirEntry, WalkDir};

/// Filesystem walker configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkerConfig {
    /// Whether to descend into symlinked directories
    #[serde(default)]
    pub follow_symlinks: bool,
    /// Path components to skip entirely (e.g. ".git")
    #[serde(default)]
    pub ignore_patterns: Vec<String>,
    /// Maximum depth to traverse (None = unlimited)
    #[serde(default)]
    pub max_depth: Option<usize>,
}

/// Recursive file lister
pub struct Walker {
    root: PathBuf,
    config: WalkerConfig,
}

impl Walker {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            config: WalkerConfig::default(),
        }
    }

    pub fn with_config(root: PathBuf, config: WalkerConfig) -> Self {
        Self { root, config }
    }

    /// Collect every non-directory entry below the root
    ///
    /// Any unreadable entry aborts the walk. Returned paths are canonical,
    /// sorted by their raw bytes, and deduplicated only when byte-identical.
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub fn walk(&self) -> Result<Vec<PathBuf>, HashError> {
        let metadata = std::fs::metadata(&self.root).map_err(|e| HashError::io(&self.root, e))?;
        if !metadata.is_dir() {
            return Err(HashError::InvalidPath(format!(
                "not a directory: {}",
                self.root.display()
            )));
        }

        let walker = WalkDir::new(&self.root)
            .follow_links(self.config.follow_symlinks)
            .min_depth(1)
            .max_depth(self.config.max_depth.unwrap_or(usize::MAX));

        let mut files = Vec::new();
        let entries = walker
            .into_iter()
            .filter_entry(|entry| !self.should_ignore(entry));

        for entry in entries {
            let entry = entry.map_err(|e| {
                let at = e.path().map(Path::to_path_buf).unwrap_or_else(|| self.root.clone());
                HashError::io(at, e.into())
            })?;

            if entry.file_type().is_dir() {
                continue;
            }

            files.push(path::canonicalize_path(entry.path())?);
        }

        files.sort();
        files.dedup();

        debug!(file_count = files.len(), "Enumerated directory");
        Ok(files)
    }

    /// Ignore patterns match whole path components below the root
    fn should_ignore(&self, entry: &DirEntry) -> bool {
        if self.config.ignore_patterns.is_empty() {
            return false;
        }

        let relative = entry.path().strip_prefix(&self.root).unwrap_or(entry.path());
        relative.components().any(|component| match component {
            std::path::Component::Normal(name) => {
                let name = name.to_string_lossy();
                self.config
                    .ignore_patterns
                    .iter()
                    .any(|pattern| pattern.as_str() == name)
            }
            _ => false,
        })
    }
}

/// Expand a directory into its files with the default walker settings
pub fn list_files(directory: &Path) -> Result<Vec<PathBuf>, HashError> {
    Walker::new(directory.to_path_buf()).walk()
}

/// Validate an explicit list of file paths
///
/// A directory anywhere in the list rejects the whole call rather than being
/// expanded.
pub fn resolve_direct_paths<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<PathBuf>, HashError> {
    let mut resolved = Vec::with_capacity(paths.len());

    for path in paths {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path).map_err(|e| HashError::io(path, e))?;
        if metadata.is_dir() {
            return Err(HashError::DirectoryInFileList(path.to_path_buf()));
        }
        resolved.push(path::canonicalize_path(path)?);
    }

    Ok(resolved)
}
