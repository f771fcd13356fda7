//! Path canonicalization so that sort order is stable across runs

use crate::error::HashError;
use std::path::{Path, PathBuf};

/// Canonicalize a path before it is sorted and hashed
///
/// The result is absolute with symlinks and `..`/`.` resolved. Its bytes are
/// exactly what the filesystem returned: this path is opened later, so names
/// are neither Unicode-normalized nor lossily converted.
pub fn canonicalize_path(path: &Path) -> Result<PathBuf, HashError> {
    // dunce avoids `\\?\` prefixes on Windows
    dunce::canonicalize(path).map_err(|e| HashError::io(path, e))
}
