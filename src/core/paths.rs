//! Path normalization utilities
//!
//! Paths shown in results use '/' as separator.

use std::path::Path;

/// Normalize a path to use '/' as separator (for cross-platform consistency)
pub fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Make a path relative to a base directory
pub fn make_relative(path: &Path, base: &Path) -> Option<String> {
    path.strip_prefix(base).ok().map(normalize_path)
}
