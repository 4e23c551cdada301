//! Filesystem utilities

use std::path::Path;

/// Check if a path points at a regular file (symlinks are followed)
pub fn is_file(path: &str) -> bool {
    Path::new(path).is_file()
}
