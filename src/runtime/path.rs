//! Path utility functions for normalization and display.

use std::path::{Component, Path, PathBuf};

/// Normalize a path by processing `.` and `..` components lexically.
/// This does not access the filesystem and does not follow symlinks.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // At the root there is nothing to pop; keep the `..`
                if !result.pop() {
                    result.push(component);
                }
            }
            _ => {
                result.push(component);
            }
        }
    }
    result
}

/// Whether two paths name the same location after lexical normalization.
pub fn same_location(a: &Path, b: &Path) -> bool {
    normalize_path(a) == normalize_path(b)
}

/// Render `path` relative to `base` for user-facing messages.
///
/// Falls back to the full path when `path` is not below `base`
/// (or a relative path cannot be computed, e.g. different drives on Windows).
pub fn display_relative(path: &Path, base: &Path) -> String {
    match pathdiff::diff_paths(path, base) {
        Some(rel) if !rel.is_absolute() && !rel.starts_with("..") && !rel.as_os_str().is_empty() => {
            rel.display().to_string()
        }
        _ => path.display().to_string(),
    }
}
