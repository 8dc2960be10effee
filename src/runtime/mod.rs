//! Runtime abstraction for system operations.
//!
//! Every filesystem call the linker makes goes through the [`Runtime`] trait,
//! so the linking state machine can be tested against a mock.
//!
//! # Structure
//!
//! - `path` - Path utility functions (normalize, display relative to a root)
//! - `env` - Process environment (current directory)
//! - `fs` - File system operations (read, directory, copy, remove)
//! - `symlink` - Symlink operations (create, inspect, resolve, remove)

mod env;
mod fs;
pub mod path;
mod symlink;

use anyhow::Result;
use std::path::{Path, PathBuf};

pub use path::{display_relative, normalize_path};

#[cfg_attr(test, mockall::automock)]
pub trait Runtime: Send + Sync {
    // Environment
    fn current_dir(&self) -> Result<PathBuf>;

    // File System
    fn read_to_string(&self, path: &Path) -> Result<String>;
    fn create_dir_all(&self, path: &Path) -> Result<()>;
    fn remove_file(&self, path: &Path) -> Result<()>;
    fn remove_dir_all(&self, path: &Path) -> Result<()>;
    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>>;

    /// Copy the contents of directory `from` into directory `to`, creating `to` if needed.
    fn copy_dir(&self, from: &Path, to: &Path) -> Result<()>;

    /// Whether anything (including a dangling symlink) occupies the path.
    fn lexists(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    // Symlinks
    /// Create a directory link at `link` pointing to `original`.
    /// On Windows this falls back to a junction when symlinks are not permitted.
    fn symlink_dir(&self, original: &Path, link: &Path) -> Result<()>;
    fn is_symlink(&self, path: &Path) -> bool;
    fn remove_symlink(&self, path: &Path) -> Result<()>;

    /// Resolve a symlink to an absolute path (without recursively resolving symlinks).
    /// If the link target is relative, it is resolved relative to the link's parent directory.
    fn resolve_link(&self, path: &Path) -> Result<PathBuf>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RealRuntime;

impl Runtime for RealRuntime {
    fn current_dir(&self) -> Result<PathBuf> {
        self.current_dir_impl()
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.read_to_string_impl(path)
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        self.create_dir_all_impl(path)
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        self.remove_file_impl(path)
    }

    fn remove_dir_all(&self, path: &Path) -> Result<()> {
        self.remove_dir_all_impl(path)
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        self.read_dir_impl(path)
    }

    fn copy_dir(&self, from: &Path, to: &Path) -> Result<()> {
        self.copy_dir_impl(from, to)
    }

    fn lexists(&self, path: &Path) -> bool {
        self.lexists_impl(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.is_dir_impl(path)
    }

    fn symlink_dir(&self, original: &Path, link: &Path) -> Result<()> {
        self.symlink_dir_impl(original, link)
    }

    fn is_symlink(&self, path: &Path) -> bool {
        self.is_symlink_impl(path)
    }

    fn remove_symlink(&self, path: &Path) -> Result<()> {
        self.remove_symlink_impl(path)
    }

    fn resolve_link(&self, path: &Path) -> Result<PathBuf> {
        self.resolve_link_impl(path)
    }
}
