//! Sub-package discovery.
//!
//! A monorepo keeps one directory per sub-package under the package root,
//! each with a `package.json` manifest declaring the package name.

mod discovery;
mod manifest;

use std::path::PathBuf;

pub use discovery::discover_packages;
pub use manifest::{MANIFEST_FILE, Manifest};

/// A sub-package found under the package root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    /// Name declared in the manifest, e.g. `pkg-a` or `@scope/pkg-a`
    pub name: String,
    /// Absolute path of the package directory
    pub path: PathBuf,
}

impl Package {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}
