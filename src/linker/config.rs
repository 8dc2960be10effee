use anyhow::{Result, bail};
use std::path::PathBuf;

use crate::package::Package;

pub const DEFAULT_PACKAGES_DIR: &str = "packages";
pub const DEFAULT_DIST_DIR: &str = "dist";
pub const MODULES_DIR: &str = "node_modules";

/// Where packages live and where their links go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkConfig {
    /// Monorepo root holding the shared `node_modules`
    pub root: PathBuf,
    /// Package root directory, relative to `root`
    pub packages_dir: PathBuf,
    /// Build-output directory name inside each package
    pub dist_dir: PathBuf,
}

impl LinkConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            packages_dir: PathBuf::from(DEFAULT_PACKAGES_DIR),
            dist_dir: PathBuf::from(DEFAULT_DIST_DIR),
        }
    }

    pub fn with_packages_dir(mut self, packages_dir: impl Into<PathBuf>) -> Self {
        self.packages_dir = packages_dir.into();
        self
    }

    pub fn with_dist_dir(mut self, dist_dir: impl Into<PathBuf>) -> Self {
        self.dist_dir = dist_dir.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.root.is_absolute() {
            bail!("Root directory {:?} must be absolute", self.root);
        }
        if self.packages_dir.as_os_str().is_empty() {
            bail!("Package directory must not be empty");
        }
        if self.dist_dir.as_os_str().is_empty() {
            bail!("Build output directory must not be empty");
        }
        // Joined onto every package path, so it has to stay inside the package
        if self.dist_dir.is_absolute()
            || self
                .dist_dir
                .components()
                .any(|c| !matches!(c, std::path::Component::Normal(_)))
        {
            bail!(
                "Build output directory {:?} must be a plain relative path inside the package",
                self.dist_dir
            );
        }
        // `<package>/node_modules` is replaced by a link to the shared directory
        if self.dist_dir.starts_with(MODULES_DIR) {
            bail!(
                "Build output directory {:?} must not be inside {}",
                self.dist_dir,
                MODULES_DIR
            );
        }
        Ok(())
    }

    /// `<root>/<packages_dir>`
    pub fn packages_path(&self) -> PathBuf {
        self.root.join(&self.packages_dir)
    }

    /// `<root>/node_modules`
    pub fn modules_path(&self) -> PathBuf {
        self.root.join(MODULES_DIR)
    }

    /// `<root>/node_modules/<name>`
    pub fn shared_entry(&self, package: &Package) -> PathBuf {
        package
            .name
            .split('/')
            .fold(self.modules_path(), |path, segment| path.join(segment))
    }

    /// `<package>/<dist_dir>`
    pub fn dist_path(&self, package: &Package) -> PathBuf {
        package.path.join(&self.dist_dir)
    }

    /// `<package>/node_modules`
    pub fn package_modules_path(&self, package: &Package) -> PathBuf {
        package.path.join(MODULES_DIR)
    }
}
