//! Linking of package build outputs into the shared `node_modules`.
//!
//! For every package found under the package root two links are maintained:
//!
//! - `<root>/node_modules/<name>` -> `<package>/<dist>` ([`link_dist`])
//! - `<package>/node_modules` -> `<root>/node_modules` ([`link_modules`])
//!
//! All operations are started together and the run waits for every one of
//! them; a failing package never stops the others, and every failure is
//! reported at the end.

mod config;
mod dist;
mod modules;
mod report;

use anyhow::{Result, bail};
use futures_util::future::join_all;
use log::{debug, info, warn};
use std::path::Path;
use std::sync::Arc;

pub use config::{DEFAULT_DIST_DIR, DEFAULT_PACKAGES_DIR, LinkConfig, MODULES_DIR};
pub use dist::link_dist;
pub use modules::link_modules;
pub use report::{LinkFailure, LinkOperation, LinkOutcome, LinkReport, LinkSuccess};

use crate::package::{Package, discover_packages};
use crate::runtime::{Runtime, path::same_location};

/// Link every package under the configured root and print what changed.
#[tracing::instrument(skip(runtime))]
pub async fn link<R: Runtime + 'static>(runtime: R, config: LinkConfig) -> Result<()> {
    let linker = Linker::new(runtime, config);
    let report = linker.run().await?;
    report.print(&linker.config().root);
    report.into_result()?;
    Ok(())
}

pub struct Linker<R: Runtime> {
    runtime: Arc<R>,
    config: Arc<LinkConfig>,
}

impl<R: Runtime + 'static> Linker<R> {
    pub fn new(runtime: R, config: LinkConfig) -> Self {
        Self {
            runtime: Arc::new(runtime),
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    /// Discover packages and link all of them.
    ///
    /// Returns an error only when nothing could be attempted (invalid
    /// configuration, unreadable package root or manifest, unusable shared
    /// directory). Per-package failures are collected in the report.
    pub async fn run(&self) -> Result<LinkReport> {
        self.config.validate()?;

        let packages_path = self.config.packages_path();
        let packages = discover_packages(self.runtime.as_ref(), &packages_path)?;
        if packages.is_empty() {
            warn!("No packages found in {:?}", packages_path);
            return Ok(LinkReport::default());
        }
        info!("Linking {} package(s) from {:?}", packages.len(), packages_path);

        self.prepare_shared_dir()?;
        Ok(self.link_all(&packages).await)
    }

    /// Run both link operations for every package concurrently and wait for all of them.
    pub async fn link_all(&self, packages: &[Package]) -> LinkReport {
        let mut labels = Vec::with_capacity(packages.len() * 2);
        let mut handles = Vec::with_capacity(packages.len() * 2);

        for package in packages {
            for operation in [LinkOperation::Dist, LinkOperation::Modules] {
                let runtime = Arc::clone(&self.runtime);
                let config = Arc::clone(&self.config);
                let task_package = package.clone();
                handles.push(tokio::task::spawn_blocking(move || {
                    apply(runtime.as_ref(), &config, &task_package, operation)
                }));
                labels.push((package, operation));
            }
        }

        let results = join_all(handles).await;

        let mut report = LinkReport {
            packages: packages.len(),
            ..LinkReport::default()
        };
        for ((package, operation), result) in labels.into_iter().zip(results) {
            // A panicked task is reported like any other failure of that operation
            let result = result.unwrap_or_else(|e| Err(anyhow::anyhow!("Link task failed: {}", e)));
            match result {
                Ok(outcome) => {
                    let (link, target) = link_paths(&self.config, package, operation);
                    debug!("{} {}: {:?}", package.name, operation, outcome);
                    report.succeeded.push(LinkSuccess {
                        package: package.name.clone(),
                        operation,
                        outcome,
                        link,
                        target,
                    });
                }
                Err(error) => {
                    debug!("{} {} failed: {:#}", package.name, operation, error);
                    report.failed.push(LinkFailure {
                        package: package.name.clone(),
                        operation,
                        error,
                    });
                }
            }
        }
        report
    }

    /// Make sure `<root>/node_modules` is a directory links can be created in.
    fn prepare_shared_dir(&self) -> Result<()> {
        let modules = self.config.modules_path();
        if self.runtime.is_dir(&modules) {
            return Ok(());
        }
        if self.runtime.lexists(&modules) {
            bail!("{:?} exists but is not a directory", modules);
        }
        info!("{:?} does not exist: create it", modules);
        self.runtime.create_dir_all(&modules)
    }
}

fn apply<R: Runtime>(
    runtime: &R,
    config: &LinkConfig,
    package: &Package,
    operation: LinkOperation,
) -> Result<LinkOutcome> {
    match operation {
        LinkOperation::Dist => link_dist(runtime, config, package),
        LinkOperation::Modules => link_modules(runtime, config, package),
    }
}

/// (link location, link target) for an operation.
fn link_paths(
    config: &LinkConfig,
    package: &Package,
    operation: LinkOperation,
) -> (std::path::PathBuf, std::path::PathBuf) {
    match operation {
        LinkOperation::Dist => (config.shared_entry(package), config.dist_path(package)),
        LinkOperation::Modules => (config.package_modules_path(package), config.modules_path()),
    }
}

/// Remove whatever occupies `path`: a symlink itself (never its target),
/// a directory tree, or a file. A missing path is fine.
pub(crate) fn remove_path<R: Runtime>(runtime: &R, path: &Path) -> Result<()> {
    if runtime.is_symlink(path) {
        debug!("Removing symlink {:?}", path);
        runtime.remove_symlink(path)
    } else if runtime.is_dir(path) {
        debug!("Removing directory {:?}", path);
        runtime.remove_dir_all(path)
    } else if runtime.lexists(path) {
        debug!("Removing file {:?}", path);
        runtime.remove_file(path)
    } else {
        Ok(())
    }
}

pub(crate) fn ensure_parent_dir<R: Runtime>(runtime: &R, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !runtime.is_dir(parent) {
            debug!("Creating parent directory {:?}", parent);
            runtime.create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Existing links are never rewritten, but one pointing elsewhere is worth a warning.
/// Returns whether `link` points at `expected`.
pub(crate) fn warn_if_foreign_link<R: Runtime>(runtime: &R, link: &Path, expected: &Path) -> bool {
    match runtime.resolve_link(link) {
        Ok(target) if same_location(&target, expected) => true,
        Ok(target) => {
            warn!(
                "{:?} points to {:?} instead of {:?}; leaving it unchanged",
                link, target, expected
            );
            false
        }
        Err(e) => {
            debug!("Cannot read link {:?}: {:#}", link, e);
            false
        }
    }
}
