use anyhow::{Context, Result, bail};
use log::debug;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::{MANIFEST_FILE, Manifest, Package};
use crate::runtime::Runtime;

/// Find all sub-packages by reading the manifest of every directory under `packages_dir`.
///
/// Directory structure: `<packages_dir>/<dir>/package.json`
///
/// Plain files next to the package directories are skipped. A package directory
/// whose manifest is missing or invalid is an error, as are two packages declaring
/// the same name (both would claim the same `node_modules` entry).
#[tracing::instrument(skip(runtime))]
pub fn discover_packages<R: Runtime>(runtime: &R, packages_dir: &Path) -> Result<Vec<Package>> {
    let mut entries = runtime
        .read_dir(packages_dir)
        .with_context(|| format!("Cannot read package directory {:?}", packages_dir))?;
    entries.sort();

    let mut packages = Vec::new();
    let mut seen: HashMap<String, PathBuf> = HashMap::new();

    for entry in entries {
        if !runtime.is_dir(&entry) {
            debug!("Skipping {:?}: not a directory", entry);
            continue;
        }

        let manifest = Manifest::load(runtime, &entry.join(MANIFEST_FILE))?;
        if let Some(previous) = seen.get(&manifest.name) {
            bail!(
                "Package name {:?} is declared by both {:?} and {:?}",
                manifest.name,
                previous,
                entry
            );
        }

        debug!("Found package {} at {:?}", manifest.name, entry);
        seen.insert(manifest.name.clone(), entry.clone());
        packages.push(Package::new(manifest.name, entry));
    }

    Ok(packages)
}
