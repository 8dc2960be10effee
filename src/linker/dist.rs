use anyhow::{Result, bail};
use log::info;
use std::path::Path;

use super::{LinkConfig, LinkOutcome, ensure_parent_dir, remove_path, warn_if_foreign_link};
use crate::package::Package;
use crate::runtime::Runtime;

/// Make `<root>/node_modules/<name>` a link to the package's build output directory.
///
/// - shared entry is a symlink: left alone, except that a link to this package's
///   missing build output gets that directory recreated
/// - shared entry is a real directory: its contents replace the build output,
///   then the directory is swapped for a link
/// - shared entry missing: link to the build output, creating it first if needed
#[tracing::instrument(skip(runtime, config))]
pub fn link_dist<R: Runtime>(
    runtime: &R,
    config: &LinkConfig,
    package: &Package,
) -> Result<LinkOutcome> {
    let shared = config.shared_entry(package);
    let dist = config.dist_path(package);

    if runtime.lexists(&shared) {
        info!("{:?} exists", shared);

        if runtime.is_symlink(&shared) {
            info!("{:?} is a symbolic link", shared);
            if warn_if_foreign_link(runtime, &shared, &dist) && !runtime.is_dir(&dist) {
                // Our own link, left dangling by a deleted build output
                create_dist(runtime, &dist)?;
                return Ok(LinkOutcome::CreatedAndLinked);
            }
            return Ok(LinkOutcome::AlreadyLinked);
        }

        info!("{:?} is not a symbolic link", shared);
        if !runtime.is_dir(&shared) {
            bail!("{:?} exists but is neither a directory nor a symlink", shared);
        }

        remove_path(runtime, &dist)?;
        runtime.copy_dir(&shared, &dist)?;
        remove_path(runtime, &shared)?;
        runtime.symlink_dir(&dist, &shared)?;
        return Ok(LinkOutcome::Converted);
    }

    info!("{:?} does not exist", shared);
    ensure_parent_dir(runtime, &shared)?;

    let outcome = if runtime.is_dir(&dist) {
        info!("{:?} exists", dist);
        LinkOutcome::Linked
    } else {
        create_dist(runtime, &dist)?;
        LinkOutcome::CreatedAndLinked
    };

    runtime.symlink_dir(&dist, &shared)?;
    Ok(outcome)
}

fn create_dist<R: Runtime>(runtime: &R, dist: &Path) -> Result<()> {
    if runtime.lexists(dist) {
        bail!("{:?} exists but is not a directory", dist);
    }
    info!("{:?} does not exist: create it", dist);
    runtime.create_dir_all(dist)
}
