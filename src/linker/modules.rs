use anyhow::Result;
use log::info;

use super::{LinkConfig, LinkOutcome, remove_path, warn_if_foreign_link};
use crate::package::Package;
use crate::runtime::Runtime;

/// Make `<package>/node_modules` a link to the shared `<root>/node_modules`.
///
/// An existing symlink is left alone; anything else at that path is removed first.
#[tracing::instrument(skip(runtime, config))]
pub fn link_modules<R: Runtime>(
    runtime: &R,
    config: &LinkConfig,
    package: &Package,
) -> Result<LinkOutcome> {
    let link = config.package_modules_path(package);
    let shared = config.modules_path();

    if runtime.lexists(&link) {
        info!("{:?} exists", link);

        if runtime.is_symlink(&link) {
            info!("{:?} is a symbolic link", link);
            warn_if_foreign_link(runtime, &link, &shared);
            return Ok(LinkOutcome::AlreadyLinked);
        }

        info!("{:?} is not a symbolic link", link);
        remove_path(runtime, &link)?;
        runtime.symlink_dir(&shared, &link)?;
        return Ok(LinkOutcome::Replaced);
    }

    info!("{:?} does not exist", link);
    runtime.symlink_dir(&shared, &link)?;
    Ok(LinkOutcome::Linked)
}
