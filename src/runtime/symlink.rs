//! Symlink operations (create, inspect, resolve, remove).

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::RealRuntime;
use super::path::normalize_path;

impl RealRuntime {
    #[tracing::instrument(skip(self))]
    pub(crate) fn symlink_dir_impl(&self, original: &Path, link: &Path) -> Result<()> {
        #[cfg(unix)]
        {
            std::os::unix::fs::symlink(original, link)
                .with_context(|| format!("Failed to create symlink {:?} -> {:?}", link, original))?;
        }
        #[cfg(windows)]
        {
            use tracing::debug;

            // Directory symlinks need Developer Mode or an elevated shell; junctions do not.
            if let Err(e) = std::os::windows::fs::symlink_dir(original, link) {
                debug!(
                    "symlink_dir {:?} -> {:?} failed ({}), falling back to a junction",
                    link, original, e
                );
                create_junction(original, link)?;
            }
        }
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn is_symlink_impl(&self, path: &Path) -> bool {
        fs::symlink_metadata(path)
            .map(|m| is_link_metadata(&m))
            .unwrap_or(false)
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn remove_symlink_impl(&self, path: &Path) -> Result<()> {
        #[cfg(unix)]
        {
            fs::remove_file(path).with_context(|| format!("Failed to remove symlink {:?}", path))?;
        }
        #[cfg(windows)]
        {
            // Directory symlinks and junctions are removed with remove_dir,
            // file symlinks with remove_file.
            fs::remove_dir(path)
                .or_else(|_| fs::remove_file(path))
                .with_context(|| format!("Failed to remove symlink {:?}", path))?;
        }
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn resolve_link_impl(&self, path: &Path) -> Result<PathBuf> {
        let target =
            fs::read_link(path).with_context(|| format!("Failed to read symlink {:?}", path))?;
        if target.is_absolute() {
            Ok(target)
        } else {
            let parent = path
                .parent()
                .context("Failed to get parent directory of symlink")?;
            Ok(normalize_path(&parent.join(&target)))
        }
    }
}

#[cfg(not(windows))]
fn is_link_metadata(metadata: &fs::Metadata) -> bool {
    metadata.file_type().is_symlink()
}

/// Junctions are reparse points that `is_symlink` does not report.
#[cfg(windows)]
fn is_link_metadata(metadata: &fs::Metadata) -> bool {
    use std::os::windows::fs::MetadataExt;
    const FILE_ATTRIBUTE_REPARSE_POINT: u32 = 0x400;

    metadata.file_type().is_symlink()
        || metadata.file_attributes() & FILE_ATTRIBUTE_REPARSE_POINT != 0
}

/// The standard library has no junction primitive, so this shells out to `mklink /J`.
#[cfg(windows)]
fn create_junction(original: &Path, link: &Path) -> Result<()> {
    use anyhow::bail;
    use std::process::Command;

    let output = Command::new("cmd")
        .arg("/C")
        .arg("mklink")
        .arg("/J")
        .arg(link)
        .arg(original)
        .output()
        .context("Failed to run mklink")?;

    if !output.status.success() {
        bail!(
            "mklink /J {:?} {:?} failed: {}",
            link,
            original,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    Ok(())
}
