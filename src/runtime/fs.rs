//! File system operations (read, directory, copy, remove).

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::RealRuntime;

impl RealRuntime {
    #[tracing::instrument(skip(self))]
    pub(crate) fn read_to_string_impl(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn create_dir_all_impl(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path).with_context(|| format!("Failed to create directory {:?}", path))
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn remove_file_impl(&self, path: &Path) -> Result<()> {
        fs::remove_file(path).with_context(|| format!("Failed to remove file {:?}", path))
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn remove_dir_all_impl(&self, path: &Path) -> Result<()> {
        fs::remove_dir_all(path)
            .with_context(|| format!("Failed to remove directory {:?} and its contents", path))
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn read_dir_impl(&self, path: &Path) -> Result<Vec<PathBuf>> {
        fs::read_dir(path)
            .with_context(|| format!("Failed to read directory {:?}", path))?
            .map(|entry| Ok(entry?.path()))
            .collect()
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn copy_dir_impl(&self, from: &Path, to: &Path) -> Result<()> {
        fs::create_dir_all(to).with_context(|| format!("Failed to create directory {:?}", to))?;
        fs_extra::dir::copy(
            from,
            to,
            &fs_extra::dir::CopyOptions::new()
                .content_only(true)
                .overwrite(true),
        )
        .map_err(|e| anyhow::anyhow!("Failed to copy {:?} to {:?}: {}", from, to, e))?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn lexists_impl(&self, path: &Path) -> bool {
        fs::symlink_metadata(path).is_ok()
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn is_dir_impl(&self, path: &Path) -> bool {
        path.is_dir()
    }
}

#[cfg(test)]
mod tests {
    use crate::runtime::{RealRuntime, Runtime};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_real_runtime_dir_ops() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();
        let sub_dir = dir.path().join("sub/nested");

        runtime.create_dir_all(&sub_dir).unwrap();
        assert!(sub_dir.exists());
        assert!(runtime.lexists(&sub_dir));
        assert!(runtime.is_dir(&sub_dir));

        let parent = dir.path().join("sub");
        let entries = runtime.read_dir(&parent).unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].ends_with("nested"));

        runtime.remove_dir_all(&parent).unwrap();
        assert!(!parent.exists());
        assert!(!runtime.lexists(&parent));
    }

    #[test]
    fn test_real_runtime_file_ops() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("package.json");
        fs::write(&file_path, r#"{"name":"pkg-a"}"#).unwrap();

        assert_eq!(
            runtime.read_to_string(&file_path).unwrap(),
            r#"{"name":"pkg-a"}"#
        );
        assert!(!runtime.is_dir(&file_path));

        runtime.remove_file(&file_path).unwrap();
        assert!(!file_path.exists());
    }

    #[test]
    fn test_copy_dir_copies_nested_contents() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();
        let from = dir.path().join("from");
        fs::create_dir_all(from.join("lib")).unwrap();
        fs::write(from.join("index.js"), "module.exports = 1;").unwrap();
        fs::write(from.join("lib/util.js"), "exports.x = 2;").unwrap();

        let to = dir.path().join("to");
        runtime.copy_dir(&from, &to).unwrap();

        assert_eq!(
            fs::read_to_string(to.join("index.js")).unwrap(),
            "module.exports = 1;"
        );
        assert_eq!(
            fs::read_to_string(to.join("lib/util.js")).unwrap(),
            "exports.x = 2;"
        );
        // Contents only: no nested "from" directory
        assert!(!to.join("from").exists());
    }

    #[test]
    fn test_real_runtime_errors() {
        let runtime = RealRuntime;
        let missing = std::path::Path::new("/nonexistent/path/package.json");

        let err = runtime.read_to_string(missing).unwrap_err();
        assert!(format!("{:#}", err).contains("package.json"));

        assert!(runtime.read_dir(std::path::Path::new("/nonexistent/path")).is_err());
        assert!(runtime.remove_file(missing).is_err());
    }
}
