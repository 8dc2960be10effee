pub mod linker;
pub mod package;
pub mod runtime;

/// Test utilities for cross-platform path handling.
#[cfg(test)]
pub mod test_utils {
    use crate::linker::LinkConfig;
    use crate::package::Package;
    use crate::runtime::MockRuntime;
    use std::path::PathBuf;

    /// Returns the monorepo root used by mock-based tests.
    /// - Unix: `/work/repo`
    /// - Windows: `C:\work\repo`
    pub fn test_root() -> PathBuf {
        #[cfg(not(windows))]
        {
            PathBuf::from("/work/repo")
        }
        #[cfg(windows)]
        {
            PathBuf::from(r"C:\work\repo")
        }
    }

    /// Default configuration rooted at [`test_root`].
    pub fn test_config() -> LinkConfig {
        LinkConfig::new(test_root())
    }

    /// `pkg-a` living in `<root>/packages/a`.
    pub fn package_a() -> Package {
        Package::new("pkg-a", test_root().join("packages").join("a"))
    }

    /// Answer `lexists`, `is_symlink` and `is_dir` from a fixed picture of the filesystem.
    /// `links` are symlinks, `dirs` are real directories; everything else is missing.
    pub fn with_filesystem(runtime: &mut MockRuntime, links: Vec<PathBuf>, dirs: Vec<PathBuf>) {
        let (all_links, all_dirs) = (links.clone(), dirs.clone());
        runtime
            .expect_lexists()
            .returning(move |p| all_links.iter().chain(all_dirs.iter()).any(|x| x == p));
        runtime
            .expect_is_symlink()
            .returning(move |p| links.iter().any(|x| x == p));
        runtime
            .expect_is_dir()
            .returning(move |p| dirs.iter().any(|x| x == p));
    }
}
