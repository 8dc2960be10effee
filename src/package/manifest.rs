use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::Path;

use crate::runtime::Runtime;

pub const MANIFEST_FILE: &str = "package.json";

/// The part of `package.json` the linker cares about.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Manifest {
    pub name: String,
}

impl Manifest {
    #[tracing::instrument(skip(runtime))]
    pub fn load<R: Runtime>(runtime: &R, path: &Path) -> Result<Self> {
        let content = runtime.read_to_string(path)?;
        Self::parse(&content).with_context(|| format!("Invalid manifest {:?}", path))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let manifest: Manifest =
            serde_json::from_str(content).context("Failed to parse package.json")?;
        manifest.validate()?;
        Ok(manifest)
    }

    fn validate(&self) -> Result<()> {
        let name = self.name.as_str();
        if name.trim().is_empty() {
            bail!("Package name is empty");
        }
        if name.trim() != name {
            bail!("Package name {:?} has leading or trailing whitespace", name);
        }
        // The name becomes a path under node_modules; only `@scope/name` may contain a separator.
        let segments: Vec<&str> = name.split('/').collect();
        let valid = match segments.as_slice() {
            [single] => !single.starts_with('@'),
            [scope, pkg] => scope.len() > 1 && scope.starts_with('@') && !pkg.is_empty(),
            _ => false,
        };
        if !valid || segments.iter().any(|s| *s == "." || *s == ".." || s.contains('\\')) {
            bail!("Invalid package name {:?}", self.name);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockRuntime;
    use mockall::predicate::eq;
    use std::path::PathBuf;

    #[test]
    fn test_parse_plain_name() {
        let manifest = Manifest::parse(r#"{"name": "pkg-a", "version": "1.0.0"}"#).unwrap();
        assert_eq!(manifest.name, "pkg-a");
    }

    #[test]
    fn test_parse_scoped_name() {
        let manifest = Manifest::parse(r#"{"name": "@acme/pkg-a"}"#).unwrap();
        assert_eq!(manifest.name, "@acme/pkg-a");
    }

    #[test]
    fn test_parse_ignores_unknown_fields() {
        let manifest = Manifest::parse(
            r#"{"name": "pkg-b", "dependencies": {"pkg-a": "*"}, "scripts": {"build": "tsc"}}"#,
        )
        .unwrap();
        assert_eq!(manifest.name, "pkg-b");
    }

    #[test]
    fn test_parse_missing_name_fails() {
        assert!(Manifest::parse(r#"{"version": "1.0.0"}"#).is_err());
    }

    #[test]
    fn test_parse_non_string_name_fails() {
        assert!(Manifest::parse(r#"{"name": 42}"#).is_err());
    }

    #[test]
    fn test_parse_invalid_json_fails() {
        assert!(Manifest::parse("{ not json").is_err());
    }

    #[test]
    fn test_parse_rejects_unsafe_names() {
        for name in [
            "", "  ", "..", "a/b", "@scope", "@/x", "@scope/", "../escape", "@s/..", "a\\b",
            " pkg-a", "pkg-a\n",
        ] {
            let json = serde_json::json!({ "name": name }).to_string();
            assert!(Manifest::parse(&json).is_err(), "expected {:?} to be rejected", name);
        }
    }

    #[test]
    fn test_parse_whitespace_name_error() {
        let err = Manifest::parse(r#"{"name": "pkg-a "}"#).unwrap_err();
        assert!(err.to_string().contains("leading or trailing whitespace"));
    }

    #[test]
    fn test_load_reads_through_runtime() {
        let mut runtime = MockRuntime::new();
        let path = PathBuf::from("/repo/packages/a/package.json");

        runtime
            .expect_read_to_string()
            .with(eq(path.clone()))
            .returning(|_| Ok(r#"{"name": "pkg-a"}"#.to_string()));

        let manifest = Manifest::load(&runtime, &path).unwrap();
        assert_eq!(manifest.name, "pkg-a");
    }

    #[test]
    fn test_load_error_names_the_file() {
        let mut runtime = MockRuntime::new();
        let path = PathBuf::from("/repo/packages/a/package.json");

        runtime
            .expect_read_to_string()
            .returning(|_| Ok(r#"{"private": true}"#.to_string()));

        let err = Manifest::load(&runtime, &path).unwrap_err();
        assert!(format!("{:#}", err).contains("/repo/packages/a/package.json"));
    }
}
