use anyhow::Result;
use clap::Parser;
use clap::builder::NonEmptyStringValueParser;
use pkglink::linker::{DEFAULT_DIST_DIR, DEFAULT_PACKAGES_DIR, LinkConfig};
use pkglink::runtime::{RealRuntime, Runtime, normalize_path};
use std::path::PathBuf;

/// pkglink - link monorepo packages into node_modules
///
/// For every package under the package directory, makes
/// `node_modules/<name>` a symlink to the package's build output and
/// the package's own `node_modules` a symlink to the shared one, so
/// local changes are visible to dependents without republishing.
///
/// Set RUST_LOG=info to see every check and change.
///
/// Examples:
///   pkglink                      # packages/*/dist into ./node_modules
///   pkglink -p libs -d build     # libs/*/build instead
#[derive(Parser, Debug)]
#[command(author, version = env!("PKGLINK_VERSION"), about)]
struct Cli {
    /// Directory containing one sub-directory per package, relative to the root
    #[arg(
        short = 'p',
        long = "packages",
        value_name = "DIR",
        default_value = DEFAULT_PACKAGES_DIR,
        value_parser = NonEmptyStringValueParser::new()
    )]
    packages: String,

    /// Build output directory inside each package
    #[arg(
        short = 'd',
        long = "dist",
        value_name = "DIR",
        default_value = DEFAULT_DIST_DIR,
        value_parser = NonEmptyStringValueParser::new()
    )]
    dist: String,

    /// Monorepo root holding node_modules (defaults to the current directory; also via PKGLINK_ROOT)
    #[arg(long = "root", short = 'r', env = "PKGLINK_ROOT", value_name = "PATH")]
    root: Option<PathBuf>,
}

impl Cli {
    fn into_config<R: Runtime>(self, runtime: &R) -> Result<LinkConfig> {
        let root = match self.root {
            Some(root) if root.is_absolute() => root,
            Some(root) => runtime.current_dir()?.join(root),
            None => runtime.current_dir()?,
        };
        Ok(LinkConfig::new(normalize_path(&root))
            .with_packages_dir(self.packages)
            .with_dist_dir(self.dist))
    }
}

/// Invalid flags exit with status 1; `--help` and `--version` still exit 0.
fn parse_cli() -> Cli {
    match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = parse_cli();
    let runtime = RealRuntime;
    let config = cli.into_config(&runtime)?;

    pkglink::linker::link(runtime, config).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::Path;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["pkglink"]).unwrap();
        assert_eq!(cli.packages, "packages");
        assert_eq!(cli.dist, "dist");
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::try_parse_from(["pkglink", "-p", "libs", "-d", "build"]).unwrap();
        assert_eq!(cli.packages, "libs");
        assert_eq!(cli.dist, "build");
    }

    #[test]
    fn test_cli_long_flags() {
        let cli =
            Cli::try_parse_from(["pkglink", "--packages", "libs", "--dist=lib", "--root", "/tmp"])
                .unwrap();
        assert_eq!(cli.packages, "libs");
        assert_eq!(cli.dist, "lib");
        assert_eq!(cli.root, Some(PathBuf::from("/tmp")));
    }

    #[test]
    fn test_cli_flag_without_value_fails() {
        assert!(Cli::try_parse_from(["pkglink", "--packages"]).is_err());
        assert!(Cli::try_parse_from(["pkglink", "-d"]).is_err());
    }

    #[test]
    fn test_cli_empty_value_fails() {
        assert!(Cli::try_parse_from(["pkglink", "--packages", ""]).is_err());
        assert!(Cli::try_parse_from(["pkglink", "--dist="]).is_err());
    }

    #[test]
    fn test_cli_repeated_flag_fails() {
        assert!(Cli::try_parse_from(["pkglink", "-p", "a", "-p", "b"]).is_err());
    }

    #[test]
    fn test_cli_positional_fails() {
        assert!(Cli::try_parse_from(["pkglink", "packages"]).is_err());
    }

    #[test]
    fn test_into_config_uses_current_dir() {
        let runtime = RealRuntime;
        let cli = Cli::try_parse_from(["pkglink", "-p", "libs"]).unwrap();
        let config = Cli {
            root: None,
            ..cli
        }
        .into_config(&runtime)
        .unwrap();
        assert_eq!(config.root, normalize_path(&std::env::current_dir().unwrap()));
        assert_eq!(config.packages_dir, Path::new("libs"));
    }

    #[test]
    fn test_into_config_resolves_relative_root() {
        let runtime = RealRuntime;
        let cli = Cli {
            packages: "packages".to_string(),
            dist: "dist".to_string(),
            root: Some(PathBuf::from("repo/../monorepo")),
        };
        let config = cli.into_config(&runtime).unwrap();
        assert_eq!(
            config.root,
            normalize_path(&std::env::current_dir().unwrap()).join("monorepo")
        );
    }
}
