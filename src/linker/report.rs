use anyhow::{Result, anyhow};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::runtime::display_relative;

/// The two links maintained for every package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOperation {
    /// `<root>/node_modules/<name>` -> `<package>/<dist>`
    Dist,
    /// `<package>/node_modules` -> `<root>/node_modules`
    Modules,
}

impl fmt::Display for LinkOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkOperation::Dist => write!(f, "build output link"),
            LinkOperation::Modules => write!(f, "node_modules link"),
        }
    }
}

/// What a link operation did to reach the linked state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    /// The path was already a symlink; nothing changed
    AlreadyLinked,
    /// A real directory was moved into the build output and replaced by a link
    Converted,
    /// A link was created to an existing target
    Linked,
    /// The build output directory was created, then linked
    CreatedAndLinked,
    /// A real directory was removed and replaced by a link
    Replaced,
}

impl LinkOutcome {
    /// Whether the operation touched the filesystem.
    pub fn is_mutation(&self) -> bool {
        !matches!(self, LinkOutcome::AlreadyLinked)
    }

    pub fn verb(&self) -> &'static str {
        match self {
            LinkOutcome::AlreadyLinked => "Already linked",
            LinkOutcome::Converted => "Moved into build output and linked",
            LinkOutcome::Linked => "Linked",
            LinkOutcome::CreatedAndLinked => "Created and linked",
            LinkOutcome::Replaced => "Replaced",
        }
    }
}

#[derive(Debug)]
pub struct LinkSuccess {
    pub package: String,
    pub operation: LinkOperation,
    pub outcome: LinkOutcome,
    /// The symlink location
    pub link: PathBuf,
    /// What the symlink points to
    pub target: PathBuf,
}

#[derive(Debug)]
pub struct LinkFailure {
    pub package: String,
    pub operation: LinkOperation,
    pub error: anyhow::Error,
}

/// Aggregate result of linking every discovered package.
#[derive(Debug, Default)]
pub struct LinkReport {
    pub packages: usize,
    pub succeeded: Vec<LinkSuccess>,
    pub failed: Vec<LinkFailure>,
}

impl LinkReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn mutations(&self) -> impl Iterator<Item = &LinkSuccess> {
        self.succeeded.iter().filter(|s| s.outcome.is_mutation())
    }

    /// Print one line per change, then a summary, with paths shown relative to `root`.
    pub fn print(&self, root: &Path) {
        for success in self.mutations() {
            println!(
                "{} {} -> {}",
                success.outcome.verb(),
                display_relative(&success.link, root),
                display_relative(&success.target, root)
            );
        }

        if self.failed.is_empty() {
            let changed = self.mutations().count();
            println!(
                "Linked {} package(s) ({} link(s) changed, {} already in place)",
                self.packages,
                changed,
                self.succeeded.len() - changed
            );
        }
    }

    /// Turn the report into an error listing every failure, if there were any.
    pub fn into_result(self) -> Result<Self> {
        if self.failed.is_empty() {
            return Ok(self);
        }

        let details = self
            .failed
            .iter()
            .map(|f| format!("  {} ({}): {:#}", f.package, f.operation, f.error))
            .collect::<Vec<_>>()
            .join("\n");
        Err(anyhow!(
            "{} of {} link operation(s) failed:\n{}",
            self.failed.len(),
            self.failed.len() + self.succeeded.len(),
            details
        ))
    }
}
