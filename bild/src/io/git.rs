//! Git adapter used to locate the project root and name.
//!
//! Only `git rev-parse --show-toplevel` is needed. Any failure to get an
//! answer (not a repository, git missing) means "no repository", which callers
//! treat as a non-fatal fallback.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use anyhow::{Context, Result, anyhow};
use tracing::{debug, instrument};

/// Source of the current project's root directory.
pub trait RepoLocator {
    /// Repository root, or `None` when not inside a repository.
    fn find_root(&self) -> Option<PathBuf>;
}

/// Base name of a repository root, used as the default project name.
pub fn root_name(root: &Path) -> Option<String> {
    root.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
}

/// Wrapper for executing git commands in a working directory.
#[derive(Debug, Clone)]
pub struct Git {
    workdir: PathBuf,
}

impl Git {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }

    /// Absolute path of the repository's top-level directory.
    #[instrument(skip_all, fields(workdir = %self.workdir.display()))]
    pub fn toplevel(&self) -> Result<PathBuf> {
        let out = self.run_capture(&["rev-parse", "--show-toplevel"])?;
        let root = out.trim();
        if root.is_empty() {
            return Err(anyhow!("git rev-parse --show-toplevel returned nothing"));
        }
        debug!(root, "repository root");
        Ok(PathBuf::from(root))
    }

    fn run_capture(&self, args: &[&str]) -> Result<String> {
        let output = self.run_checked(args)?;
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    fn run_checked(&self, args: &[&str]) -> Result<Output> {
        let output = self.run(args)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("git {} failed: {}", args.join(" "), stderr.trim()));
        }
        Ok(output)
    }

    fn run(&self, args: &[&str]) -> Result<Output> {
        Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .with_context(|| format!("spawn git {}", args.join(" ")))
    }
}

impl RepoLocator for Git {
    fn find_root(&self) -> Option<PathBuf> {
        match self.toplevel() {
            Ok(root) => Some(root),
            Err(err) => {
                debug!(err = %err, "no git repository");
                None
            }
        }
    }
}
