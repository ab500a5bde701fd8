//! Git queries used by the hooks.
//!
//! Query failures never abort a hook: an unreadable index reads as
//! "nothing staged".

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Error;
use crate::runner::{CommandRunner, CommandSpec};

/// Paths staged for commit, relative to the repository root, in git's order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagedFiles(Vec<String>);

impl StagedFiles {
    /// Parse `git diff --cached --name-only -z` output.
    ///
    /// Entries are NUL-terminated and unquoted, so non-ASCII names arrive
    /// verbatim regardless of `core.quotePath`.
    pub fn parse(stdout: &str) -> Self {
        Self(
            stdout
                .split('\0')
                .filter(|entry| !entry.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn contains(&self, path: &str) -> bool {
        self.0.iter().any(|p| p == path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// List every staged path, deletions included. Any failure yields an empty set.
pub fn staged_files(runner: &dyn CommandRunner, repo_root: &Path) -> StagedFiles {
    query_staged(runner, repo_root, &[])
}

/// List staged paths whose index entry still exists.
///
/// A staged removal is left out: unstaging it would restore the entry.
pub fn staged_entries(runner: &dyn CommandRunner, repo_root: &Path) -> StagedFiles {
    query_staged(runner, repo_root, &["--diff-filter=d"])
}

fn query_staged(runner: &dyn CommandRunner, repo_root: &Path, extra: &[&str]) -> StagedFiles {
    let spec = CommandSpec::new("git")
        .args(["diff", "--cached", "--name-only", "-z"])
        .args(extra.iter().copied())
        .current_dir(repo_root);

    match runner.capture(&spec) {
        Ok(output) if output.success() => StagedFiles::parse(&output.stdout),
        Ok(output) => {
            debug!(
                code = output.exit_code,
                stderr = output.stderr.trim(),
                "Staged file query failed, treating as nothing staged"
            );
            StagedFiles::default()
        }
        Err(e) => {
            debug!(error = %e, "Could not run git, treating as nothing staged");
            StagedFiles::default()
        }
    }
}

/// Remove a single path from the index.
///
/// Uses `git reset HEAD`, falling back to `git rm --cached` for repositories
/// without a first commit.
pub fn unstage(runner: &dyn CommandRunner, repo_root: &Path, path: &str) -> Result<(), Error> {
    let reset = CommandSpec::new("git")
        .args(["reset", "HEAD", path])
        .current_dir(repo_root);
    let reset_err = match runner.capture(&reset) {
        Ok(output) if output.success() => return Ok(()),
        Ok(output) => output.stderr.trim().to_string(),
        Err(e) => e.to_string(),
    };
    debug!(path, error = %reset_err, "git reset failed, trying git rm --cached");

    let rm = CommandSpec::new("git")
        .args(["rm", "--cached", "--quiet", "--", path])
        .current_dir(repo_root);
    let output = runner.capture(&rm)?;
    if output.success() {
        Ok(())
    } else {
        Err(Error::other(format!(
            "could not unstage '{}': {}",
            path,
            output.stderr.trim()
        )))
    }
}

/// Resolve the repository root, if inside a work tree.
pub fn repo_root(runner: &dyn CommandRunner) -> Option<PathBuf> {
    let spec = CommandSpec::new("git").args(["rev-parse", "--show-toplevel"]);
    let output = runner.capture(&spec).ok().filter(|o| o.success())?;
    let root = output.stdout.trim();
    (!root.is_empty()).then(|| PathBuf::from(root))
}
