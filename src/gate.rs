//! Staged-file gate: decide whether a hook's check applies at all.

use std::path::Path;

use regex::RegexSet;

use crate::config::PointersConfig;
use crate::error::Error;
use crate::git::{self, StagedFiles};
use crate::runner::CommandRunner;

/// Paths that make a check relevant when staged.
#[derive(Debug, Clone)]
pub struct RelevancePattern {
    set: RegexSet,
}

impl RelevancePattern {
    /// Build from directory prefixes, exact paths and raw expressions.
    pub fn new(prefixes: &[String], exact: &[String], extra: &[String]) -> Result<Self, Error> {
        let patterns = prefixes
            .iter()
            .map(|p| format!("^{}", regex::escape(p)))
            .chain(exact.iter().map(|p| format!("^{}$", regex::escape(p))))
            .chain(extra.iter().cloned());
        Ok(Self {
            set: RegexSet::new(patterns)?,
        })
    }

    pub fn for_pointers(config: &PointersConfig) -> Result<Self, Error> {
        Self::new(
            &config.watch_dirs,
            &config.pointer_files,
            &config.extra_patterns,
        )
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.set.is_match(path)
    }

    pub fn any_match(&self, staged: &StagedFiles) -> bool {
        staged.iter().any(|p| self.is_match(p))
    }

    /// Whether any path currently staged makes the check relevant.
    pub fn matches_staged(&self, runner: &dyn CommandRunner, repo_root: &Path) -> bool {
        self.any_match(&git::staged_files(runner, repo_root))
    }
}
