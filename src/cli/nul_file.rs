//! Stray Windows `nul` file guard.
//!
//! `cmd.exe` redirections such as `2>nul` create a real file named `nul` when
//! run from a POSIX shell. A staged `nul` is removed from disk and the index
//! and the commit is failed so the developer commits again. An unstaged `nul`
//! is deleted quietly and the commit proceeds.

use std::fs;
use std::io;
use std::path::Path;

use tracing::{info, warn};

use crate::git;
use crate::guidance::Console;
use crate::runner::CommandRunner;

/// Repository-relative path of the stray file.
pub const NUL_FILE: &str = "nul";

/// Result of one best-effort cleanup action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Done,
    NotNeeded,
    Failed(String),
}

/// What the guard found and did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NulReport {
    pub exit_code: i32,
    pub staged: bool,
    pub removed: Step,
    pub unstaged: Step,
}

type Remover = fn(&Path) -> io::Result<()>;

pub struct NulGuard<'a> {
    repo_root: &'a Path,
    runner: &'a dyn CommandRunner,
    remove: Remover,
}

impl<'a> NulGuard<'a> {
    pub fn new(repo_root: &'a Path, runner: &'a dyn CommandRunner) -> Self {
        Self {
            repo_root,
            runner,
            remove: |path| fs::remove_file(path),
        }
    }

    /// Replace the file deletion routine.
    pub fn with_remover(mut self, remove: Remover) -> Self {
        self.remove = remove;
        self
    }

    pub fn run(&self, console: &mut Console<'_>) -> NulReport {
        let staged = git::staged_entries(self.runner, self.repo_root);

        if staged.contains(NUL_FILE) {
            print_staged_guidance(console);
            // Independent steps: a failed delete must not skip the unstage.
            let removed = self.remove_from_disk();
            let unstaged = self.unstage();
            if let Step::Failed(reason) = &removed {
                console.say(format!("Warning: could not remove 'nul': {}", reason));
            }
            if let Step::Failed(reason) = &unstaged {
                console.say(format!("Warning: could not unstage 'nul': {}", reason));
            }
            console.say("Fixed! Please commit again.");
            return NulReport {
                exit_code: 1,
                staged: true,
                removed,
                unstaged,
            };
        }

        let removed = if self.nul_path_is_file() {
            console.blank();
            console.say("WARNING: Found 'nul' file in working directory");
            console.say("Auto-cleanup: Removing it...");
            let removed = self.remove_from_disk();
            match removed {
                Step::Failed(_) => {
                    console.say("Could not remove 'nul' file; please remove manually.")
                }
                _ => console.say("Cleaned up."),
            }
            removed
        } else {
            Step::NotNeeded
        };

        NulReport {
            exit_code: 0,
            staged: false,
            removed,
            unstaged: Step::NotNeeded,
        }
    }

    fn nul_path_is_file(&self) -> bool {
        self.repo_root.join(NUL_FILE).is_file()
    }

    fn remove_from_disk(&self) -> Step {
        if !self.nul_path_is_file() {
            return Step::NotNeeded;
        }
        let path = self.repo_root.join(NUL_FILE);
        match (self.remove)(&path) {
            Ok(()) => {
                info!(path = %path.display(), "Removed stray nul file");
                Step::Done
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not remove stray nul file");
                Step::Failed(e.to_string())
            }
        }
    }

    fn unstage(&self) -> Step {
        match git::unstage(self.runner, self.repo_root, NUL_FILE) {
            Ok(()) => {
                info!("Unstaged stray nul file");
                Step::Done
            }
            Err(e) => {
                warn!(error = %e, "Could not unstage stray nul file");
                Step::Failed(e.to_string())
            }
        }
    }
}

fn print_staged_guidance(console: &mut Console<'_>) {
    console.blank();
    console.say("ERROR: Attempting to commit Windows 'nul' file");
    console.blank();
    console.say("The file 'nul' is created by Windows command redirections like:");
    console.say("  dir /s /b *.json 2>nul");
    console.blank();
    console.say("Solutions:");
    console.say("  1. Use PowerShell: Get-ChildItem -Recurse -Filter *.json");
    console.say("  2. Use bash/Git Bash: find . -name '*.json' 2>/dev/null");
    console.say("  3. Don't redirect stderr: dir /s /b *.json");
    console.blank();
    console.say("Auto-cleanup: Removing 'nul' file and unstaging...");
}
