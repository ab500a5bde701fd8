//! External collaborator scripts.
//!
//! An [`ExternalCheck`] is an interpreter, a script under the repository root
//! and the mode flags for one invocation. It refuses to run when the script is
//! missing so the hook can name the expected path.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::Error;
use crate::runner::{CommandRunner, CommandSpec, Invocation, Mode};

#[derive(Debug, Clone)]
pub struct ExternalCheck {
    interpreter: String,
    repo_root: PathBuf,
    script: PathBuf,
    flags: Vec<String>,
}

impl ExternalCheck {
    /// `script` is relative to `repo_root`.
    pub fn new(interpreter: &str, repo_root: &Path, script: &Path) -> Self {
        Self {
            interpreter: interpreter.to_string(),
            repo_root: repo_root.to_path_buf(),
            script: script.to_path_buf(),
            flags: Vec::new(),
        }
    }

    pub fn flag(mut self, flag: &str) -> Self {
        self.flags.push(flag.to_string());
        self
    }

    /// Absolute path to the script.
    pub fn script_path(&self) -> PathBuf {
        self.repo_root.join(&self.script)
    }

    /// Interpreter file name, as an operator would type it.
    pub fn interpreter_name(&self) -> &str {
        Path::new(&self.interpreter)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(&self.interpreter)
    }

    pub fn ensure_present(&self) -> Result<(), Error> {
        if self.script_path().is_file() {
            Ok(())
        } else {
            Err(Error::CollaboratorMissing(self.script.clone()))
        }
    }

    pub fn command(&self) -> CommandSpec {
        CommandSpec::new(&self.interpreter)
            .arg(self.script_path().display().to_string())
            .args(self.flags.iter().cloned())
            .current_dir(&self.repo_root)
    }

    /// Run the script and return its outcome unmodified.
    pub fn run(&self, runner: &dyn CommandRunner, mode: Mode) -> Result<Invocation, Error> {
        self.ensure_present()?;
        let spec = self.command();
        info!(command = %spec, ?mode, "Invoking collaborator");
        let invocation = runner.run(&spec, mode)?;
        debug!(code = invocation.exit_code(), "Collaborator finished");
        Ok(invocation)
    }

    /// Command line to run by hand from the repository root.
    pub fn manual_command(&self, flags: &[&str]) -> String {
        self.command_line(&self.script, flags)
    }

    /// Command line to run by hand from any directory.
    pub fn manual_command_absolute(&self, flags: &[&str]) -> String {
        self.command_line(&self.script_path(), flags)
    }

    fn command_line(&self, script: &Path, flags: &[&str]) -> String {
        let mut line = format!("{} {}", self.interpreter_name(), script.display());
        for flag in flags {
            line.push(' ');
            line.push_str(flag);
        }
        line
    }
}
