//! Subprocess execution.
//!
//! Every git query and collaborator invocation goes through [`CommandRunner`]
//! so hooks can be exercised against a scripted runner in tests.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use tracing::debug;

use crate::error::Error;

/// A command line plus the directory it runs in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: &Path) -> Self {
        self.cwd = Some(dir.to_path_buf());
        self
    }

    fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(dir) = &self.cwd {
            cmd.current_dir(dir);
        }
        cmd
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// How the child's stdout/stderr are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Collect output as text; nothing is shown live.
    Capture,
    /// Child inherits our stdout/stderr.
    PassThrough,
}

/// Captured result of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Outcome of running a command in either mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    Captured(CommandOutput),
    Streamed(i32),
}

impl Invocation {
    pub fn exit_code(&self) -> i32 {
        match self {
            Invocation::Captured(output) => output.exit_code,
            Invocation::Streamed(code) => *code,
        }
    }

    /// Captured output; a streamed run yields an empty output with its exit code.
    pub fn into_output(self) -> CommandOutput {
        match self {
            Invocation::Captured(output) => output,
            Invocation::Streamed(exit_code) => CommandOutput {
                exit_code,
                ..CommandOutput::default()
            },
        }
    }
}

/// Runs commands to completion. No timeout is imposed.
pub trait CommandRunner {
    fn run(&self, spec: &CommandSpec, mode: Mode) -> Result<Invocation, Error>;

    fn capture(&self, spec: &CommandSpec) -> Result<CommandOutput, Error> {
        self.run(spec, Mode::Capture).map(Invocation::into_output)
    }
}

/// Runner backed by real processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, spec: &CommandSpec, mode: Mode) -> Result<Invocation, Error> {
        debug!(command = %spec, ?mode, "Running command");
        let spawn_err = |source: std::io::Error| Error::Spawn {
            program: spec.program.clone(),
            source,
        };

        match mode {
            Mode::Capture => {
                let output = spec.to_command().output().map_err(spawn_err)?;
                Ok(Invocation::Captured(CommandOutput {
                    exit_code: exit_code(output.status),
                    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                }))
            }
            Mode::PassThrough => {
                let status = spec.to_command().status().map_err(spawn_err)?;
                Ok(Invocation::Streamed(exit_code(status)))
            }
        }
    }
}

/// Killed-by-signal has no code; treat it as a plain failure.
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}
