//! Scripted command runner for tests.

use std::cell::RefCell;
use std::io;
use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

use crate::error::Error;
use crate::runner::{CommandOutput, CommandRunner, CommandSpec, Invocation, Mode};

struct Rule {
    program: String,
    needle: String,
    output: CommandOutput,
}

/// Answers commands from registered rules and records every call.
///
/// A rule matches when the program is equal and the space-joined arguments
/// contain the needle. The first matching rule wins. Unmatched commands fail
/// to spawn, like a missing executable.
#[derive(Default)]
pub struct MockRunner {
    rules: RefCell<Vec<Rule>>,
    calls: RefCell<Vec<(CommandSpec, Mode)>>,
}

impl CommandOutput {
    pub fn ok(stdout: &str) -> Self {
        CommandOutput {
            exit_code: 0,
            stdout: stdout.to_string(),
            stderr: String::new(),
        }
    }

    pub fn failed(exit_code: i32, stdout: &str, stderr: &str) -> Self {
        CommandOutput {
            exit_code,
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
        }
    }
}

impl MockRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&self, program: &str, needle: &str, output: CommandOutput) {
        self.rules.borrow_mut().push(Rule {
            program: program.to_string(),
            needle: needle.to_string(),
            output,
        });
    }

    pub fn calls(&self) -> Vec<(CommandSpec, Mode)> {
        self.calls.borrow().clone()
    }

    pub fn was_called(&self, program: &str, needle: &str) -> bool {
        self.calls
            .borrow()
            .iter()
            .any(|(spec, _)| spec.program == program && spec.args.join(" ").contains(needle))
    }

    /// Mode of the first call whose arguments contain the needle.
    pub fn mode_of(&self, needle: &str) -> Option<Mode> {
        self.calls
            .borrow()
            .iter()
            .find(|(spec, _)| spec.args.join(" ").contains(needle))
            .map(|(_, mode)| *mode)
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, spec: &CommandSpec, mode: Mode) -> Result<Invocation, Error> {
        self.calls.borrow_mut().push((spec.clone(), mode));

        let joined = spec.args.join(" ");
        let rules = self.rules.borrow();
        let rule = rules
            .iter()
            .find(|r| r.program == spec.program && joined.contains(&r.needle))
            .ok_or_else(|| Error::Spawn {
                program: spec.program.clone(),
                source: io::Error::new(io::ErrorKind::NotFound, "no scripted response"),
            })?;

        Ok(match mode {
            Mode::Capture => Invocation::Captured(rule.output.clone()),
            Mode::PassThrough => Invocation::Streamed(rule.output.exit_code),
        })
    }
}

/// Fresh repository with an identity configured, or None if git is unavailable.
pub fn git_repo() -> Option<TempDir> {
    let temp = TempDir::new().unwrap();
    let init = Command::new("git")
        .args(["init", "-q"])
        .current_dir(temp.path())
        .output()
        .ok()?;
    if !init.status.success() {
        return None;
    }
    git(temp.path(), &["config", "user.email", "guard@example.com"]);
    git(temp.path(), &["config", "user.name", "Guard Test"]);
    git(temp.path(), &["config", "commit.gpgsign", "false"]);
    Some(temp)
}

/// Run git in `dir`, panicking on failure. Returns stdout.
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}
