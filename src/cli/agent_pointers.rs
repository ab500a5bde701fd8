//! Agent pointer validation.
//!
//! Pointer files (CLAUDE.md, AGENTS.md, ...) are generated from `.agent/`.
//! When any of them or anything under `.agent/` is staged, the generator is
//! run with `--check` and a stale result fails the commit.

use tracing::warn;

use crate::check::ExternalCheck;
use crate::cli::HookContext;
use crate::error::Error;
use crate::gate::RelevancePattern;
use crate::guidance::Console;
use crate::runner::{CommandRunner, Mode};

/// Run the validator.
pub fn run(
    ctx: &HookContext,
    runner: &dyn CommandRunner,
    console: &mut Console<'_>,
) -> Result<i32, Error> {
    let pointers = &ctx.config.pointers;
    let relevant = RelevancePattern::for_pointers(pointers)?;

    if !relevant.matches_staged(runner, &ctx.repo_root) {
        console.say("No agent files modified, skipping validation");
        return Ok(0);
    }
    console.say("Detected changes to agent files or pointer files");

    let generator = ExternalCheck::new(&ctx.config.interpreter, &ctx.repo_root, &pointers.generator);
    let output = generator
        .clone()
        .flag("--check")
        .run(runner, Mode::Capture)?
        .into_output();

    if output.success() {
        console.say("Agent pointer files are up to date");
        return Ok(0);
    }

    warn!(code = output.exit_code, "Agent pointer files are stale");
    console.blank();
    console.say("Agent pointer files are out of sync!");
    console.blank();
    console.say("To fix, run:");
    console.say(format!(
        "  {}",
        generator.manual_command_absolute(&[])
    ));
    console.say(format!("  git add {}", pointers.pointer_files.join(" ")));
    console.blank();
    console.echo_out(&output.stdout);
    console.echo_err(&output.stderr);
    Ok(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::runner::CommandOutput;
    use crate::testing::MockRunner;
    use std::path::Path;
    use tempfile::TempDir;

    const GENERATOR: &str = ".agent/scripts/generate_pointers.py";

    fn repo_with_generator() -> TempDir {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(GENERATOR);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "").unwrap();
        temp
    }

    fn context(root: &Path) -> HookContext {
        HookContext {
            repo_root: root.to_path_buf(),
            config: Config::default(),
        }
    }

    fn run_hook(ctx: &HookContext, runner: &MockRunner) -> Result<(i32, String, String), Error> {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let code = {
            let mut console = Console::new(&mut out, &mut err);
            run(ctx, runner, &mut console)?
        };
        Ok((
            code,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        ))
    }

    #[test]
    fn test_irrelevant_changes_skip_generator() {
        let repo = repo_with_generator();
        let runner = MockRunner::new();
        runner.on("git", "diff --cached", CommandOutput::ok("src/main.py\0"));

        let (code, out, _) = run_hook(&context(repo.path()), &runner).unwrap();
        assert_eq!(code, 0);
        assert!(out.contains("skipping validation"));
        assert!(!runner.was_called("python3", "--check"));
    }

    #[test]
    fn test_in_sync_pointers_pass() {
        let repo = repo_with_generator();
        let runner = MockRunner::new();
        runner.on("git", "diff --cached", CommandOutput::ok("AGENTS.md\0"));
        runner.on("python3", "--check", CommandOutput::ok(""));

        let (code, out, _) = run_hook(&context(repo.path()), &runner).unwrap();
        assert_eq!(code, 0);
        assert!(out.contains("Agent pointer files are up to date"));
        assert_eq!(runner.mode_of("--check"), Some(Mode::Capture));
    }

    #[test]
    fn test_stale_pointers_fail_with_remediation() {
        let repo = repo_with_generator();
        let runner = MockRunner::new();
        runner.on("git", "diff --cached", CommandOutput::ok(".agent/rules/style.md\0"));
        runner.on(
            "python3",
            "--check",
            CommandOutput::failed(2, "CLAUDE.md is stale\n", "diff follows\n"),
        );

        let (code, out, err) = run_hook(&context(repo.path()), &runner).unwrap();
        assert_eq!(code, 1);
        assert!(out.contains("Agent pointer files are out of sync!"));
        assert!(out.contains(&format!(
            "  python3 {}",
            repo.path().join(GENERATOR).display()
        )));
        assert!(out.contains(
            "  git add CLAUDE.md AGENTS.md .github/copilot-instructions.md .windsurf/rules.md"
        ));
        assert!(out.contains("CLAUDE.md is stale\n"));
        assert_eq!(err, "diff follows\n");
    }

    #[test]
    fn test_missing_generator_is_error() {
        let repo = TempDir::new().unwrap();
        let runner = MockRunner::new();
        runner.on("git", "diff --cached", CommandOutput::ok("CLAUDE.md\0"));

        let err = run_hook(&context(repo.path()), &runner).unwrap_err();
        assert_eq!(err.to_string(), format!("{} not found.", GENERATOR));
        assert!(!runner.was_called("python3", ""));
    }

    #[test]
    fn test_missing_generator_ignored_when_gate_closed() {
        let repo = TempDir::new().unwrap();
        let runner = MockRunner::new();
        runner.on("git", "diff --cached", CommandOutput::ok("README.md\0"));

        let (code, _, _) = run_hook(&context(repo.path()), &runner).unwrap();
        assert_eq!(code, 0);
    }

    #[test]
    fn test_repeated_runs_agree() {
        let repo = repo_with_generator();
        let runner = MockRunner::new();
        runner.on("git", "diff --cached", CommandOutput::ok("CLAUDE.md\0"));
        runner.on("python3", "--check", CommandOutput::failed(1, "", ""));

        let (first, _, _) = run_hook(&context(repo.path()), &runner).unwrap();
        let (second, _, _) = run_hook(&context(repo.path()), &runner).unwrap();
        assert_eq!(first, 1);
        assert_eq!(first, second);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_ascii_agent_file_is_validated() {
        let Some(repo) = crate::testing::git_repo() else {
            return;
        };
        let generator = repo.path().join(".agent/scripts/generate_pointers.sh");
        std::fs::create_dir_all(generator.parent().unwrap()).unwrap();
        std::fs::write(&generator, "echo 'CLAUDE.md is stale'\nexit 1\n").unwrap();
        let rule = repo.path().join(".agent/rules/caf\u{e9}.md");
        std::fs::create_dir_all(rule.parent().unwrap()).unwrap();
        std::fs::write(&rule, "# rules\n").unwrap();
        crate::testing::git(repo.path(), &["add", ".agent/rules"]);

        let mut ctx = context(repo.path());
        ctx.config.interpreter = "sh".to_string();
        ctx.config.pointers.generator = ".agent/scripts/generate_pointers.sh".into();

        let mut out = Vec::new();
        let mut err = Vec::new();
        let code = {
            let mut console = Console::new(&mut out, &mut err);
            run(&ctx, &crate::runner::SystemRunner, &mut console).unwrap()
        };
        let out = String::from_utf8(out).unwrap();
        assert_eq!(code, 1);
        assert!(out.contains("Detected changes to agent files or pointer files"));
        assert!(out.contains("CLAUDE.md is stale"));
    }
}
