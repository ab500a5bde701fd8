//! Scattered documentation hook.
//!
//! Asks the organizer for a dry run and warns, or lets it move files when
//! auto-fix is on. The organizer's exit code is always the hook's exit code.

use tracing::warn;

use crate::check::ExternalCheck;
use crate::cli::HookContext;
use crate::error::Error;
use crate::guidance::Console;
use crate::runner::{CommandRunner, Mode};

/// Run the hook.
pub fn run(
    ctx: &HookContext,
    runner: &dyn CommandRunner,
    console: &mut Console<'_>,
    auto_fix: bool,
) -> Result<i32, Error> {
    // Runs on every commit; staged paths are never consulted.
    let organizer = ExternalCheck::new(
        &ctx.config.interpreter,
        &ctx.repo_root,
        &ctx.config.docs.organizer,
    );

    if auto_fix || ctx.config.docs.auto_fix {
        organize(&organizer, runner, console)
    } else {
        dry_run(&organizer, runner, console)
    }
}

fn organize(
    organizer: &ExternalCheck,
    runner: &dyn CommandRunner,
    console: &mut Console<'_>,
) -> Result<i32, Error> {
    organizer.ensure_present()?;
    console.say("Auto-organizing scattered documentation files...");
    console.flush();

    let code = organizer
        .clone()
        .flag("--auto-move")
        .run(runner, Mode::PassThrough)?
        .exit_code();

    if code == 0 {
        console.say("SUCCESS: Documentation organization completed successfully");
    } else {
        warn!(code, "Organizer failed");
        console.say("ERROR: Documentation organization failed");
    }
    Ok(code)
}

fn dry_run(
    organizer: &ExternalCheck,
    runner: &dyn CommandRunner,
    console: &mut Console<'_>,
) -> Result<i32, Error> {
    let output = organizer
        .clone()
        .flag("--dry-run")
        .run(runner, Mode::Capture)?
        .into_output();

    if output.success() {
        console.say("SUCCESS: All documentation files are properly organized");
        return Ok(0);
    }

    console.say("WARNING: Scattered documentation files detected!");
    console.blank();
    console.say("The following files should be organized:");
    console.say(&output.stdout);
    console.echo_err(&output.stderr);
    console.blank();
    console.say("To automatically organize these files, run:");
    console.say(format!(
        "  {}",
        organizer.manual_command(&["--auto-move"])
    ));
    console.blank();
    console.say("Or add --auto-fix to this hook to organize automatically on commit.");
    Ok(output.exit_code)
}
