//! CLI commands for commit-guard.

pub mod agent_pointers;
pub mod hooks;
pub mod nul_file;
pub mod scattered_docs;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::error::Error;
use crate::git;
use crate::guidance::Console;
use crate::runner::CommandRunner;

/// commit-guard - pre-commit guards for documentation and agent files
#[derive(Parser)]
#[command(name = "commit-guard")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Config file (default: .commit-guard.toml at the repository root)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Detect scattered documentation files
    ScatteredDocs {
        /// Organize scattered files instead of warning
        #[arg(long)]
        auto_fix: bool,
    },

    /// Remove a stray Windows 'nul' file from the index and working tree
    NulGuard,

    /// Check that agent pointer files match their generator
    AgentPointers,

    /// Install the pre-commit hook into .git/hooks
    Install {
        /// Run the documentation hook with --auto-fix
        #[arg(long)]
        auto_fix: bool,
    },

    /// Remove the pre-commit hook from .git/hooks
    Uninstall,
}

/// Where a hook runs and how it is configured.
#[derive(Debug, Clone)]
pub struct HookContext {
    pub repo_root: PathBuf,
    pub config: Config,
}

impl HookContext {
    /// Resolve the repository root and load its config.
    pub fn resolve(runner: &dyn CommandRunner, config_path: Option<&Path>) -> Result<Self, Error> {
        let repo_root = resolve_repo_root(runner)?;
        let config = match config_path {
            Some(path) => Config::load_from(path)?,
            None => Config::load(&repo_root)?,
        };
        Ok(Self { repo_root, config })
    }
}

/// Repository root, or the current directory outside a work tree.
pub fn resolve_repo_root(runner: &dyn CommandRunner) -> Result<PathBuf, Error> {
    match git::repo_root(runner) {
        Some(root) => Ok(root),
        None => Ok(std::env::current_dir()?),
    }
}

/// Run a command and turn every outcome into an exit code.
///
/// Errors are reported as `Error: <message>` on stderr and exit 1.
pub fn execute(
    command: Commands,
    config_path: Option<&Path>,
    runner: &dyn CommandRunner,
    console: &mut Console<'_>,
) -> i32 {
    let code = match dispatch(command, config_path, runner, console) {
        Ok(code) => code,
        Err(e) => {
            console.error(format!("Error: {}", e));
            1
        }
    };
    console.flush();
    code
}

fn dispatch(
    command: Commands,
    config_path: Option<&Path>,
    runner: &dyn CommandRunner,
    console: &mut Console<'_>,
) -> Result<i32, Error> {
    match command {
        Commands::ScatteredDocs { auto_fix } => {
            let ctx = HookContext::resolve(runner, config_path)?;
            scattered_docs::run(&ctx, runner, console, auto_fix)
        }
        Commands::AgentPointers => {
            let ctx = HookContext::resolve(runner, config_path)?;
            agent_pointers::run(&ctx, runner, console)
        }
        // The guard and the installer read no config.
        Commands::NulGuard => {
            let repo_root = resolve_repo_root(runner)?;
            Ok(nul_file::NulGuard::new(&repo_root, runner)
                .run(console)
                .exit_code)
        }
        Commands::Install { auto_fix } => {
            let repo_root = resolve_repo_root(runner)?;
            if hooks::install(&repo_root, auto_fix)? {
                console.say("Pre-commit hook installed.");
            } else {
                console.say("No .git directory found; nothing installed.");
            }
            Ok(0)
        }
        Commands::Uninstall => {
            let repo_root = resolve_repo_root(runner)?;
            if hooks::uninstall(&repo_root)? {
                console.say("Pre-commit hook removed.");
            } else {
                console.say("No commit-guard pre-commit hook found.");
            }
            Ok(0)
        }
    }
}
