//! commit-guard - pre-commit guards for documentation and agent files.

use std::io;

use clap::{CommandFactory, Parser};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commit_guard::cli::{self, Cli};
use commit_guard::guidance::Console;
use commit_guard::runner::SystemRunner;
use commit_guard::Error;

fn main() {
    // Logs go to stderr; stdout is reserved for hook guidance.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("commit_guard=warn")),
        )
        .init();

    let args = Cli::parse();

    let code = match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };
    std::process::exit(code);
}

fn run(args: Cli) -> Result<i32, Error> {
    let Some(command) = args.command else {
        Cli::command().print_help()?;
        println!();
        return Ok(0);
    };

    let mut stdout = io::stdout();
    let mut stderr = io::stderr();
    let mut console = Console::new(&mut stdout, &mut stderr);
    Ok(cli::execute(
        command,
        args.config.as_deref(),
        &SystemRunner,
        &mut console,
    ))
}
