//! orclint CLI
//!
//! Runs the built-in rules over source trees, reports what remains and
//! applies safe fixes.

mod cli;
mod commands;
mod fix;
mod output;

use std::process::ExitCode;

use clap::Parser;
use miette::Result;
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::lint::LintArgs;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(false) => ExitCode::SUCCESS,
        Ok(true) => ExitCode::from(1),
        Err(e) => {
            error!("{:?}", e);
            ExitCode::from(1)
        }
    }
}

/// Runs one command. `Ok(true)` means issues remain.
fn run(cli: &Cli) -> Result<bool> {
    match &cli.command {
        Commands::Lint {
            paths,
            format,
            category,
            only_rule,
            fix,
            dry_run,
            force_tests,
        } => commands::lint::run_lint(
            cli,
            &LintArgs {
                paths,
                format: *format,
                category: category.as_deref(),
                only_rule: only_rule.as_deref(),
                fix: *fix,
                dry_run: *dry_run,
                force_tests: *force_tests,
            },
        ),
        Commands::Rules { format, category } => {
            commands::rules::run_rules(*format, category.as_deref()).map(|_| false)
        }
        Commands::Init { force } => commands::init::run_init(*force).map(|_| false),
    }
}
