//! Lint command implementation

use std::path::PathBuf;

use miette::{IntoDiagnostic, Result};
use orclint_core::{LintReport, Linter, LinterConfig, RuleSelection};
use orclint_rules::builtin_registry;
use tracing::info;

use crate::cli::{Cli, OutputFormat};
use crate::fix::output_fix_summary;
use crate::output::output_results;

/// Flags of one `lint` invocation.
pub struct LintArgs<'a> {
    pub paths: &'a [PathBuf],
    pub format: OutputFormat,
    pub category: Option<&'a str>,
    pub only_rule: Option<&'a str>,
    pub fix: bool,
    pub dry_run: bool,
    pub force_tests: bool,
}

pub fn run_lint(cli: &Cli, args: &LintArgs<'_>) -> Result<bool> {
    let mut config = if let Some(ref path) = cli.config {
        LinterConfig::from_file(path).into_diagnostic()?
    } else {
        find_config()?
    };

    if args.force_tests {
        config.force_all_rules_on_tests = true;
    }

    let registry = builtin_registry().into_diagnostic()?;
    let linter = Linter::new(config, registry).into_diagnostic()?;
    let selection = RuleSelection {
        only_rule: args.only_rule.map(str::to_string),
        category: args.category.map(str::to_string),
    };

    let report = linter.lint_paths(args.paths, &selection).into_diagnostic()?;
    report_failures(&report);

    if args.fix {
        let summary = linter.fix(&report.diagnostics, args.dry_run);
        output_fix_summary(&summary, args.dry_run);

        if !args.dry_run && summary.files_modified > 0 {
            // Report what the fixes left behind.
            let remaining = linter.lint_paths(args.paths, &selection).into_diagnostic()?;
            return output_results(&remaining, args.format);
        }
    }

    output_results(&report, args.format)
}

/// Rule failures are warnings; they never decide the exit status on their
/// own.
fn report_failures(report: &LintReport) {
    if !report.failures.is_empty() {
        eprintln!("\n{} rule run(s) failed:", report.failures.len());
        for failure in &report.failures {
            eprintln!("  {} [{}]: {}", failure.unit, failure.rule, failure.error);
        }
    }
}

pub fn find_config() -> Result<LinterConfig> {
    let cwd = std::env::current_dir().into_diagnostic()?;
    if let Some(path) = LinterConfig::discover(&cwd) {
        info!("Using config: {}", path.display());
        return LinterConfig::from_file(&path).into_diagnostic();
    }

    info!("No config file found, using defaults");
    Ok(LinterConfig::new())
}
