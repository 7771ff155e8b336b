//! Fix summary reporting
//!
//! Written to stderr so that `--format json` output stays parseable.

use std::collections::BTreeMap;
use std::path::PathBuf;

use orclint_core::FixSummary;

/// Outputs the fix summary.
pub fn output_fix_summary(summary: &FixSummary, dry_run: bool) {
    if summary.edits_applied == 0 && summary.failures.is_empty() {
        eprintln!("No fixable issues found.");
        if summary.edits_skipped > 0 {
            eprintln!("{} edits skipped.", summary.edits_skipped);
        }
        return;
    }

    if summary.edits_applied > 0 {
        let action = if dry_run { "Would fix" } else { "Fixed" };

        eprintln!(
            "\n{} {} issues in {} files:",
            action, summary.edits_applied, summary.files_modified
        );
        print_fix_list(&summary.fixes_by_file);

        if summary.edits_skipped > 0 {
            eprintln!("{} edits skipped.", summary.edits_skipped);
        }
        if dry_run {
            eprintln!("\nRun without --dry-run to apply fixes.");
        }
    }

    if !summary.failures.is_empty() {
        eprintln!("\nFailed to fix {} file(s):", summary.failures.len());
        for (path, err) in &summary.failures {
            eprintln!("  {}: {}", path.display(), err);
        }
    }
}

fn print_fix_list(fixes_by_file: &BTreeMap<PathBuf, usize>) {
    for (path, count) in fixes_by_file {
        eprintln!("  {}: {} fixes", path.display(), count);
    }
}
