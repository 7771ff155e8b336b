//! Output formatting module

mod json;
mod text;

use miette::Result;
use orclint_core::LintReport;

use crate::cli::OutputFormat;

/// Prints the report and returns whether any diagnostic remains.
pub fn output_results(report: &LintReport, format: OutputFormat) -> Result<bool> {
    match format {
        OutputFormat::Json => json::output_json(report)?,
        OutputFormat::Text => text::output_text(report),
    }

    Ok(report.has_issues())
}
