//! JSON output formatter

use miette::{IntoDiagnostic, Result};
use orclint_core::LintReport;

pub fn output_json(report: &LintReport) -> Result<()> {
    let output = serde_json::json!({
        "units": report.units,
        "diagnostics": report.diagnostics,
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&output).into_diagnostic()?
    );
    Ok(())
}
