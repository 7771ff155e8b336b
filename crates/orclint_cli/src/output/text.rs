//! Text output formatter

use orclint_core::LintReport;

pub fn output_text(report: &LintReport) {
    for lint in &report.diagnostics {
        println!(
            "{}: {} [{}]: {}",
            lint.position,
            lint.diagnostic.severity,
            lint.rule_id(),
            lint.message()
        );
    }

    println!();
    println!(
        "Checked {} units, found {} issues",
        report.units,
        report.diagnostics.len()
    );
}
