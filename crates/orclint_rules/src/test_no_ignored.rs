//! test-no-ignored rule: Flag `#[ignore]`d tests in test files.
//!
//! The `test-` prefix makes this rule see test files, which every other
//! rule skips by default. Non-test files are left alone.

use orclint_rule::{Diagnostic, Pass, Rule, RuleError, RuleOutput, Severity, Span};

pub const RULE_ID: &str = "test-no-ignored";

const MARKER: &str = "#[ignore";

fn run(pass: &mut Pass<'_>) -> Result<RuleOutput, RuleError> {
    for file in pass.files().to_vec() {
        if !pass.is_test_file(file) {
            continue;
        }

        let offsets: Vec<usize> = file.text().match_indices(MARKER).map(|(i, _)| i).collect();
        for start in offsets {
            let span = Span::new(
                file.pos_at(start as u32),
                file.pos_at((start + MARKER.len()) as u32),
            );
            pass.report(Diagnostic::new("Ignored test", span));
        }
    }
    Ok(RuleOutput::none())
}

pub fn rule() -> Rule {
    Rule::new(RULE_ID, run)
        .with_description("Disallow ignored tests")
        .with_category("testing")
        .with_severity(Severity::Warning)
}
