//! max-line-length rule: Limit the number of characters per line.
//!
//! # Configuration
//!
//! | Option | Type | Default | Description |
//! |--------|------|---------|-------------|
//! | max | integer | 120 | Maximum characters per line |

use orclint_rule::{Diagnostic, Pass, Rule, RuleError, RuleOutput, Severity, Span};

use crate::lines::{self, lines_of};

pub const RULE_ID: &str = "max-line-length";

const DEFAULT_MAX: usize = 120;

fn run(pass: &mut Pass<'_>) -> Result<RuleOutput, RuleError> {
    let max = pass.option::<usize>("max")?.unwrap_or(DEFAULT_MAX);
    if max == 0 {
        return Err(RuleError::failed("option 'max' must be at least 1"));
    }

    let mut findings = Vec::new();
    for file in pass.files().to_vec() {
        let Some(lines) = lines_of(pass, file)? else {
            continue;
        };

        for line in lines {
            let text = line.text(file.text());
            let Some((overflow, _)) = text.char_indices().nth(max) else {
                continue;
            };

            let width = text.chars().count();
            let span = Span::new(
                file.pos_at(line.start + overflow as u32),
                file.pos_at(line.end),
            );
            findings.push(Diagnostic::new(
                format!("Line is {width} characters long (max {max})"),
                span,
            ));
        }
    }

    for diagnostic in findings {
        pass.report(diagnostic);
    }
    Ok(RuleOutput::none())
}

pub fn rule() -> Rule {
    Rule::new(RULE_ID, run)
        .with_description("Limit the number of characters per line")
        .with_category("style")
        .with_severity(Severity::Warning)
        .requires([lines::RULE_ID])
}
