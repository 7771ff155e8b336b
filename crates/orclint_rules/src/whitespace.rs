//! Whitespace rules: trailing-whitespace, no-tabs and final-newline.
//!
//! # Configuration
//!
//! | Rule | Option | Type | Default | Description |
//! |------|--------|------|---------|-------------|
//! | no-tabs | tab_width | integer | 4 | Spaces suggested per indentation tab |

use orclint_rule::{Diagnostic, Edit, Pass, Rule, RuleError, RuleOutput, Severity, Span};

use crate::lines::{self, lines_of};

pub const TRAILING_WHITESPACE: &str = "trailing-whitespace";
pub const NO_TABS: &str = "no-tabs";
pub const FINAL_NEWLINE: &str = "final-newline";

const DEFAULT_TAB_WIDTH: usize = 4;

fn is_blank(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

fn trailing_whitespace(pass: &mut Pass<'_>) -> Result<RuleOutput, RuleError> {
    let mut findings = Vec::new();

    for file in pass.files().to_vec() {
        let Some(lines) = lines_of(pass, file)? else {
            continue;
        };
        let bytes = file.text().as_bytes();

        for line in lines {
            let content = &bytes[line.start as usize..line.end as usize];
            let kept = content.len() - content.iter().rev().take_while(|b| is_blank(**b)).count();
            if kept == content.len() {
                continue;
            }

            let span = Span::new(file.pos_at(line.start + kept as u32), file.pos_at(line.end));
            findings.push(
                Diagnostic::new("Trailing whitespace", span).with_edit(Edit::delete(span)),
            );
        }
    }

    for diagnostic in findings {
        pass.report(diagnostic);
    }
    Ok(RuleOutput::none())
}

fn no_tabs(pass: &mut Pass<'_>) -> Result<RuleOutput, RuleError> {
    let width = pass.option::<usize>("tab_width")?.unwrap_or(DEFAULT_TAB_WIDTH);
    let mut findings = Vec::new();

    for file in pass.files().to_vec() {
        let Some(lines) = lines_of(pass, file)? else {
            continue;
        };
        let bytes = file.text().as_bytes();

        for line in lines {
            let content = &bytes[line.start as usize..line.end as usize];
            let indent = content.iter().take_while(|b| is_blank(**b)).count();
            let tabs = content[..indent].iter().filter(|b| **b == b'\t').count();
            if tabs == 0 {
                continue;
            }

            let spaces = indent - tabs;
            let span = Span::new(file.pos_at(line.start), file.pos_at(line.start + indent as u32));
            findings.push(
                Diagnostic::new("Indentation uses tabs", span)
                    .with_edit(Edit::new(span, " ".repeat(tabs * width + spaces))),
            );
        }
    }

    for diagnostic in findings {
        pass.report(diagnostic);
    }
    Ok(RuleOutput::none())
}

fn final_newline(pass: &mut Pass<'_>) -> Result<RuleOutput, RuleError> {
    for file in pass.files().to_vec() {
        if file.is_empty() || file.text().ends_with('\n') {
            continue;
        }

        let end = file.end();
        pass.report(
            Diagnostic::new("File does not end with a newline", Span::empty(end))
                .with_edit(Edit::insert(end, "\n")),
        );
    }
    Ok(RuleOutput::none())
}

pub fn trailing_whitespace_rule() -> Rule {
    Rule::new(TRAILING_WHITESPACE, trailing_whitespace)
        .with_description("Disallow whitespace at the end of a line")
        .with_category("style")
        .with_severity(Severity::Warning)
        .requires([lines::RULE_ID])
        .with_safe_fix(true)
}

pub fn no_tabs_rule() -> Rule {
    Rule::new(NO_TABS, no_tabs)
        .with_description("Disallow tab characters in indentation")
        .with_category("style")
        .with_severity(Severity::Warning)
        .requires([lines::RULE_ID])
}

pub fn final_newline_rule() -> Rule {
    Rule::new(FINAL_NEWLINE, final_newline)
        .with_description("Require files to end with a newline")
        .with_category("style")
        .with_severity(Severity::Warning)
        .with_safe_fix(true)
}
