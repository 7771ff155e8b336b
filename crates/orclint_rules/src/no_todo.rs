//! no-todo rule: Disallow TODO/FIXME markers in source files.
//!
//! # Configuration
//!
//! | Option | Type | Default | Description |
//! |--------|------|---------|-------------|
//! | patterns | string[] | ["TODO:", "TODO ", "FIXME:", "FIXME ", "XXX:", "XXX "] | Patterns to detect |
//! | ignore_patterns | string[] | [] | Matches containing one of these are ignored |
//! | case_sensitive | boolean | false | Case-sensitive matching |
//!
//! # Example
//!
//! ```json
//! {
//!   "options": {
//!     "no-todo": {
//!       "patterns": ["TODO:", "HACK:"],
//!       "case_sensitive": true
//!     }
//!   }
//! }
//! ```

use orclint_rule::{Diagnostic, Pass, Rule, RuleError, RuleOutput, Severity, Span};
use serde::Deserialize;

pub const RULE_ID: &str = "no-todo";

const DEFAULT_PATTERNS: &[&str] = &["TODO:", "TODO ", "FIXME:", "FIXME ", "XXX:", "XXX "];

#[derive(Debug, Deserialize, Default)]
struct Config {
    #[serde(default)]
    patterns: Vec<String>,
    #[serde(default)]
    ignore_patterns: Vec<String>,
    #[serde(default)]
    case_sensitive: bool,
}

impl Config {
    /// Returns the patterns to check, using defaults if none specified.
    fn effective_patterns(&self) -> Vec<String> {
        if self.patterns.is_empty() {
            DEFAULT_PATTERNS.iter().map(|s| (*s).to_string()).collect()
        } else {
            self.patterns.clone()
        }
    }

    fn should_ignore(&self, text: &str) -> bool {
        self.ignore_patterns.iter().any(|p| text.contains(p))
    }
}

/// One pattern occurrence, in byte offsets of the searched text.
#[derive(Debug, PartialEq, Eq)]
struct Match<'t> {
    start: usize,
    end: usize,
    text: &'t str,
}

/// Finds every occurrence of `patterns`, ordered by offset. Overlapping
/// occurrences of different patterns are all reported.
fn find_matches<'t>(text: &'t str, patterns: &[String], case_sensitive: bool) -> Vec<Match<'t>> {
    // ASCII folding keeps byte offsets stable.
    let haystack = if case_sensitive {
        text.to_string()
    } else {
        text.to_ascii_lowercase()
    };

    let mut matches = Vec::new();
    for pattern in patterns.iter().filter(|p| !p.is_empty()) {
        let needle = if case_sensitive {
            pattern.clone()
        } else {
            pattern.to_ascii_lowercase()
        };
        for (start, _) in haystack.match_indices(needle.as_str()) {
            let end = start + needle.len();
            matches.push(Match {
                start,
                end,
                text: &text[start..end],
            });
        }
    }

    matches.sort_by_key(|m| (m.start, m.end));
    matches
}

fn run(pass: &mut Pass<'_>) -> Result<RuleOutput, RuleError> {
    let config: Config = if pass.options().is_object() {
        serde_json::from_value(pass.options().clone())?
    } else {
        Config::default()
    };
    let patterns = config.effective_patterns();

    for file in pass.files().to_vec() {
        for m in find_matches(file.text(), &patterns, config.case_sensitive) {
            if config.should_ignore(m.text) {
                continue;
            }

            let span = Span::new(file.pos_at(m.start as u32), file.pos_at(m.end as u32));
            pass.report(Diagnostic::new(
                format!(
                    "Found '{}' marker. Consider resolving this before committing.",
                    m.text.trim()
                ),
                span,
            ));
        }
    }

    Ok(RuleOutput::none())
}

pub fn rule() -> Rule {
    Rule::new(RULE_ID, run)
        .with_description("Disallow TODO/FIXME markers")
        .with_category("maintenance")
        .with_severity(Severity::Info)
}
