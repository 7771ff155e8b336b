//! # orclint_rules
//!
//! The rules that ship with orclint.
//!
//! | Rule | Category | Fix |
//! |------|----------|-----|
//! | `line-index` | analysis | (shared result, no diagnostics) |
//! | `trailing-whitespace` | style | safe |
//! | `final-newline` | style | safe |
//! | `no-tabs` | style | suggested |
//! | `max-line-length` | style | |
//! | `no-todo` | maintenance | |
//! | `test-no-ignored` | testing | |

pub mod lines;
pub mod max_line_length;
pub mod no_todo;
pub mod test_no_ignored;
pub mod whitespace;

use orclint_rule::{Rule, RuleError, RuleRegistry};

pub use lines::{Line, LineIndex, scan_lines};

/// Returns every built-in rule, dependencies before dependents.
pub fn builtin_rules() -> Vec<Rule> {
    vec![
        lines::rule(),
        whitespace::trailing_whitespace_rule(),
        whitespace::final_newline_rule(),
        whitespace::no_tabs_rule(),
        max_line_length::rule(),
        no_todo::rule(),
        test_no_ignored::rule(),
    ]
}

/// Builds a validated registry of the built-in rules.
pub fn builtin_registry() -> Result<RuleRegistry, RuleError> {
    let mut registry = RuleRegistry::new();
    for rule in builtin_rules() {
        registry.register(rule)?;
    }
    registry.validate()?;
    Ok(registry)
}
