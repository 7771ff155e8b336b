//! Rules command implementation

use miette::{IntoDiagnostic, Result};
use orclint_core::{Rule, RuleRegistry};
use orclint_rules::builtin_registry;
use serde::Serialize;

use crate::cli::OutputFormat;

/// What the `rules` command shows for one rule.
#[derive(Debug, Serialize)]
struct RuleInfo<'a> {
    name: &'a str,
    description: &'a str,
    category: Option<&'a str>,
    severity: &'static str,
    requires: &'a [String],
    safe_fix: bool,
}

impl<'a> From<&'a Rule> for RuleInfo<'a> {
    fn from(rule: &'a Rule) -> Self {
        Self {
            name: rule.name(),
            description: rule.description(),
            category: rule.category(),
            severity: rule.severity().as_str(),
            requires: rule.dependencies(),
            safe_fix: rule.is_safe_fix(),
        }
    }
}

pub fn run_rules(format: OutputFormat, category: Option<&str>) -> Result<()> {
    let registry = builtin_registry().into_diagnostic()?;
    let infos = collect_infos(&registry, category)?;

    let output = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&infos).into_diagnostic()?,
        OutputFormat::Text => format_text(&infos),
    };
    println!("{}", output);
    Ok(())
}

fn collect_infos<'a>(
    registry: &'a RuleRegistry,
    category: Option<&str>,
) -> Result<Vec<RuleInfo<'a>>> {
    let rules: Vec<&Rule> = match category {
        Some(category) => registry.by_category(category).into_iter().map(|r| &**r).collect(),
        None => registry.rules().iter().map(|r| &**r).collect(),
    };

    if rules.is_empty()
        && let Some(category) = category
    {
        return Err(miette::miette!(
            "Unknown category '{}' (available: {})",
            category,
            registry.categories().join(", ")
        ));
    }

    Ok(rules.into_iter().map(RuleInfo::from).collect())
}

fn format_text(infos: &[RuleInfo<'_>]) -> String {
    let mut out = String::new();
    for info in infos {
        out.push_str(&format!(
            "{} [{}] ({}){}\n    {}\n",
            info.name,
            info.category.unwrap_or("-"),
            info.severity,
            if info.safe_fix { " fixable" } else { "" },
            info.description
        ));
        if !info.requires.is_empty() {
            out.push_str(&format!("    requires: {}\n", info.requires.join(", ")));
        }
    }
    out.push_str(&format!("\n{} rules", infos.len()));
    out
}
