//! Core linter engine.

use std::path::PathBuf;
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use orclint_ast::CompilationUnit;
use orclint_rule::{Rule, RuleRegistry};

use crate::executor::{ExecutionPolicy, Executor, RuleFailure, UnitOutcome};
use crate::fixer::{FixEngine, FixSummary};
use crate::loader::UnitLoader;
use crate::pipeline::{DiagnosticPipeline, LintDiagnostic};
use crate::{LinterConfig, LinterError};

/// Which rules a run should request.
///
/// `only_rule` wins over `category`; with neither, every enabled rule runs.
#[derive(Debug, Clone, Default)]
pub struct RuleSelection {
    pub only_rule: Option<String>,
    pub category: Option<String>,
}

/// Everything one lint run produced.
#[derive(Debug, Default)]
pub struct LintReport {
    /// Filtered, deduplicated diagnostics in unit order.
    pub diagnostics: Vec<LintDiagnostic>,
    /// Rules that failed, per unit.
    pub failures: Vec<RuleFailure>,
    /// Number of units analyzed.
    pub units: usize,
}

impl LintReport {
    /// Returns true if any diagnostic remains.
    pub fn has_issues(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// The core linter engine.
///
/// Orchestrates unit loading, rule execution, diagnostic filtering and
/// fixing.
#[derive(Debug)]
pub struct Linter {
    config: LinterConfig,
    registry: RuleRegistry,
    policy: ExecutionPolicy,
    pipeline: DiagnosticPipeline,
    loader: UnitLoader,
}

impl Linter {
    /// Creates a linter. Fails if the rule set is inconsistent or the
    /// configuration does not compile.
    pub fn new(config: LinterConfig, registry: RuleRegistry) -> Result<Self, LinterError> {
        registry.validate().map_err(LinterError::Dependency)?;

        for name in config.options.keys() {
            if !registry.contains(name) {
                warn!("Configuration mentions unknown rule '{}'", name);
            }
        }

        let policy = ExecutionPolicy::from_config(&config)?;
        let pipeline = DiagnosticPipeline::new(config.noise_segments.clone());
        let loader = UnitLoader::from_config(&config)?;

        debug!("Linter ready with {} rules", registry.len());
        Ok(Self {
            config,
            registry,
            policy,
            pipeline,
            loader,
        })
    }

    pub fn config(&self) -> &LinterConfig {
        &self.config
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Resolves a selection to the rules to request.
    ///
    /// Rules turned off in configuration are dropped, except when named
    /// explicitly through `only_rule`.
    pub fn select_rules(&self, selection: &RuleSelection) -> Result<Vec<Arc<Rule>>, LinterError> {
        if let Some(name) = &selection.only_rule {
            let rule = self
                .registry
                .get(name)
                .ok_or_else(|| LinterError::config(format!("Unknown rule '{}'", name)))?;
            return Ok(vec![Arc::clone(rule)]);
        }

        let candidates: Vec<&Arc<Rule>> = match &selection.category {
            Some(category) => {
                let rules = self.registry.by_category(category);
                if rules.is_empty() {
                    return Err(LinterError::config(format!(
                        "Unknown category '{}' (available: {})",
                        category,
                        self.registry.categories().join(", ")
                    )));
                }
                rules
            }
            None => self.registry.rules().iter().collect(),
        };

        Ok(candidates
            .into_iter()
            .filter(|rule| self.config.is_rule_enabled(rule.name()))
            .cloned()
            .collect())
    }

    /// Runs `rules` on every unit and filters the combined diagnostics.
    ///
    /// Units are processed in parallel, each with its own executor state.
    /// Results keep unit order.
    pub fn run_units(
        &self,
        units: &[CompilationUnit],
        rules: &[Arc<Rule>],
    ) -> Result<LintReport, LinterError> {
        let executor = Executor::new(&self.registry, &self.policy);

        let outcomes: Vec<UnitOutcome> = units
            .par_iter()
            .map(|unit| executor.run(unit, rules))
            .collect::<Result<_, _>>()?;

        let mut failures = Vec::new();
        let batches: Vec<_> = outcomes
            .into_iter()
            .map(|outcome| {
                failures.extend(outcome.failures);
                (outcome.sources, outcome.diagnostics)
            })
            .collect();

        let diagnostics = self.pipeline.process(batches);
        info!(
            "Linted {} units: {} diagnostics, {} rule failures",
            units.len(),
            diagnostics.len(),
            failures.len()
        );

        Ok(LintReport {
            diagnostics,
            failures,
            units: units.len(),
        })
    }

    /// Loads `paths` and lints them with the selected rules.
    ///
    /// Nothing runs unless every path loads.
    pub fn lint_paths(
        &self,
        paths: &[PathBuf],
        selection: &RuleSelection,
    ) -> Result<LintReport, LinterError> {
        let rules = self.select_rules(selection)?;
        let units = self.loader.load(paths)?;
        self.run_units(&units, &rules)
    }

    /// Rules whose edits `fix` applies.
    pub fn safe_rules(&self) -> Vec<String> {
        match &self.config.safe_rules {
            Some(rules) => rules.clone(),
            None => self
                .registry
                .safe_fix_rules()
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }

    /// Applies the safe edits carried by `diagnostics`.
    pub fn fix(&self, diagnostics: &[LintDiagnostic], dry_run: bool) -> FixSummary {
        FixEngine::new(self.safe_rules())
            .dry_run(dry_run)
            .apply(diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orclint_rule::{Diagnostic, RuleOutput};
    use pretty_assertions::assert_eq;

    fn registry() -> RuleRegistry {
        let mut registry = RuleRegistry::new();
        for (name, category) in [("a", "style"), ("b", "style"), ("c", "correctness")] {
            registry
                .register(Rule::new(name, |_| Ok(RuleOutput::none())).with_category(category))
                .unwrap();
        }
        registry
    }

    fn names(rules: &[Arc<Rule>]) -> Vec<&str> {
        rules.iter().map(|r| r.name()).collect()
    }

    #[test]
    fn new_rejects_broken_registry() {
        let mut registry = RuleRegistry::new();
        registry
            .register(Rule::new("a", |_| Ok(RuleOutput::none())).requires(["missing"]))
            .unwrap();

        let err = Linter::new(LinterConfig::new(), registry).unwrap_err();
        assert!(matches!(err, LinterError::Dependency(_)));
    }

    #[test]
    fn select_all_skips_disabled_rules() {
        let config = LinterConfig::from_json(r#"{ "options": { "b": "off" } }"#).unwrap();
        let linter = Linter::new(config, registry()).unwrap();

        let rules = linter.select_rules(&RuleSelection::default()).unwrap();
        assert_eq!(names(&rules), vec!["a", "c"]);
    }

    #[test]
    fn select_by_category_and_only_rule() {
        let config = LinterConfig::from_json(r#"{ "options": { "b": false } }"#).unwrap();
        let linter = Linter::new(config, registry()).unwrap();

        let style = RuleSelection {
            category: Some("style".into()),
            ..Default::default()
        };
        assert_eq!(names(&linter.select_rules(&style).unwrap()), vec!["a"]);

        let only = RuleSelection {
            only_rule: Some("b".into()),
            category: Some("correctness".into()),
        };
        assert_eq!(names(&linter.select_rules(&only).unwrap()), vec!["b"]);
    }

    #[test]
    fn unknown_selection_is_config_error() {
        let linter = Linter::new(LinterConfig::new(), registry()).unwrap();

        let unknown_rule = RuleSelection {
            only_rule: Some("nope".into()),
            ..Default::default()
        };
        let unknown_category = RuleSelection {
            category: Some("nope".into()),
            ..Default::default()
        };

        assert!(matches!(
            linter.select_rules(&unknown_rule),
            Err(LinterError::Config(_))
        ));
        let err = linter.select_rules(&unknown_category).unwrap_err();
        assert!(err.to_string().contains("correctness, style"));
    }

    #[test]
    fn safe_rules_default_to_registry_flags() {
        let mut with_fixer = registry();
        with_fixer
            .register(Rule::new("fixer", |_| Ok(RuleOutput::none())).with_safe_fix(true))
            .unwrap();

        let linter = Linter::new(LinterConfig::new(), with_fixer).unwrap();
        assert_eq!(linter.safe_rules(), vec!["fixer".to_string()]);

        let config = LinterConfig::from_json(r#"{ "safe_rules": ["a"] }"#).unwrap();
        let linter = Linter::new(config, registry()).unwrap();
        assert_eq!(linter.safe_rules(), vec!["a".to_string()]);
    }

    #[test]
    fn run_units_keeps_unit_order() {
        let mut registry = RuleRegistry::new();
        registry
            .register(Rule::new("first-file", |pass| {
                let file = pass.files()[0];
                let span = orclint_ast::Span::empty(file.base());
                pass.report(Diagnostic::new(file.file_name().to_string(), span));
                Ok(RuleOutput::none())
            }))
            .unwrap();
        let linter = Linter::new(LinterConfig::new(), registry).unwrap();

        let units: Vec<CompilationUnit> = (0..8)
            .map(|i| {
                let mut sources = orclint_ast::SourceMap::new();
                sources.add_file(format!("u{i}/f{i}.rs"), "x\n").unwrap();
                CompilationUnit::new(format!("u{i}"), format!("u{i}"), sources)
            })
            .collect();
        let rules = linter.select_rules(&RuleSelection::default()).unwrap();

        let report = linter.run_units(&units, &rules).unwrap();

        let messages: Vec<&str> = report.diagnostics.iter().map(|d| d.message()).collect();
        assert_eq!(
            messages,
            vec!["f0.rs", "f1.rs", "f2.rs", "f3.rs", "f4.rs", "f5.rs", "f6.rs", "f7.rs"]
        );
        assert_eq!(report.units, 8);
        assert!(report.has_issues());
    }
}
