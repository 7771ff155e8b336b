//! Dependency-resolving rule executor.
//!
//! For one compilation unit, runs the requested rules together with
//! everything they transitively require, dependencies first, each rule at
//! most once. Results are shared through a [`ResultCache`] that lives only
//! as long as one [`Executor::run`] call.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use globset::GlobSet;
use serde_json::Value;
use tracing::{debug, warn};

use orclint_ast::{CompilationUnit, SourceFile, SourceMap};
use orclint_rule::{
    CacheEntry, DependencyGraph, Diagnostic, DiagnosticSink, DiscardSink, Pass, ResultCache, Rule,
    RuleError, RuleOutput, RuleRegistry, Severity,
};

use crate::loader::build_globset;
use crate::{LinterConfig, LinterError};

/// Per-rule settings compiled from configuration.
#[derive(Debug, Clone, Default)]
pub struct RuleSettings {
    pub severity: Option<Severity>,
    pub options: Value,
    pub exclude: Option<GlobSet>,
}

/// How rules see a unit: test file policy and per-rule settings.
#[derive(Debug, Clone)]
pub struct ExecutionPolicy {
    settings: HashMap<String, RuleSettings>,
    default_settings: RuleSettings,
    test_suffixes: Vec<String>,
    force_all_rules_on_tests: bool,
}

impl Default for ExecutionPolicy {
    fn default() -> Self {
        let config = LinterConfig::new();
        Self {
            settings: HashMap::new(),
            default_settings: RuleSettings::default(),
            test_suffixes: config.test_suffixes,
            force_all_rules_on_tests: config.force_all_rules_on_tests,
        }
    }
}

impl ExecutionPolicy {
    pub fn from_config(config: &LinterConfig) -> Result<Self, LinterError> {
        let mut settings = HashMap::new();
        for (name, option) in &config.options {
            let compiled = RuleSettings {
                severity: option.severity()?,
                options: option.options(),
                exclude: build_globset(&option.exclude())?,
            };
            settings.insert(name.clone(), compiled);
        }

        Ok(Self {
            settings,
            default_settings: RuleSettings::default(),
            test_suffixes: config.test_suffixes.clone(),
            force_all_rules_on_tests: config.force_all_rules_on_tests,
        })
    }

    pub fn with_test_suffixes(mut self, suffixes: Vec<String>) -> Self {
        self.test_suffixes = suffixes;
        self
    }

    pub fn with_force_all_rules_on_tests(mut self, force: bool) -> Self {
        self.force_all_rules_on_tests = force;
        self
    }

    pub fn with_rule_settings(mut self, name: impl Into<String>, settings: RuleSettings) -> Self {
        self.settings.insert(name.into(), settings);
        self
    }

    pub fn settings(&self, rule: &str) -> &RuleSettings {
        self.settings.get(rule).unwrap_or(&self.default_settings)
    }

    pub fn test_suffixes(&self) -> &[String] {
        &self.test_suffixes
    }

    fn is_test_file(&self, file: &SourceFile) -> bool {
        let name = file.file_name();
        self.test_suffixes.iter().any(|s| name.ends_with(s.as_str()))
    }

    /// Returns the files of `unit` that `rule` analyzes.
    pub fn select_files<'u>(&self, rule: &Rule, unit: &'u CompilationUnit) -> Vec<&'u SourceFile> {
        let see_tests = self.force_all_rules_on_tests || rule.analyzes_test_files();
        let exclude = self.settings(rule.name()).exclude.as_ref();

        unit.files()
            .iter()
            .filter(|f| see_tests || !self.is_test_file(f))
            .filter(|f| exclude.is_none_or(|globs| !globs.is_match(f.path())))
            .collect()
    }
}

/// A rule that failed on one unit.
#[derive(Debug)]
pub struct RuleFailure {
    pub unit: String,
    pub rule: String,
    pub error: RuleError,
}

/// What one executor run produced for one unit.
#[derive(Debug)]
pub struct UnitOutcome {
    pub unit: String,
    pub sources: Arc<SourceMap>,
    pub diagnostics: Vec<Diagnostic>,
    pub failures: Vec<RuleFailure>,
    /// Rules invoked, in invocation order.
    pub invoked: Vec<String>,
}

/// Runs rules against units.
///
/// The executor holds no per-unit state, so one instance can serve many
/// units concurrently.
#[derive(Debug)]
pub struct Executor<'a> {
    registry: &'a RuleRegistry,
    graph: DependencyGraph,
    policy: &'a ExecutionPolicy,
}

impl<'a> Executor<'a> {
    pub fn new(registry: &'a RuleRegistry, policy: &'a ExecutionPolicy) -> Self {
        Self {
            registry,
            graph: registry.dependency_graph(),
            policy,
        }
    }

    /// Runs `requested` (and their dependencies) on `unit`.
    ///
    /// Rule failures are recorded in the outcome. An unknown rule or a
    /// dependency cycle is an error.
    pub fn run(
        &self,
        unit: &CompilationUnit,
        requested: &[Arc<Rule>],
    ) -> Result<UnitOutcome, LinterError> {
        let names: Vec<&str> = requested.iter().map(|r| r.name()).collect();
        let plan = self
            .graph
            .topological_order(&names)
            .map_err(LinterError::Dependency)?;
        let reporting: HashSet<&str> = names.iter().copied().collect();

        let mut cache = ResultCache::new();
        let mut outcome = UnitOutcome {
            unit: unit.name().to_string(),
            sources: Arc::clone(unit.sources()),
            diagnostics: Vec::new(),
            failures: Vec::new(),
            invoked: Vec::new(),
        };

        for name in &plan {
            let rule = self
                .registry
                .get(name)
                .ok_or_else(|| LinterError::Dependency(RuleError::not_found(name.as_str())))?;

            if let Some(dep) = rule.dependencies().iter().find(|d| !cache.contains(d)) {
                return Err(LinterError::Internal(format!(
                    "rule '{}' scheduled before its dependency '{}'",
                    name, dep
                )));
            }

            if let Some(dep) = rule.dependencies().iter().find(|d| cache.is_failed(d)) {
                let error = RuleError::DependencyFailed {
                    rule: name.clone(),
                    dependency: dep.clone(),
                };
                warn!("{} (unit {})", error, outcome.unit);
                cache.insert(name.as_str(), CacheEntry::Failed(error.to_string()));
                outcome.failures.push(RuleFailure {
                    unit: outcome.unit.clone(),
                    rule: name.clone(),
                    error,
                });
                continue;
            }

            let report = reporting.contains(name.as_str());
            let mut diagnostics = Vec::new();
            let result = {
                let mut discard = DiscardSink;
                let sink: &mut dyn DiagnosticSink = if report {
                    &mut diagnostics
                } else {
                    &mut discard
                };
                self.invoke(rule, unit, &cache, sink)
            };
            outcome.invoked.push(name.clone());

            match result {
                Ok(output) => {
                    debug!(
                        "Rule '{}' on {}: {} diagnostics",
                        name,
                        outcome.unit,
                        diagnostics.len()
                    );
                    cache.insert(name.as_str(), CacheEntry::Ready(output));
                    outcome.diagnostics.append(&mut diagnostics);
                }
                Err(error) => {
                    warn!("Rule '{}' failed on {}: {}", name, outcome.unit, error);
                    cache.insert(name.as_str(), CacheEntry::Failed(error.to_string()));
                    outcome.failures.push(RuleFailure {
                        unit: outcome.unit.clone(),
                        rule: name.clone(),
                        error,
                    });
                }
            }
        }

        Ok(outcome)
    }

    fn invoke(
        &self,
        rule: &Rule,
        unit: &CompilationUnit,
        cache: &ResultCache,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<RuleOutput, RuleError> {
        let settings = self.policy.settings(rule.name());
        let files = self.policy.select_files(rule, unit);

        let mut pass = Pass::new(rule, unit, files, cache, sink)
            .with_options(&settings.options)
            .with_severity(settings.severity.unwrap_or(rule.severity()))
            .with_test_suffixes(self.policy.test_suffixes());
        rule.run(&mut pass)
    }
}
