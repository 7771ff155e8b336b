//! Rule registry and dependency graph.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use tracing::debug;

use crate::{Rule, RuleError};

/// The set of rules known to a linter, in registration order.
#[derive(Debug, Default)]
pub struct RuleRegistry {
    rules: Vec<Arc<Rule>>,
    index: HashMap<String, usize>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a rule. Names must be unique.
    pub fn register(&mut self, rule: impl Into<Arc<Rule>>) -> Result<(), RuleError> {
        let rule = rule.into();
        if self.index.contains_key(rule.name()) {
            return Err(RuleError::DuplicateRule(rule.name().to_string()));
        }

        debug!("Registered rule '{}'", rule.name());
        self.index.insert(rule.name().to_string(), self.rules.len());
        self.rules.push(rule);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Arc<Rule>> {
        self.index.get(name).map(|&idx| &self.rules[idx])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Returns all rules in registration order.
    pub fn rules(&self) -> &[Arc<Rule>] {
        &self.rules
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|r| r.name())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Returns the rules of one category, in registration order.
    pub fn by_category(&self, category: &str) -> Vec<&Arc<Rule>> {
        self.rules
            .iter()
            .filter(|r| r.category() == Some(category))
            .collect()
    }

    /// Returns every category, sorted.
    pub fn categories(&self) -> Vec<&str> {
        self.rules
            .iter()
            .filter_map(|r| r.category())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Returns the rules whose edits are safe to apply unattended.
    pub fn safe_fix_rules(&self) -> Vec<&str> {
        self.rules
            .iter()
            .filter(|r| r.is_safe_fix())
            .map(|r| r.name())
            .collect()
    }

    pub fn dependency_graph(&self) -> DependencyGraph {
        DependencyGraph::from_rules(self.rules.iter().map(|r| r.as_ref()))
    }

    /// Checks that every declared dependency exists and that the
    /// dependency graph is acyclic.
    pub fn validate(&self) -> Result<(), RuleError> {
        for rule in &self.rules {
            if let Some(dep) = rule.dependencies().iter().find(|d| !self.contains(d)) {
                return Err(RuleError::missing_dependency(rule.name(), dep.as_str()));
            }
        }

        let names: Vec<&str> = self.names().collect();
        self.dependency_graph().topological_order(&names)?;
        Ok(())
    }
}

/// Rule name to declared dependencies.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    dependencies: HashMap<String, Vec<String>>,
}

impl DependencyGraph {
    pub fn from_rules<'a>(rules: impl IntoIterator<Item = &'a Rule>) -> Self {
        let dependencies = rules
            .into_iter()
            .map(|r| (r.name().to_string(), r.dependencies().to_vec()))
            .collect();
        Self { dependencies }
    }

    /// Returns the requested rules plus everything they transitively
    /// require, each exactly once, dependencies before dependents.
    ///
    /// Requested rules keep their relative order where dependencies allow.
    pub fn topological_order(&self, requested: &[&str]) -> Result<Vec<String>, RuleError> {
        let mut order = Vec::new();
        let mut done = HashSet::new();
        let mut visiting = Vec::new();

        for name in requested {
            self.visit(name, &mut visiting, &mut done, &mut order)?;
        }
        Ok(order)
    }

    fn visit(
        &self,
        name: &str,
        visiting: &mut Vec<String>,
        done: &mut HashSet<String>,
        order: &mut Vec<String>,
    ) -> Result<(), RuleError> {
        if done.contains(name) {
            return Ok(());
        }
        if let Some(idx) = visiting.iter().position(|n| n == name) {
            let mut cycle = visiting[idx..].to_vec();
            cycle.push(name.to_string());
            return Err(RuleError::DependencyCycle(cycle));
        }
        let Some(deps) = self.dependencies.get(name) else {
            return Err(RuleError::not_found(name));
        };

        visiting.push(name.to_string());
        for dep in deps {
            if !self.dependencies.contains_key(dep) {
                return Err(RuleError::missing_dependency(name, dep.as_str()));
            }
            self.visit(dep, visiting, done, order)?;
        }
        visiting.pop();

        done.insert(name.to_string());
        order.push(name.to_string());
        Ok(())
    }
}
