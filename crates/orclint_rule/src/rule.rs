//! Rule descriptors.

use std::any::Any;
use std::fmt;

use crate::{Pass, RuleError, Severity};

/// Rules whose name starts with this prefix analyze test files too.
pub const TEST_RULE_PREFIX: &str = "test-";

type RunFn = dyn Fn(&mut Pass<'_>) -> Result<RuleOutput, RuleError> + Send + Sync;

/// The result value a rule leaves behind for its dependents.
#[derive(Default)]
pub struct RuleOutput(Option<Box<dyn Any + Send + Sync>>);

impl RuleOutput {
    /// A rule that produces nothing but diagnostics.
    pub fn none() -> Self {
        Self(None)
    }

    /// Wraps a result value.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Some(Box::new(value)))
    }

    /// Returns the value if it has type `T`.
    pub fn get<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.0.as_ref().and_then(|v| v.downcast_ref::<T>())
    }

    /// Returns true if no value was produced.
    pub fn is_none(&self) -> bool {
        self.0.is_none()
    }
}

impl fmt::Debug for RuleOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(_) => f.write_str("RuleOutput(..)"),
            None => f.write_str("RuleOutput(none)"),
        }
    }
}

/// A named analysis routine.
///
/// Rules are immutable once built and shared between threads behind an
/// `Arc`. Dependencies are declared by name and resolved through the
/// [`RuleRegistry`](crate::RuleRegistry).
pub struct Rule {
    name: String,
    description: String,
    category: Option<String>,
    severity: Severity,
    requires: Vec<String>,
    safe_fix: bool,
    run: Box<RunFn>,
}

impl Rule {
    /// Creates a rule from its name and analysis function.
    pub fn new<F>(name: impl Into<String>, run: F) -> Self
    where
        F: Fn(&mut Pass<'_>) -> Result<RuleOutput, RuleError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            description: String::new(),
            category: None,
            severity: Severity::Error,
            requires: Vec::new(),
            safe_fix: false,
            run: Box::new(run),
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the category used for rule selection.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Sets the default severity of the rule's diagnostics.
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Declares rules whose results must exist before this rule runs.
    pub fn requires<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.requires.extend(names.into_iter().map(Into::into));
        self
    }

    /// Marks the rule's edits as safe to apply without review.
    pub fn with_safe_fix(mut self, safe: bool) -> Self {
        self.safe_fix = safe;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn dependencies(&self) -> &[String] {
        &self.requires
    }

    pub fn is_safe_fix(&self) -> bool {
        self.safe_fix
    }

    /// Returns true if the rule should see test files.
    pub fn analyzes_test_files(&self) -> bool {
        self.name.starts_with(TEST_RULE_PREFIX)
    }

    /// Runs the analysis function.
    pub fn run(&self, pass: &mut Pass<'_>) -> Result<RuleOutput, RuleError> {
        (self.run)(pass)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("category", &self.category)
            .field("severity", &self.severity)
            .field("requires", &self.requires)
            .field("safe_fix", &self.safe_fix)
            .finish_non_exhaustive()
    }
}
