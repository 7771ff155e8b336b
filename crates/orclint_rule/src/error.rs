//! Rule error types.

use thiserror::Error;

/// Errors raised by rules and by the rule registry.
#[derive(Debug, Error)]
pub enum RuleError {
    /// The rule's analysis function failed.
    #[error("Rule failed: {0}")]
    Failed(String),

    /// Two rules were registered under the same name.
    #[error("Duplicate rule: {0}")]
    DuplicateRule(String),

    /// A rule was requested by a name nobody registered.
    #[error("Rule not found: {0}")]
    NotFound(String),

    /// A rule declares a dependency that is not registered.
    #[error("Rule '{rule}' requires unknown rule '{dependency}'")]
    MissingDependency { rule: String, dependency: String },

    /// The dependency graph contains a cycle.
    #[error("Dependency cycle: {}", .0.join(" -> "))]
    DependencyCycle(Vec<String>),

    /// A dependency failed, so the dependent rule could not run.
    #[error("Rule '{rule}' skipped: dependency '{dependency}' failed")]
    DependencyFailed { rule: String, dependency: String },

    /// Serialization error while reading rule options.
    #[error("Invalid rule options: {0}")]
    Options(#[from] serde_json::Error),
}

impl RuleError {
    /// Creates an execution failure.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }

    /// Creates a not found error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    /// Creates a missing dependency error.
    pub fn missing_dependency(rule: impl Into<String>, dependency: impl Into<String>) -> Self {
        Self::MissingDependency {
            rule: rule.into(),
            dependency: dependency.into(),
        }
    }

    /// Returns true for errors that point at a broken rule set rather than
    /// a rule that failed on particular input.
    pub fn is_configuration_defect(&self) -> bool {
        matches!(
            self,
            Self::DuplicateRule(_)
                | Self::NotFound(_)
                | Self::MissingDependency { .. }
                | Self::DependencyCycle(_)
        )
    }
}
