//! Linter error types.

use thiserror::Error;

use orclint_rule::RuleError;

/// Errors that can occur during linting.
#[derive(Debug, Error)]
pub enum LinterError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O error.
    #[error("File error: {0}")]
    File(String),

    /// One or more paths could not be loaded.
    #[error("Load error: {0}")]
    Load(String),

    /// A declared dependency cannot be resolved, or the rule set is cyclic.
    #[error("Dependency error: {0}")]
    Dependency(RuleError),

    /// Rule error.
    #[error("Rule error: {0}")]
    Rule(#[from] RuleError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LinterError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a file error.
    pub fn file(message: impl Into<String>) -> Self {
        Self::File(message.into())
    }

    /// Creates a load error.
    pub fn load(message: impl Into<String>) -> Self {
        Self::Load(message.into())
    }
}
