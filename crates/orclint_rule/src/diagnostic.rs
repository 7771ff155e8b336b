//! Diagnostic types for lint results.

use std::fmt;
use std::str::FromStr;

use orclint_ast::{Pos, Span};
use serde::{Deserialize, Serialize};

/// Severity level for diagnostics.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Error - must be fixed.
    #[default]
    Error,
    /// Warning - should be reviewed.
    Warning,
    /// Info - informational message.
    Info,
}

impl Severity {
    /// Returns the lowercase name used in configuration and output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "error" => Ok(Severity::Error),
            "warning" => Ok(Severity::Warning),
            "info" => Ok(Severity::Info),
            other => Err(format!("unknown severity '{}'", other)),
        }
    }
}

/// A diagnostic message from a lint rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The rule that generated this diagnostic. Filled in by the executor.
    #[serde(default)]
    pub rule_id: String,

    /// The diagnostic message.
    pub message: String,

    /// Position span in the unit's source map.
    pub span: Span,

    /// Severity level.
    #[serde(default)]
    pub severity: Severity,

    /// Proposed edits that would resolve this diagnostic.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub edits: Vec<Edit>,
}

impl Diagnostic {
    /// Creates a new diagnostic.
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            rule_id: String::new(),
            message: message.into(),
            span,
            severity: Severity::Error,
            edits: Vec::new(),
        }
    }

    /// Sets the originating rule.
    pub fn with_rule(mut self, rule_id: impl Into<String>) -> Self {
        self.rule_id = rule_id.into();
        self
    }

    /// Sets the severity level.
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Adds a proposed edit.
    pub fn with_edit(mut self, edit: Edit) -> Self {
        self.edits.push(edit);
        self
    }

    /// Returns true if the diagnostic carries at least one edit.
    pub fn is_fixable(&self) -> bool {
        !self.edits.is_empty()
    }
}

/// A proposed replacement of a span with new text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Edit {
    /// The span to replace.
    pub span: Span,

    /// The replacement text.
    pub text: String,
}

impl Edit {
    /// Creates a new edit.
    pub fn new(span: Span, text: impl Into<String>) -> Self {
        Self {
            span,
            text: text.into(),
        }
    }

    /// Creates an edit that inserts text at a position.
    pub fn insert(pos: Pos, text: impl Into<String>) -> Self {
        Self {
            span: Span::empty(pos),
            text: text.into(),
        }
    }

    /// Creates an edit that deletes a span.
    pub fn delete(span: Span) -> Self {
        Self {
            span,
            text: String::new(),
        }
    }
}
