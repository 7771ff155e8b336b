//! # orclint_core
//!
//! Core engine for orclint.
//!
//! This crate provides:
//! - The main [`Linter`] orchestrator
//! - Configuration loading
//! - Unit loading from disk
//! - The dependency-resolving [`Executor`]
//! - The [`DiagnosticPipeline`] (noise filter and deduplication)
//! - The [`FixEngine`]
//!
//! ## Example
//!
//! ```rust,ignore
//! use orclint_core::{Linter, LinterConfig, RuleSelection};
//!
//! let config = LinterConfig::from_file(".orclint.jsonc")?;
//! let linter = Linter::new(config, registry)?;
//!
//! let report = linter.lint_paths(&["src".into()], &RuleSelection::default())?;
//! for diagnostic in &report.diagnostics {
//!     println!("{}: {}", diagnostic.position, diagnostic.message());
//! }
//! ```

mod config;
mod error;
mod executor;
mod fixer;
mod linter;
mod loader;
mod pipeline;

pub use config::{
    CONFIG_FILES, DEFAULT_EXTENSIONS, DEFAULT_NOISE_SEGMENTS, DEFAULT_TEST_SUFFIXES, LinterConfig,
    RuleOption,
};
pub use error::LinterError;
pub use executor::{ExecutionPolicy, Executor, RuleFailure, RuleSettings, UnitOutcome};
pub use fixer::{
    FileEdit, FileEditSet, FixEngine, FixSummary, FixerResult, apply_edits_to_content,
    resolve_overlaps,
};
pub use linter::{LintReport, Linter, RuleSelection};
pub use loader::UnitLoader;
pub use pipeline::{DiagnosticPipeline, LintDiagnostic};

pub use orclint_ast::{CompilationUnit, ResolvedPosition, SourceMap};
pub use orclint_rule::{Diagnostic, Edit, Rule, RuleRegistry, Severity};
