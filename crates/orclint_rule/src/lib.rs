//! # orclint_rule
//!
//! The contract between orclint and the rules it runs.
//!
//! This crate provides:
//! - [`Rule`]: a named analysis routine with declared dependencies
//! - [`Pass`]: what a rule sees while it runs (files, type information,
//!   dependency results, a diagnostic sink, its options)
//! - [`ResultCache`]: per-unit memo of rule results
//! - [`Diagnostic`] and [`Edit`]: what a rule reports
//! - [`RuleRegistry`]: the set of known rules and their dependency graph
//!
//! ## Example
//!
//! ```rust
//! use orclint_rule::{Diagnostic, Rule, RuleOutput, RuleRegistry};
//!
//! let counter = Rule::new("file-count", |pass| {
//!     Ok(RuleOutput::new(pass.files().len()))
//! });
//!
//! let reporter = Rule::new("no-empty-unit", |pass| {
//!     if pass.result_of::<usize>("file-count") == Some(&0) {
//!         pass.report(Diagnostic::new("unit has no files", Default::default()));
//!     }
//!     Ok(RuleOutput::none())
//! })
//! .requires(["file-count"]);
//!
//! let mut registry = RuleRegistry::new();
//! registry.register(counter).unwrap();
//! registry.register(reporter).unwrap();
//! registry.validate().unwrap();
//! ```

mod cache;
mod diagnostic;
mod error;
mod pass;
mod registry;
mod rule;

pub use cache::{CacheEntry, ResultCache};
pub use diagnostic::{Diagnostic, Edit, Severity};
pub use error::RuleError;
pub use pass::{DiagnosticSink, DiscardSink, Pass};
pub use registry::{DependencyGraph, RuleRegistry};
pub use rule::{Rule, RuleOutput, TEST_RULE_PREFIX};

pub use orclint_ast::{CompilationUnit, Pos, SourceFile, SourceMap, Span, TypeInfo};
