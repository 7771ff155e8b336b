//! The view a rule gets of the unit it analyzes.

use std::any::Any;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::{
    CompilationUnit, Diagnostic, ResultCache, Rule, RuleError, Severity, SourceFile, SourceMap,
    TypeInfo,
};

static NO_OPTIONS: Value = Value::Null;

/// Receives diagnostics reported during a pass.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Drops every diagnostic. Used when a rule runs only to satisfy a
/// dependency.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardSink;

impl DiagnosticSink for DiscardSink {
    fn report(&mut self, _diagnostic: Diagnostic) {}
}

/// Everything one rule sees while running on one unit.
pub struct Pass<'a> {
    rule: &'a Rule,
    unit: &'a CompilationUnit,
    files: Vec<&'a SourceFile>,
    results: &'a ResultCache,
    sink: &'a mut dyn DiagnosticSink,
    options: &'a Value,
    severity: Severity,
    test_suffixes: &'a [String],
}

impl<'a> Pass<'a> {
    /// Creates a pass over `files`, which must belong to `unit`.
    pub fn new(
        rule: &'a Rule,
        unit: &'a CompilationUnit,
        files: Vec<&'a SourceFile>,
        results: &'a ResultCache,
        sink: &'a mut dyn DiagnosticSink,
    ) -> Self {
        Self {
            rule,
            unit,
            files,
            results,
            sink,
            options: &NO_OPTIONS,
            severity: rule.severity(),
            test_suffixes: &[],
        }
    }

    /// Sets the rule's configured options.
    pub fn with_options(mut self, options: &'a Value) -> Self {
        self.options = options;
        self
    }

    /// Overrides the severity stamped on reported diagnostics.
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Sets the file name suffixes that mark test files.
    pub fn with_test_suffixes(mut self, suffixes: &'a [String]) -> Self {
        self.test_suffixes = suffixes;
        self
    }

    /// Returns the running rule.
    pub fn rule(&self) -> &Rule {
        self.rule
    }

    /// Returns the unit under analysis.
    pub fn unit(&self) -> &CompilationUnit {
        self.unit
    }

    /// Returns the files selected for this rule.
    pub fn files(&self) -> &[&'a SourceFile] {
        &self.files
    }

    pub fn sources(&self) -> &SourceMap {
        self.unit.sources()
    }

    pub fn type_info(&self) -> &TypeInfo {
        self.unit.type_info()
    }

    /// Returns the rule's raw options (`null` when none are configured).
    pub fn options(&self) -> &Value {
        self.options
    }

    /// Reads one option, returning `None` when it is not set.
    pub fn option<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, RuleError> {
        match self.options.get(key) {
            Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
            None => Ok(None),
        }
    }

    /// Returns the result of a declared dependency.
    ///
    /// Undeclared rules are not visible, even if they already ran.
    pub fn result_of<T: Any + Send + Sync>(&self, name: &str) -> Option<&T> {
        if !self.rule.dependencies().iter().any(|d| d == name) {
            debug!(
                "Rule '{}' asked for undeclared dependency '{}'",
                self.rule.name(),
                name
            );
            return None;
        }
        self.results.output::<T>(name)
    }

    /// Reports a diagnostic, stamped with the rule's name and severity.
    pub fn report(&mut self, diagnostic: Diagnostic) {
        let diagnostic = diagnostic
            .with_rule(self.rule.name())
            .with_severity(self.severity);
        self.sink.report(diagnostic);
    }

    /// Returns true if the file name marks a test file.
    pub fn is_test_file(&self, file: &SourceFile) -> bool {
        let name = file.file_name();
        self.test_suffixes.iter().any(|s| name.ends_with(s.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CacheEntry, RuleOutput, Span};
    use serde_json::json;

    fn unit() -> CompilationUnit {
        let mut sources = SourceMap::new();
        sources.add_file("pkg/lib.rs", "fn main() {}\n").unwrap();
        sources.add_file("pkg/lib_test.rs", "#[test]\n").unwrap();
        CompilationUnit::new("pkg", "pkg", sources)
    }

    #[test]
    fn report_stamps_rule_and_severity() {
        let unit = unit();
        let rule = Rule::new("no-main", |_| Ok(RuleOutput::none())).with_severity(Severity::Info);
        let cache = ResultCache::new();
        let mut sink = Vec::new();

        let mut pass = Pass::new(&rule, &unit, unit.files().iter().collect(), &cache, &mut sink);
        pass.report(Diagnostic::new("found main", Span::default()));

        assert_eq!(sink.len(), 1);
        assert_eq!(sink[0].rule_id, "no-main");
        assert_eq!(sink[0].severity, Severity::Info);
    }

    #[test]
    fn discard_sink_drops_reports() {
        let unit = unit();
        let rule = Rule::new("quiet", |_| Ok(RuleOutput::none()));
        let cache = ResultCache::new();
        let mut sink = DiscardSink;

        let mut pass = Pass::new(&rule, &unit, Vec::new(), &cache, &mut sink);
        pass.report(Diagnostic::new("ignored", Span::default()));
        assert!(pass.files().is_empty());
    }

    #[test]
    fn result_of_only_sees_declared_dependencies() {
        let unit = unit();
        let rule = Rule::new("user", |_| Ok(RuleOutput::none())).requires(["counter"]);
        let mut cache = ResultCache::new();
        cache.insert("counter", CacheEntry::Ready(RuleOutput::new(3_usize)));
        cache.insert("other", CacheEntry::Ready(RuleOutput::new(4_usize)));
        let mut sink = Vec::new();

        let pass = Pass::new(&rule, &unit, Vec::new(), &cache, &mut sink);

        assert_eq!(pass.result_of::<usize>("counter"), Some(&3));
        assert_eq!(pass.result_of::<usize>("other"), None);
    }

    #[test]
    fn options_are_typed() {
        let unit = unit();
        let rule = Rule::new("max-line-length", |_| Ok(RuleOutput::none()));
        let cache = ResultCache::new();
        let mut sink = Vec::new();
        let options = json!({ "max": 80, "name": 3 });

        let pass =
            Pass::new(&rule, &unit, Vec::new(), &cache, &mut sink).with_options(&options);

        assert_eq!(pass.option::<usize>("max").unwrap(), Some(80));
        assert_eq!(pass.option::<usize>("missing").unwrap(), None);
        assert!(pass.option::<String>("name").is_err());
    }

    #[test]
    fn test_files_are_recognized_by_suffix() {
        let unit = unit();
        let rule = Rule::new("r", |_| Ok(RuleOutput::none()));
        let cache = ResultCache::new();
        let mut sink = Vec::new();
        let suffixes = vec!["_test.rs".to_string()];

        let pass =
            Pass::new(&rule, &unit, Vec::new(), &cache, &mut sink).with_test_suffixes(&suffixes);

        assert!(!pass.is_test_file(&unit.files()[0]));
        assert!(pass.is_test_file(&unit.files()[1]));
    }
}
