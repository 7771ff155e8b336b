//! Diagnostic filtering and deduplication.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use orclint_ast::{ResolvedPosition, SourceMap};
use orclint_rule::Diagnostic;

use crate::config::DEFAULT_NOISE_SEGMENTS;

/// A diagnostic together with where it points.
#[derive(Debug, Clone, Serialize)]
pub struct LintDiagnostic {
    pub position: ResolvedPosition,
    #[serde(flatten)]
    pub diagnostic: Diagnostic,
    /// The position index of the unit that produced the diagnostic.
    #[serde(skip)]
    pub sources: Arc<SourceMap>,
}

impl LintDiagnostic {
    pub fn rule_id(&self) -> &str {
        &self.diagnostic.rule_id
    }

    pub fn message(&self) -> &str {
        &self.diagnostic.message
    }
}

/// Turns raw executor output into the list users see.
///
/// Diagnostics pointing into build caches are dropped, then exact
/// duplicates (same resolved file, line, column and message) are removed,
/// keeping the first one seen.
#[derive(Debug, Clone)]
pub struct DiagnosticPipeline {
    noise_segments: Vec<String>,
}

impl Default for DiagnosticPipeline {
    fn default() -> Self {
        Self::new(DEFAULT_NOISE_SEGMENTS.iter().map(|s| s.to_string()).collect())
    }
}

impl DiagnosticPipeline {
    pub fn new(noise_segments: Vec<String>) -> Self {
        Self { noise_segments }
    }

    /// Returns true if diagnostics in `path` are never reported.
    pub fn is_noise(&self, path: &Path) -> bool {
        let normalized = path.to_string_lossy().replace('\\', "/");
        self.noise_segments
            .iter()
            .any(|segment| normalized.contains(segment.as_str()))
    }

    /// Filters and deduplicates batches of diagnostics.
    ///
    /// Each batch carries the source map its positions belong to.
    pub fn process<I>(&self, batches: I) -> Vec<LintDiagnostic>
    where
        I: IntoIterator<Item = (Arc<SourceMap>, Vec<Diagnostic>)>,
    {
        let mut seen: HashSet<(PathBuf, u32, u32, String)> = HashSet::new();
        let mut output = Vec::new();
        let mut noise = 0;
        let mut duplicates = 0;

        for (sources, diagnostics) in batches {
            for diagnostic in diagnostics {
                let position = sources.position(diagnostic.span.start);

                if self.is_noise(&position.path) {
                    noise += 1;
                    continue;
                }

                let key = (
                    position.path.clone(),
                    position.line,
                    position.column,
                    diagnostic.message.clone(),
                );
                if !seen.insert(key) {
                    duplicates += 1;
                    continue;
                }

                output.push(LintDiagnostic {
                    position,
                    diagnostic,
                    sources: Arc::clone(&sources),
                });
            }
        }

        debug!(
            "Pipeline kept {} diagnostics ({} noise, {} duplicates)",
            output.len(),
            noise,
            duplicates
        );
        output
    }
}
