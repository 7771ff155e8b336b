//! Auto-fix functionality for applying proposed edits.
//!
//! Only edits from trusted rules are applied. Per file, edits are sorted by
//! start offset and swept once: an edit is kept only if it begins at or
//! after the end of the last kept edit. Kept edits are then spliced in from
//! the end of the file backwards so earlier offsets stay valid.

use std::collections::{BTreeMap, HashSet};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::ops::Range;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::{LintDiagnostic, LinterError};

/// One edit in absolute byte offsets of a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEdit {
    pub range: Range<usize>,
    pub text: String,
    pub rule_id: String,
}

impl FileEdit {
    pub fn new(range: Range<usize>, text: impl Into<String>, rule_id: impl Into<String>) -> Self {
        Self {
            range,
            text: text.into(),
            rule_id: rule_id.into(),
        }
    }
}

/// Edits grouped by file, in the order they were extracted.
pub type FileEditSet = BTreeMap<PathBuf, Vec<FileEdit>>;

/// Result of one fix run.
#[derive(Debug, Default)]
pub struct FixSummary {
    /// Files whose content changed (or would change, in dry-run mode).
    pub files_modified: usize,
    /// Edits written (or that would be written).
    pub edits_applied: usize,
    /// Edits dropped by the safety filter, overlap resolution, because
    /// they no longer fit the file, or because they leave it unchanged.
    pub edits_skipped: usize,
    /// Applied edits per file.
    pub fixes_by_file: BTreeMap<PathBuf, usize>,
    /// Files that could not be read or written.
    pub failures: Vec<(PathBuf, LinterError)>,
}

/// Result of applying edits to in-memory content.
#[derive(Debug)]
pub struct FixerResult {
    /// Number of edits applied.
    pub fixes_applied: usize,
    /// The fixed content.
    pub fixed_content: Vec<u8>,
    /// Whether the content was modified.
    pub modified: bool,
}

/// Applies the edits of trusted rules to files on disk.
#[derive(Debug, Clone)]
pub struct FixEngine {
    safe_rules: HashSet<String>,
    dry_run: bool,
}

impl FixEngine {
    /// Creates an engine that trusts exactly `safe_rules`.
    pub fn new<I, S>(safe_rules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            safe_rules: safe_rules.into_iter().map(Into::into).collect(),
            dry_run: false,
        }
    }

    /// Computes the summary without touching any file.
    pub fn dry_run(mut self, yes: bool) -> Self {
        self.dry_run = yes;
        self
    }

    pub fn is_safe(&self, rule_id: &str) -> bool {
        self.safe_rules.contains(rule_id)
    }

    /// Applies the safe edits carried by `diagnostics`.
    pub fn apply(&self, diagnostics: &[LintDiagnostic]) -> FixSummary {
        let mut summary = FixSummary::default();
        let edit_set = self.collect_edits(diagnostics, &mut summary);

        for (path, edits) in edit_set {
            let (accepted, overlapping) = resolve_overlaps(edits);
            summary.edits_skipped += overlapping;
            if accepted.is_empty() {
                continue;
            }

            match self.apply_to_file(&path, &accepted) {
                Ok(result) => {
                    summary.edits_skipped += accepted.len() - result.fixes_applied;
                    if result.modified {
                        summary.files_modified += 1;
                        summary.edits_applied += result.fixes_applied;
                        summary.fixes_by_file.insert(path, result.fixes_applied);
                    } else {
                        // Edits that reproduce the current content.
                        summary.edits_skipped += result.fixes_applied;
                    }
                }
                Err(e) => {
                    warn!("Failed to fix {}: {}", path.display(), e);
                    summary.failures.push((path, e));
                }
            }
        }

        info!(
            "Applied {} edits to {} files ({} skipped)",
            summary.edits_applied, summary.files_modified, summary.edits_skipped
        );
        summary
    }

    /// Runs the safety filter and resolves every kept edit to a file and a
    /// byte range.
    pub fn collect_edits(
        &self,
        diagnostics: &[LintDiagnostic],
        summary: &mut FixSummary,
    ) -> FileEditSet {
        let mut edit_set = FileEditSet::new();

        for lint in diagnostics {
            let diagnostic = &lint.diagnostic;
            if diagnostic.edits.is_empty() {
                continue;
            }
            if !self.is_safe(&diagnostic.rule_id) {
                debug!(
                    "Skipping {} edits from untrusted rule '{}'",
                    diagnostic.edits.len(),
                    diagnostic.rule_id
                );
                summary.edits_skipped += diagnostic.edits.len();
                continue;
            }

            for edit in &diagnostic.edits {
                match lint.sources.resolve_span(edit.span) {
                    Some((file, range)) => {
                        edit_set
                            .entry(file.path().to_path_buf())
                            .or_default()
                            .push(FileEdit::new(range, edit.text.clone(), &diagnostic.rule_id));
                    }
                    None => {
                        warn!(
                            "Skipping edit from '{}': span does not resolve to one file",
                            diagnostic.rule_id
                        );
                        summary.edits_skipped += 1;
                    }
                }
            }
        }

        edit_set
    }

    fn apply_to_file(&self, path: &Path, edits: &[FileEdit]) -> Result<FixerResult, LinterError> {
        let content = fs::read(path)
            .map_err(|e| LinterError::file(format!("Failed to read {}: {}", path.display(), e)))?;

        let result = apply_edits_to_content(&content, edits);

        if result.modified && !self.dry_run {
            write_preserving_permissions(path, &result.fixed_content)?;
        }

        Ok(result)
    }
}

/// Keeps a maximal non-overlapping subset of `edits`, greedily in order of
/// start offset. Returns the kept edits (ascending) and the number dropped.
///
/// The sort is stable, so among edits with the same start the first one
/// extracted wins. That also decides between two insertions at one point.
pub fn resolve_overlaps(mut edits: Vec<FileEdit>) -> (Vec<FileEdit>, usize) {
    edits.sort_by_key(|e| e.range.start);

    let mut accepted: Vec<FileEdit> = Vec::with_capacity(edits.len());
    let mut dropped = 0;

    for edit in edits {
        let overlaps = accepted.last().is_some_and(|last| {
            edit.range.start < last.range.end || edit.range.start == last.range.start
        });

        if overlaps {
            warn!(
                "Skipping overlapping edit from '{}' at [{}, {}]",
                edit.rule_id, edit.range.start, edit.range.end
            );
            dropped += 1;
        } else {
            accepted.push(edit);
        }
    }

    (accepted, dropped)
}

/// Applies non-overlapping edits sorted by start ascending.
///
/// Edits are applied from the end of the content to the beginning. Edits
/// that no longer fit the content are skipped.
pub fn apply_edits_to_content(content: &[u8], edits: &[FileEdit]) -> FixerResult {
    let mut result = content.to_vec();
    let mut applied = 0;

    for edit in edits.iter().rev() {
        let Range { start, end } = edit.range;

        if start > end || end > result.len() {
            warn!(
                "Invalid edit span: start={}, end={}, content_len={}",
                start,
                end,
                result.len()
            );
            continue;
        }

        debug!(
            "Applying edit: replace [{}..{}] with '{}'",
            start, end, edit.text
        );
        result.splice(start..end, edit.text.bytes());
        applied += 1;
    }

    let modified = result != content;
    FixerResult {
        fixes_applied: applied,
        fixed_content: result,
        modified,
    }
}

/// Overwrites an existing file, keeping its permission bits. The file is
/// never created.
fn write_preserving_permissions(path: &Path, content: &[u8]) -> Result<(), LinterError> {
    let write_error =
        |e: std::io::Error| LinterError::file(format!("Failed to write {}: {}", path.display(), e));

    let permissions = fs::metadata(path).map_err(write_error)?.permissions();

    let mut file = OpenOptions::new()
        .write(true)
        .truncate(true)
        .open(path)
        .map_err(write_error)?;
    file.write_all(content).map_err(write_error)?;
    drop(file);

    fs::set_permissions(path, permissions).map_err(write_error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn edit(start: usize, end: usize, text: &str) -> FileEdit {
        FileEdit::new(start..end, text, "test-rule")
    }

    #[test]
    fn overlap_resolution_keeps_first_of_conflicting_pair() {
        let (accepted, dropped) =
            resolve_overlaps(vec![edit(10, 20, "a"), edit(15, 25, "b"), edit(30, 40, "c")]);

        assert_eq!(accepted, vec![edit(10, 20, "a"), edit(30, 40, "c")]);
        assert_eq!(dropped, 1);
    }

    #[test]
    fn overlap_resolution_sorts_by_start() {
        let (accepted, dropped) = resolve_overlaps(vec![edit(30, 40, "c"), edit(10, 20, "a")]);

        assert_eq!(accepted, vec![edit(10, 20, "a"), edit(30, 40, "c")]);
        assert_eq!(dropped, 0);
    }

    #[test]
    fn adjacent_edits_both_survive() {
        let (accepted, _) = resolve_overlaps(vec![edit(0, 5, "x"), edit(5, 8, "y")]);
        assert_eq!(accepted.len(), 2);
    }

    #[test]
    fn same_start_keeps_first_encountered() {
        let first = FileEdit::new(4..4, "first", "rule-a");
        let second = FileEdit::new(4..4, "second", "rule-b");
        let replacement = FileEdit::new(4..6, "third", "rule-c");

        let (accepted, dropped) = resolve_overlaps(vec![first.clone(), second, replacement]);

        assert_eq!(accepted, vec![first]);
        assert_eq!(dropped, 2);
    }

    #[test]
    fn insertion_after_replacement_end_is_kept() {
        let (accepted, _) = resolve_overlaps(vec![edit(0, 4, "abcd"), edit(4, 4, "!")]);
        assert_eq!(accepted.len(), 2);
    }

    #[test]
    fn replacement_shortens_by_one_byte() {
        let content = b"0123456789abcdefghij";
        assert_eq!(content.len(), 20);

        let result = apply_edits_to_content(content, &[edit(5, 8, "XY")]);

        assert_eq!(result.fixed_content.len(), 19);
        assert_eq!(&result.fixed_content[..5], &content[..5]);
        assert_eq!(&result.fixed_content[5..7], b"XY");
        assert_eq!(&result.fixed_content[7..], &content[8..]);
        assert!(result.modified);
    }

    #[test]
    fn multiple_edits_apply_right_to_left() {
        let result = apply_edits_to_content(
            b"Hello World",
            &[edit(0, 5, "Hi"), edit(5, 5, ","), edit(6, 11, "Earth")],
        );

        assert_eq!(result.fixed_content, b"Hi, Earth");
        assert_eq!(result.fixes_applied, 3);
    }

    #[test]
    fn out_of_bounds_edit_is_skipped() {
        let result = apply_edits_to_content(b"short", &[edit(1, 2, "H"), edit(3, 50, "")]);

        assert_eq!(result.fixed_content, b"sHort");
        assert_eq!(result.fixes_applied, 1);
    }

    #[test]
    fn identical_replacement_is_not_a_modification() {
        let result = apply_edits_to_content(b"same", &[edit(0, 4, "same")]);

        assert_eq!(result.fixes_applied, 1);
        assert!(!result.modified);
    }
}
