//! line-index: shared line table for the line-oriented rules.
//!
//! Produces no diagnostics. Its [`LineIndex`] output is read by
//! `trailing-whitespace`, `max-line-length` and `no-tabs`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use orclint_rule::{Pass, Rule, RuleError, RuleOutput, SourceFile};
use tracing::debug;

pub const RULE_ID: &str = "line-index";

/// One line of a file, in byte offsets. `end` excludes the line break.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line {
    pub number: u32,
    pub start: u32,
    pub end: u32,
}

impl Line {
    /// Returns the line's text without its terminator.
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        &source[self.start as usize..self.end as usize]
    }
}

/// Lines of every file the index rule saw, keyed by path.
#[derive(Debug, Default)]
pub struct LineIndex {
    files: HashMap<PathBuf, Vec<Line>>,
}

impl LineIndex {
    pub fn lines(&self, path: &Path) -> Option<&[Line]> {
        self.files.get(path).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Splits `text` into lines. `\r\n` terminators are excluded from `end`.
pub fn scan_lines(text: &str) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut start = 0usize;

    for (number, chunk) in text.split_inclusive('\n').enumerate() {
        let content = chunk.strip_suffix('\n').unwrap_or(chunk);
        let content = content.strip_suffix('\r').unwrap_or(content);
        lines.push(Line {
            number: number as u32 + 1,
            start: start as u32,
            end: (start + content.len()) as u32,
        });
        start += chunk.len();
    }

    lines
}

/// Looks up the lines of `file`, failing if the index is missing.
///
/// Files the index rule did not see (for instance because of its own
/// `exclude` option) are skipped with `None`.
pub(crate) fn lines_of<'p>(
    pass: &'p Pass<'_>,
    file: &SourceFile,
) -> Result<Option<&'p [Line]>, RuleError> {
    let index = pass
        .result_of::<LineIndex>(RULE_ID)
        .ok_or_else(|| RuleError::failed("line index is not available"))?;

    let lines = index.lines(file.path());
    if lines.is_none() {
        debug!("{} is not in the line index", file.path().display());
    }
    Ok(lines)
}

fn run(pass: &mut Pass<'_>) -> Result<RuleOutput, RuleError> {
    let files = pass
        .files()
        .iter()
        .map(|file| (file.path().to_path_buf(), scan_lines(file.text())))
        .collect();

    Ok(RuleOutput::new(LineIndex { files }))
}

pub fn rule() -> Rule {
    Rule::new(RULE_ID, run)
        .with_description("Indexes the line boundaries of every file")
        .with_category("analysis")
}
