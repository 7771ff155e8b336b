//! Position index for the files of one compilation unit.
//!
//! Every file added to a [`SourceMap`] is assigned a contiguous block of
//! positions `[base, base + len]` (the end-of-file position is valid, so an
//! insertion at the very end of a file has an address). Blocks are separated
//! by one unused position, which keeps `Pos::NONE` and the boundaries between
//! files unambiguous.

use std::ops::Range;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::{Pos, ResolvedPosition, Span};

/// Errors raised while building a [`SourceMap`].
#[derive(Debug, Error)]
pub enum SourceMapError {
    /// The file does not fit into the unit's remaining position space.
    #[error("unit exceeds the {} byte position space", u32::MAX)]
    TooLarge { path: PathBuf },
}

/// A source file registered in a [`SourceMap`].
#[derive(Debug, Clone)]
pub struct SourceFile {
    path: PathBuf,
    text: String,
    base: Pos,
    /// Byte offsets of the first byte of every line.
    line_starts: Vec<u32>,
}

impl SourceFile {
    /// `text.len()` must fit in a `u32`; [`SourceMap::add_file`] checks it.
    fn new(path: PathBuf, text: String, base: Pos) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            text.bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i as u32 + 1),
        );

        Self {
            path,
            text,
            base,
            line_starts,
        }
    }

    /// Returns the path of the file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the file name, or an empty string for paths without one.
    pub fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
    }

    /// Returns the full text of the file.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the length of the file in bytes.
    pub fn len(&self) -> u32 {
        self.text.len() as u32
    }

    /// Returns true if the file is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Returns the position of the first byte.
    pub fn base(&self) -> Pos {
        self.base
    }

    /// Returns the end-of-file position.
    pub fn end(&self) -> Pos {
        self.base.offset(self.len())
    }

    /// Returns the position of a byte offset inside this file.
    pub fn pos_at(&self, offset: u32) -> Pos {
        debug_assert!(offset <= self.len(), "offset past end of file");
        self.base.offset(offset)
    }

    /// Returns true if `pos` falls inside this file (end-of-file included).
    pub fn contains(&self, pos: Pos) -> bool {
        self.base <= pos && pos <= self.end()
    }

    /// Returns the number of lines.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Returns the byte offset where a 1-based line begins.
    pub fn line_start(&self, line: usize) -> Option<u32> {
        line.checked_sub(1)
            .and_then(|idx| self.line_starts.get(idx))
            .copied()
    }

    /// Returns the 1-based (line, column) of a byte offset.
    pub fn line_column(&self, offset: u32) -> (u32, u32) {
        let idx = self.line_starts.partition_point(|&start| start <= offset) - 1;
        let column = offset - self.line_starts[idx] + 1;
        (idx as u32 + 1, column)
    }
}

/// The position-resolution index of one compilation unit.
#[derive(Debug, Clone, Default)]
pub struct SourceMap {
    files: Vec<SourceFile>,
    next_base: u32,
}

impl SourceMap {
    /// Creates an empty source map.
    pub fn new() -> Self {
        Self {
            files: Vec::new(),
            next_base: 1,
        }
    }

    /// Adds a file and returns its base position.
    ///
    /// Fails when the file would push the unit past `u32::MAX` positions.
    pub fn add_file(
        &mut self,
        path: impl Into<PathBuf>,
        text: impl Into<String>,
    ) -> Result<Pos, SourceMapError> {
        let path = path.into();
        let text = text.into();
        let base = self.next_base.max(1);

        let next_base = u32::try_from(text.len())
            .ok()
            .and_then(|len| base.checked_add(len))
            .and_then(|end| end.checked_add(2));
        let Some(next_base) = next_base else {
            return Err(SourceMapError::TooLarge { path });
        };

        self.files.push(SourceFile::new(path, text, Pos(base)));
        self.next_base = next_base;
        Ok(Pos(base))
    }

    /// Returns all files in insertion order.
    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    /// Returns the file containing `pos`.
    pub fn file_of(&self, pos: Pos) -> Option<&SourceFile> {
        if !pos.is_valid() {
            return None;
        }

        let idx = self.files.partition_point(|f| f.base <= pos);
        let file = self.files.get(idx.checked_sub(1)?)?;
        file.contains(pos).then_some(file)
    }

    /// Returns the file containing `pos` and the byte offset inside it.
    pub fn offset_in_file(&self, pos: Pos) -> Option<(&SourceFile, u32)> {
        let file = self.file_of(pos)?;
        Some((file, pos.0 - file.base.0))
    }

    /// Resolves `pos` to a path, line and column.
    pub fn position(&self, pos: Pos) -> ResolvedPosition {
        match self.offset_in_file(pos) {
            Some((file, offset)) => {
                let (line, column) = file.line_column(offset);
                ResolvedPosition::new(file.path.clone(), line, column)
            }
            None => ResolvedPosition::unknown(),
        }
    }

    /// Resolves a span to a file and a byte range inside it.
    ///
    /// Returns `None` unless both ends fall inside the same file and
    /// `start <= end`.
    pub fn resolve_span(&self, span: Span) -> Option<(&SourceFile, Range<usize>)> {
        if span.start > span.end {
            return None;
        }

        let (file, start) = self.offset_in_file(span.start)?;
        if !file.contains(span.end) {
            return None;
        }
        let end = span.end.0 - file.base.0;

        Some((file, start as usize..end as usize))
    }
}
