//! Position and span types for source locations.
//!
//! A [`Pos`] is only meaningful together with the [`SourceMap`](crate::SourceMap)
//! that produced it. Turning it into something a human can read goes through
//! [`SourceMap::position`](crate::SourceMap::position), which yields a
//! [`ResolvedPosition`].

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// An opaque position inside a source map.
///
/// `Pos::NONE` (zero) means "no position". Valid positions start at 1.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Pos(pub u32);

impl Pos {
    /// The invalid position.
    pub const NONE: Pos = Pos(0);

    /// Returns true if this is a real position.
    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }

    /// Returns the position `delta` bytes after this one.
    #[inline]
    pub const fn offset(self, delta: u32) -> Pos {
        Pos(self.0 + delta)
    }
}

/// A half-open range `[start, end)` of positions.
///
/// The default span covers no position at all.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Span {
    /// Start position (inclusive).
    pub start: Pos,
    /// End position (exclusive).
    pub end: Pos,
}

impl Span {
    /// Creates a new span.
    #[inline]
    pub const fn new(start: Pos, end: Pos) -> Self {
        Self { start, end }
    }

    /// Creates an empty span at `pos`, used for pure insertions.
    #[inline]
    pub const fn empty(pos: Pos) -> Self {
        Self { start: pos, end: pos }
    }

    /// Returns the length of the span in bytes.
    #[inline]
    pub const fn len(&self) -> u32 {
        self.end.0 - self.start.0
    }

    /// Returns true if the span is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start.0 == self.end.0
    }

    /// Returns true if this span contains the given position.
    #[inline]
    pub const fn contains(&self, pos: Pos) -> bool {
        self.start.0 <= pos.0 && pos.0 < self.end.0
    }
}

/// A human-visible location: file path plus 1-based line and column.
///
/// Columns count bytes, not characters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResolvedPosition {
    /// Path of the file.
    pub path: PathBuf,
    /// Line number (1-indexed, 0 when unknown).
    pub line: u32,
    /// Column number (1-indexed, 0 when unknown).
    pub column: u32,
}

impl ResolvedPosition {
    /// Creates a new resolved position.
    pub fn new(path: impl Into<PathBuf>, line: u32, column: u32) -> Self {
        Self {
            path: path.into(),
            line,
            column,
        }
    }

    /// The position reported for `Pos::NONE` or positions outside every file.
    pub fn unknown() -> Self {
        Self::default()
    }

    /// Returns true if the position points into a file.
    pub fn is_known(&self) -> bool {
        self.line > 0
    }
}

impl fmt::Display for ResolvedPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_known() {
            write!(f, "{}:{}:{}", self.path.display(), self.line, self.column)
        } else {
            write!(f, "-")
        }
    }
}
