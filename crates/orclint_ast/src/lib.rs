//! # orclint_ast
//!
//! Source model for orclint.
//!
//! This crate provides the types every other orclint crate speaks in:
//!
//! - [`Pos`] / [`Span`]: opaque positions inside one [`SourceMap`]
//! - [`SourceMap`]: the position index of a compilation unit, resolving a
//!   `Pos` to a file, a byte offset and a 1-based line/column
//! - [`CompilationUnit`]: one package worth of files plus its [`TypeInfo`]
//!
//! ## Example
//!
//! ```rust
//! use orclint_ast::{SourceMap, Span};
//!
//! let mut sources = SourceMap::new();
//! let base = sources.add_file("src/lib.rs", "fn main() {}\n")?;
//!
//! let span = Span::new(base.offset(3), base.offset(7));
//! let resolved = sources.position(span.start);
//! assert_eq!(resolved.line, 1);
//! assert_eq!(resolved.column, 4);
//! # Ok::<(), orclint_ast::SourceMapError>(())
//! ```

mod source_map;
mod span;
mod unit;

pub use source_map::{SourceFile, SourceMap, SourceMapError};
pub use span::{Pos, ResolvedPosition, Span};
pub use unit::{CompilationUnit, TypeInfo};
