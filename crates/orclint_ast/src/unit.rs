//! Compilation units.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::{SourceFile, SourceMap};

/// Semantic information attached to a unit by whatever loaded it.
///
/// The core never looks inside; rules that understand a particular kind of
/// information fetch it by type.
#[derive(Default)]
pub struct TypeInfo {
    entries: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl TypeInfo {
    /// Creates empty type information.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a value, replacing any previous value of the same type.
    pub fn insert<T: Any + Send + Sync>(&mut self, value: T) {
        self.entries.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Returns the value of type `T`, if present.
    pub fn get<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.entries
            .get(&TypeId::of::<T>())
            .and_then(|v| v.downcast_ref::<T>())
    }

    /// Returns true if nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeInfo")
            .field("entries", &self.entries.len())
            .finish()
    }
}

/// One package worth of source files, their position index and type
/// information.
///
/// Units are immutable once built and cheap to clone.
#[derive(Debug, Clone)]
pub struct CompilationUnit {
    name: String,
    dir: PathBuf,
    sources: Arc<SourceMap>,
    type_info: Arc<TypeInfo>,
}

impl CompilationUnit {
    /// Creates a unit without type information.
    pub fn new(name: impl Into<String>, dir: impl Into<PathBuf>, sources: SourceMap) -> Self {
        Self {
            name: name.into(),
            dir: dir.into(),
            sources: Arc::new(sources),
            type_info: Arc::new(TypeInfo::new()),
        }
    }

    /// Attaches type information.
    pub fn with_type_info(mut self, type_info: TypeInfo) -> Self {
        self.type_info = Arc::new(type_info);
        self
    }

    /// Returns the unit name (usually the package path).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the directory the unit was loaded from.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the files of the unit.
    pub fn files(&self) -> &[SourceFile] {
        self.sources.files()
    }

    /// Returns the unit's position index.
    pub fn sources(&self) -> &Arc<SourceMap> {
        &self.sources
    }

    /// Returns the unit's type information.
    pub fn type_info(&self) -> &TypeInfo {
        &self.type_info
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Symbols(Vec<&'static str>);

    #[test]
    fn type_info_is_keyed_by_type() {
        let mut info = TypeInfo::new();
        assert!(info.is_empty());

        info.insert(Symbols(vec!["main"]));
        info.insert(42_u32);

        assert_eq!(info.get::<Symbols>(), Some(&Symbols(vec!["main"])));
        assert_eq!(info.get::<u32>(), Some(&42));
        assert!(info.get::<String>().is_none());
    }

    #[test]
    fn unit_exposes_files_in_order() {
        let mut sources = SourceMap::new();
        sources.add_file("pkg/a.rs", "a").unwrap();
        sources.add_file("pkg/b.rs", "b").unwrap();

        let unit = CompilationUnit::new("pkg", "pkg", sources);

        assert_eq!(unit.name(), "pkg");
        assert_eq!(unit.files().len(), 2);
        assert_eq!(unit.files()[1].path(), Path::new("pkg/b.rs"));
        assert!(unit.type_info().is_empty());
    }
}
