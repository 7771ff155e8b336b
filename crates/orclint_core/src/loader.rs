//! Loads compilation units from paths on disk.
//!
//! Directories are walked with `ignore::WalkBuilder`, so hidden entries and
//! `.gitignore`d files are skipped. Every directory that contains at least
//! one source file becomes one unit.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use orclint_ast::{CompilationUnit, SourceMap};

use crate::{LinterConfig, LinterError};

/// Directory names never descended into.
const SKIPPED_DIRS: &[&str] = &["vendor", "testdata", "target", "node_modules"];

/// A path that could not be turned into (part of) a unit.
#[derive(Debug, Error)]
#[error("{}: {message}", path.display())]
struct LoadError {
    path: PathBuf,
    message: String,
}

impl LoadError {
    fn new(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Source files grouped by the directory they live in on disk.
#[derive(Debug, Default)]
struct Discovered {
    /// Canonical directory -> (directory as first spelled, files).
    groups: BTreeMap<PathBuf, (PathBuf, BTreeSet<PathBuf>)>,
    /// Canonical paths of every file added so far.
    seen: HashSet<PathBuf>,
}

impl Discovered {
    /// Adds `file` unless the same file was already reached through
    /// another spelling of its path.
    fn add(&mut self, file: &Path, canonical: PathBuf) {
        let dir = file.parent().map(Path::to_path_buf).unwrap_or_default();
        let key = canonical.parent().map(Path::to_path_buf).unwrap_or_default();
        if !self.seen.insert(canonical) {
            debug!("Skipping {}: already discovered", file.display());
            return;
        }

        self.groups
            .entry(key)
            .or_insert_with(|| (dir, BTreeSet::new()))
            .1
            .insert(file.to_path_buf());
    }
}

/// Builds compilation units from files and directories.
#[derive(Debug)]
pub struct UnitLoader {
    extensions: Vec<String>,
    exclude: Option<GlobSet>,
    /// Directory exclude globs are also matched relative to.
    base_dir: Option<PathBuf>,
}

impl UnitLoader {
    pub fn new(extensions: &[String], exclude: &[String]) -> Result<Self, LinterError> {
        Ok(Self {
            extensions: extensions.to_vec(),
            exclude: build_globset(exclude)?,
            base_dir: None,
        })
    }

    /// Creates a loader whose exclude globs also apply relative to the
    /// directory of the configuration file.
    pub fn from_config(config: &LinterConfig) -> Result<Self, LinterError> {
        let loader = Self::new(&config.extensions, &config.exclude)?;
        Ok(match &config.base_dir {
            Some(dir) => loader.with_base_dir(dir),
            None => loader,
        })
    }

    /// Matches exclude globs relative to `dir` as well.
    pub fn with_base_dir(mut self, dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        self.base_dir = Some(fs::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf()));
        self
    }

    /// Loads every unit reachable from `paths`.
    ///
    /// A file reached through several roots is loaded once. Every path
    /// that cannot be read is logged, and then the whole load fails, so no
    /// rule ever runs on a partial tree.
    pub fn load(&self, paths: &[PathBuf]) -> Result<Vec<CompilationUnit>, LinterError> {
        let mut errors = Vec::new();
        let discovered = self.discover(paths, &mut errors);

        let results: Vec<Result<CompilationUnit, LoadError>> = discovered
            .groups
            .into_values()
            .collect::<Vec<_>>()
            .into_par_iter()
            .map(|(dir, files)| load_unit(dir, files))
            .collect();

        let mut units = Vec::new();
        for result in results {
            match result {
                Ok(unit) => units.push(unit),
                Err(error) => errors.push(error),
            }
        }

        if !errors.is_empty() {
            for error in &errors {
                error!("Failed to load {}", error);
            }
            let details: Vec<String> = errors.iter().map(ToString::to_string).collect();
            return Err(LinterError::load(format!(
                "{} path(s) could not be loaded: {}",
                errors.len(),
                details.join("; ")
            )));
        }

        info!("Loaded {} units", units.len());
        Ok(units)
    }

    /// Groups source files by parent directory.
    fn discover(&self, paths: &[PathBuf], errors: &mut Vec<LoadError>) -> Discovered {
        let mut discovered = Discovered::default();

        for root in paths {
            if root.is_file() {
                match fs::canonicalize(root) {
                    Ok(canonical) => {
                        if !self.is_excluded(root, root, &canonical) {
                            discovered.add(root, canonical);
                        }
                    }
                    Err(e) => errors.push(LoadError::new(root, e.to_string())),
                }
                continue;
            }
            if !root.is_dir() {
                errors.push(LoadError::new(root, "no such file or directory"));
                continue;
            }

            let walker = WalkBuilder::new(root)
                .hidden(true)
                .git_ignore(true)
                .filter_entry(|entry| {
                    let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
                    !(is_dir
                        && entry.depth() > 0
                        && SKIPPED_DIRS.contains(&entry.file_name().to_string_lossy().as_ref()))
                })
                .build();

            for entry in walker {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        warn!("Skipping entry under {}: {}", root.display(), e);
                        continue;
                    }
                };

                let path = entry.path();
                if !entry.file_type().is_some_and(|ft| ft.is_file()) || !self.has_extension(path) {
                    continue;
                }
                match fs::canonicalize(path) {
                    Ok(canonical) => {
                        if !self.is_excluded(root, path, &canonical) {
                            discovered.add(path, canonical);
                        }
                    }
                    Err(e) => errors.push(LoadError::new(path, e.to_string())),
                }
            }
        }

        debug!("Discovered {} candidate units", discovered.groups.len());
        discovered
    }

    fn has_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e == ext))
    }

    /// Matches `path` as given, relative to its walk root, and relative to
    /// the configuration directory.
    fn is_excluded(&self, root: &Path, path: &Path, canonical: &Path) -> bool {
        self.exclude.as_ref().is_some_and(|excludes| {
            excludes.is_match(path)
                || path
                    .strip_prefix(root)
                    .is_ok_and(|relative| excludes.is_match(relative))
                || self.base_dir.as_ref().is_some_and(|base| {
                    canonical
                        .strip_prefix(base)
                        .is_ok_and(|relative| excludes.is_match(relative))
                })
        })
    }
}

fn load_unit(dir: PathBuf, files: BTreeSet<PathBuf>) -> Result<CompilationUnit, LoadError> {
    let mut sources = SourceMap::new();
    for file in files {
        let text = fs::read_to_string(&file).map_err(|e| LoadError::new(&file, e.to_string()))?;
        sources
            .add_file(&file, text)
            .map_err(|e| LoadError::new(&file, e.to_string()))?;
    }

    let name = if dir.as_os_str().is_empty() {
        ".".to_string()
    } else {
        dir.display().to_string()
    };
    debug!("Loaded unit {} ({} files)", name, sources.files().len());
    Ok(CompilationUnit::new(name, dir, sources))
}

/// Builds a GlobSet from patterns.
pub(crate) fn build_globset(patterns: &[String]) -> Result<Option<GlobSet>, LinterError> {
    if patterns.is_empty() {
        return Ok(None);
    }

    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern)
            .map_err(|e| LinterError::config(format!("Invalid glob pattern: {}", e)))?;
        builder.add(glob);
    }

    let globset = builder
        .build()
        .map_err(|e| LinterError::config(format!("Failed to build globset: {}", e)))?;

    Ok(Some(globset))
}
