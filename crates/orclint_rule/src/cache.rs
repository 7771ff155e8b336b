//! Per-unit memo of rule results.

use std::any::Any;
use std::collections::HashMap;

use tracing::warn;

use crate::RuleOutput;

/// Outcome of one rule on one unit.
#[derive(Debug)]
pub enum CacheEntry {
    /// The rule completed and left this output.
    Ready(RuleOutput),
    /// The rule, or one of its dependencies, failed.
    Failed(String),
}

/// Maps rule names to their outcome for the current unit.
///
/// Entries are write-once. The executor creates a fresh cache for every
/// unit, so results never leak across units.
#[derive(Debug, Default)]
pub struct ResultCache {
    entries: HashMap<String, CacheEntry>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the rule already has an outcome.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Returns true if the rule is recorded as failed.
    pub fn is_failed(&self, name: &str) -> bool {
        matches!(self.entries.get(name), Some(CacheEntry::Failed(_)))
    }

    /// Returns the raw entry for a rule.
    pub fn entry(&self, name: &str) -> Option<&CacheEntry> {
        self.entries.get(name)
    }

    /// Records an outcome. Returns false, keeping the existing entry, if
    /// the rule already has one.
    pub fn insert(&mut self, name: impl Into<String>, entry: CacheEntry) -> bool {
        let name = name.into();
        if self.entries.contains_key(&name) {
            warn!("Ignoring second result for rule '{}'", name);
            return false;
        }
        self.entries.insert(name, entry);
        true
    }

    /// Returns the typed output of a completed rule.
    pub fn output<T: Any + Send + Sync>(&self, name: &str) -> Option<&T> {
        match self.entries.get(name)? {
            CacheEntry::Ready(output) => output.get::<T>(),
            CacheEntry::Failed(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
