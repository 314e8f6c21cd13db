//! Optional memoization of prepared engines.
//!
//! Keyed on a fingerprint of the raw table content and the initial capital.
//! Nothing expires; callers drop the cache or call [`EngineCache::clear`].

use crate::domain::engine::DecisionEngine;
use crate::domain::error::SnaptraderError;
use crate::domain::prepare::prepare;
use crate::domain::stock::RawTable;
use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    pub content: u64,
    pub capital_bits: u64,
}

impl Fingerprint {
    pub fn of(table: &RawTable, initial_capital: f64) -> Self {
        let mut hasher = DefaultHasher::new();
        table.hash(&mut hasher);
        Self {
            content: hasher.finish(),
            capital_bits: initial_capital.to_bits(),
        }
    }
}

#[derive(Debug, Default)]
pub struct EngineCache {
    entries: HashMap<Fingerprint, DecisionEngine>,
    hits: usize,
    misses: usize,
}

impl EngineCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the engine for `(table, initial_capital)`, preparing it on a miss.
    /// Failed preparations are not cached.
    pub fn get_or_prepare(
        &mut self,
        table: &RawTable,
        initial_capital: f64,
    ) -> Result<DecisionEngine, SnaptraderError> {
        let key = Fingerprint::of(table, initial_capital);
        if let Some(engine) = self.entries.get(&key) {
            self.hits += 1;
            debug!(content = key.content, "engine cache hit");
            return Ok(engine.clone());
        }

        self.misses += 1;
        let dataset = prepare(table)?;
        let engine = DecisionEngine::new(Arc::new(dataset), initial_capital)?;
        self.entries.insert(key, engine.clone());
        debug!(content = key.content, entries = self.entries.len(), "engine cache miss");
        Ok(engine)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
