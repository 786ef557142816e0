use std::collections::HashMap;

use crate::models::Coordinate;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CacheEntry {
    Resolved(Coordinate),
    Unresolvable,
}

impl CacheEntry {
    pub fn coordinate(&self) -> Option<Coordinate> {
        match self {
            CacheEntry::Resolved(c) => Some(*c),
            CacheEntry::Unresolvable => None,
        }
    }
}

/// Place string → lookup result, keyed by the place as the caller supplied
/// it (before any truncation). Entries are written once and never replaced.
#[derive(Debug, Default)]
pub struct GeocodeCache {
    entries: HashMap<String, CacheEntry>,
}

impl GeocodeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, place: &str) -> Option<CacheEntry> {
        self.entries.get(place).copied()
    }

    /// Stores `entry` unless `place` already has one. Returns the entry that
    /// is in the cache afterwards.
    pub fn insert(&mut self, place: &str, entry: CacheEntry) -> CacheEntry {
        *self.entries.entry(place.to_string()).or_insert(entry)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
