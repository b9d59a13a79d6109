//! In-memory cache of parsed fetch results.
//!
//! The key is the full argument triple of a fetch (parameter list, start,
//! end). A lookup only ever returns the table stored under exactly that key.
//! Failed fetches are never stored.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::data::parse::ClimateTable;
use crate::domain::DateRange;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub parameters: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl CacheKey {
    pub fn new(parameters: impl Into<String>, range: DateRange) -> Self {
        Self {
            parameters: parameters.into(),
            start: range.start(),
            end: range.end(),
        }
    }
}

#[derive(Debug, Default)]
pub struct FetchCache {
    entries: HashMap<CacheKey, ClimateTable>,
    hits: usize,
    misses: usize,
}

impl FetchCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a key, counting the hit or miss.
    pub fn get(&mut self, key: &CacheKey) -> Option<&ClimateTable> {
        match self.entries.get(key) {
            Some(table) => {
                self.hits += 1;
                Some(table)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    pub fn insert(&mut self, key: CacheKey, table: ClimateTable) {
        self.entries.insert(key, table);
    }

    /// Drop one entry; returns whether it was present.
    pub fn invalidate(&mut self, key: &CacheKey) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
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
}
