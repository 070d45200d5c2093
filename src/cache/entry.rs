//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with cost and recency metadata.

use std::sync::atomic::{AtomicU64, Ordering};

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
#[derive(Debug)]
pub struct CacheEntry {
    /// The stored value
    pub value: Vec<u8>,
    /// Cost counted toward the total cost limit
    pub cost: u64,
    /// Access clock tick of the most recent get or set
    last_access: AtomicU64,
    /// Tick under which the recency index currently files this entry
    indexed_at: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry stamped and indexed at `tick`.
    pub fn new(value: Vec<u8>, cost: u64, tick: u64) -> Self {
        Self {
            value,
            cost,
            last_access: AtomicU64::new(tick),
            indexed_at: tick,
        }
    }

    // == Touch ==
    /// Records an access at `tick`. Safe to call under a shared lock.
    pub fn touch(&self, tick: u64) {
        self.last_access.fetch_max(tick, Ordering::Relaxed);
    }

    /// Tick of the most recent access.
    pub fn last_access(&self) -> u64 {
        self.last_access.load(Ordering::Relaxed)
    }

    /// Tick the recency index files this entry under.
    pub fn indexed_at(&self) -> u64 {
        self.indexed_at
    }

    /// Whether the entry was accessed after it was last filed.
    pub fn is_stale(&self) -> bool {
        self.last_access() != self.indexed_at
    }

    /// Re-files the entry at its latest access tick and returns that tick.
    pub fn refile(&mut self) -> u64 {
        self.indexed_at = self.last_access();
        self.indexed_at
    }
}
