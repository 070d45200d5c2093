//! Cache Statistics Module
//!
//! Tracks cache performance metrics including hits, misses, and evictions.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Cache Stats ==
/// Point-in-time snapshot of cache performance metrics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Number of successful cache retrievals
    pub hits: u64,
    /// Number of failed cache retrievals
    pub misses: u64,
    /// Number of new keys stored
    pub insertions: u64,
    /// Number of overwrites of resident keys
    pub updates: u64,
    /// Number of entries evicted to satisfy a limit
    pub evictions: u64,
    /// Number of entries removed explicitly
    pub removals: u64,
    /// Number of stores refused with an error
    pub rejections: u64,
    /// Current number of entries in the cache
    pub total_entries: usize,
    /// Current cumulative cost of resident entries
    pub total_cost: u64,
}

impl CacheStats {
    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

// == Stats Recorder ==
/// Lock-free counters, updated from both shared and exclusive lock paths.
#[derive(Debug, Default)]
pub struct StatsRecorder {
    hits: AtomicU64,
    misses: AtomicU64,
    insertions: AtomicU64,
    updates: AtomicU64,
    evictions: AtomicU64,
    removals: AtomicU64,
    rejections: AtomicU64,
}

impl StatsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_insertion(&self) {
        self.insertions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_update(&self) {
        self.updates.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_eviction(&self) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_removals(&self, count: u64) {
        self.removals.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_rejection(&self) {
        self.rejections.fetch_add(1, Ordering::Relaxed);
    }

    // == Snapshot ==
    /// Copies the counters into a `CacheStats` with the given occupancy.
    pub fn snapshot(&self, total_entries: usize, total_cost: u64) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            insertions: self.insertions.load(Ordering::Relaxed),
            updates: self.updates.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            removals: self.removals.load(Ordering::Relaxed),
            rejections: self.rejections.load(Ordering::Relaxed),
            total_entries,
            total_cost,
        }
    }
}
