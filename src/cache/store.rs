//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with cost accounting and LRU eviction.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

use crate::cache::{CacheEntry, CacheStats, LruTracker, StatsRecorder};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};

// == Cache Store ==
/// Cost-bounded key-value storage with LRU eviction.
///
/// Mutations take `&mut self`; lookups take `&self` and only touch atomics, so
/// a store behind an `RwLock` serves concurrent readers.
#[derive(Debug)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<Vec<u8>, CacheEntry>,
    /// LRU access tracker
    lru: LruTracker,
    /// Performance statistics
    stats: StatsRecorder,
    /// Source of access ticks
    clock: AtomicU64,
    /// Sum of resident entry costs
    total_cost: u64,
    /// Limits
    config: CacheConfig,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a new, empty CacheStore with the given limits.
    pub fn new(config: CacheConfig) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: StatsRecorder::new(),
            clock: AtomicU64::new(0),
            total_cost: 0,
            config,
        }
    }

    fn next_tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed) + 1
    }

    // == Set ==
    /// Stores a key-value pair at the configured default cost.
    pub fn set(&mut self, key: Vec<u8>, value: Vec<u8>) -> Result<()> {
        let cost = self.config.default_cost;
        self.insert(key, value, cost)
    }

    // == Set With Cost ==
    /// Stores a key-value pair at an explicit cost.
    ///
    /// Fails with `InvalidCost` for negative costs and `CapacityExceeded` when
    /// the cost alone is above the total cost limit. Neither failure changes
    /// the store.
    pub fn set_with_cost(&mut self, key: Vec<u8>, value: Vec<u8>, cost: i64) -> Result<()> {
        let cost = u64::try_from(cost).map_err(|_| {
            self.stats.record_rejection();
            CacheError::InvalidCost(cost)
        })?;
        self.insert(key, value, cost)
    }

    // == Insert ==
    /// Stores a key-value pair, evicting least recently used entries as needed.
    ///
    /// If the key already exists, its value, cost and recency are replaced. The
    /// old cost is released before room is made, so a key is never evicted to
    /// make room for itself.
    pub fn insert(&mut self, key: Vec<u8>, value: Vec<u8>, cost: u64) -> Result<()> {
        let capacity = self.config.total_cost_limit;
        if cost > capacity {
            self.stats.record_rejection();
            debug!(
                key = %String::from_utf8_lossy(&key),
                cost, capacity, "Rejected entry larger than total cost limit"
            );
            return Err(CacheError::CapacityExceeded { cost, capacity });
        }

        // Release the overwritten entry
        let is_overwrite = self.detach(&key).is_some();

        while self.needs_room(cost) {
            if self.evict_oldest().is_none() {
                break;
            }
        }

        // Either the loop left total_cost + cost <= limit, or it emptied the
        // store and cost <= limit was checked above.
        let tick = self.next_tick();
        self.lru.insert(tick, key.clone());
        self.entries.insert(key, CacheEntry::new(value, cost, tick));
        self.total_cost += cost;

        if is_overwrite {
            self.stats.record_update();
        } else {
            self.stats.record_insertion();
        }
        Ok(())
    }

    // == Get ==
    /// Retrieves a value by key and marks it most recently used.
    pub fn get(&self, key: &[u8]) -> Result<Vec<u8>> {
        match self.entries.get(key) {
            Some(entry) => {
                entry.touch(self.next_tick());
                self.stats.record_hit();
                Ok(entry.value.clone())
            }
            None => {
                self.stats.record_miss();
                Err(CacheError::not_found(key))
            }
        }
    }

    // == Contains ==
    /// Checks residency without affecting recency or statistics.
    pub fn contains(&self, key: &[u8]) -> bool {
        self.entries.contains_key(key)
    }

    // == Remove ==
    /// Removes an entry by key. Returns whether the key was resident.
    pub fn remove(&mut self, key: &[u8]) -> bool {
        let removed = self.detach(key).is_some();
        if removed {
            self.stats.record_removals(1);
        }
        removed
    }

    // == Remove All ==
    /// Empties the store. Returns the number of entries removed.
    pub fn remove_all(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        self.lru.clear();
        self.total_cost = 0;
        self.stats.record_removals(count as u64);
        count
    }

    // == Limits ==
    /// Changes the total cost limit, evicting until the store fits it.
    ///
    /// Returns the number of entries evicted.
    pub fn set_total_cost_limit(&mut self, limit: u64) -> usize {
        self.config.total_cost_limit = limit;
        self.shrink_to_limits()
    }

    /// Changes the entry count limit (0 = unlimited), evicting until the store fits it.
    ///
    /// Returns the number of entries evicted.
    pub fn set_count_limit(&mut self, limit: usize) -> usize {
        self.config.count_limit = limit;
        self.shrink_to_limits()
    }

    fn shrink_to_limits(&mut self) -> usize {
        let mut evicted = 0;
        while self.total_cost > self.config.total_cost_limit || self.over_count_limit(0) {
            if self.evict_oldest().is_none() {
                break;
            }
            evicted += 1;
        }
        evicted
    }

    // == Eviction ==
    fn needs_room(&self, incoming_cost: u64) -> bool {
        let limit = self.config.total_cost_limit;
        self.total_cost
            .checked_add(incoming_cost)
            .map_or(true, |sum| sum > limit)
            || self.over_count_limit(1)
    }

    fn over_count_limit(&self, incoming: usize) -> bool {
        self.config.count_limit > 0 && self.entries.len() + incoming > self.config.count_limit
    }

    /// Evicts the least recently used entry, returning its key.
    ///
    /// Keys read since they were filed surface here with a stale tick and are
    /// re-filed at their latest access before the search continues.
    fn evict_oldest(&mut self) -> Option<Vec<u8>> {
        loop {
            let (_, key) = self.lru.pop_oldest()?;
            let Some(entry) = self.entries.get_mut(&key) else {
                continue;
            };

            if entry.is_stale() {
                let tick = entry.refile();
                self.lru.insert(tick, key);
                continue;
            }

            if let Some(entry) = self.entries.remove(&key) {
                self.total_cost -= entry.cost;
                self.stats.record_eviction();
                debug!(
                    key = %String::from_utf8_lossy(&key),
                    cost = entry.cost,
                    total_cost = self.total_cost,
                    "Evicted least recently used entry"
                );
            }
            return Some(key);
        }
    }

    /// Unlinks an entry from storage, the tracker and the cost total.
    fn detach(&mut self, key: &[u8]) -> Option<CacheEntry> {
        let entry = self.entries.remove(key)?;
        self.lru.remove(entry.indexed_at());
        self.total_cost -= entry.cost;
        Some(entry)
    }

    // == Accessors ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot(self.entries.len(), self.total_cost)
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Returns the sum of resident entry costs.
    pub fn total_cost(&self) -> u64 {
        self.total_cost
    }

    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}
