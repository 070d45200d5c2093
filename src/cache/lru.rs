//! LRU Tracker Module
//!
//! Implements Least Recently Used ordering for cache eviction.

use std::collections::BTreeMap;

// == LRU Tracker ==
/// Orders keys by access clock tick.
///
/// Ticks are unique, so the map holds exactly one key per tick:
/// - First = Least recently used
/// - Last = Most recently used
///
/// Reads stamp entries without touching the tracker. A key may therefore be
/// filed under an older tick than its real last access; the store re-files such
/// keys when they surface at the front during eviction.
#[derive(Debug, Default)]
pub struct LruTracker {
    /// Keys by the tick they were filed under
    order: BTreeMap<u64, Vec<u8>>,
}

impl LruTracker {
    // == Constructor ==
    /// Creates a new empty LRU tracker.
    pub fn new() -> Self {
        Self {
            order: BTreeMap::new(),
        }
    }

    // == Insert ==
    /// Files a key under `tick`.
    pub fn insert(&mut self, tick: u64, key: Vec<u8>) {
        self.order.insert(tick, key);
    }

    // == Remove ==
    /// Removes the key filed under `tick`.
    pub fn remove(&mut self, tick: u64) -> Option<Vec<u8>> {
        self.order.remove(&tick)
    }

    // == Pop Oldest ==
    /// Returns and removes the key filed under the smallest tick.
    ///
    /// Returns None if tracker is empty.
    pub fn pop_oldest(&mut self) -> Option<(u64, Vec<u8>)> {
        self.order.pop_first()
    }

    // == Peek Oldest ==
    /// Returns the key filed under the smallest tick without removing it.
    pub fn peek_oldest(&self) -> Option<&[u8]> {
        self.order.first_key_value().map(|(_, key)| key.as_slice())
    }

    // == Clear ==
    pub fn clear(&mut self) {
        self.order.clear();
    }

    // == Length ==
    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
