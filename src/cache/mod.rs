//! Cache Module
//!
//! Provides in-memory caching with cost accounting and LRU eviction.

mod entry;
mod lru;
mod shared;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::CacheEntry;
pub use lru::LruTracker;
pub use shared::Cache;
pub use stats::{CacheStats, StatsRecorder};
pub use store::CacheStore;
