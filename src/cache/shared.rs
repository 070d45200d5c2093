//! Shared Cache Module
//!
//! Thread-safe, named cache built on `CacheStore`.

use parking_lot::RwLock;
use tracing::{debug, instrument};

use crate::cache::{CacheStats, CacheStore};
use crate::config::CacheConfig;
use crate::error::Result;

// == Cache ==
/// A named, thread-safe cache.
///
/// Mutations are serialized behind a write lock, so the total cost limit holds
/// after every completed call. Lookups take the read lock and run concurrently;
/// they stamp recency through atomics instead of reordering the tracker.
///
/// Share across threads with `Arc<Cache>`.
#[derive(Debug)]
pub struct Cache {
    /// Label supplied at construction
    name: String,
    store: RwLock<CacheStore>,
}

impl Cache {
    // == Constructors ==
    /// Creates an empty cache with default limits.
    ///
    /// Besides the total cost limit of 1000, the defaults cap the cache at 100
    /// entries, so a cache of unit-cost entries evicts by count long before its
    /// cost limit is reached. Use [`Cache::with_config`] with
    /// `with_count_limit(0)` to evict by cost alone.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(name, CacheConfig::default())
    }

    /// Creates an empty cache with the given limits.
    ///
    /// The config is not validated: if `default_cost` exceeds
    /// `total_cost_limit`, every plain [`Cache::set`] fails with
    /// `CapacityExceeded`. Use [`Cache::try_with_config`] to reject such configs.
    pub fn with_config(name: impl Into<String>, config: CacheConfig) -> Self {
        let name = name.into();
        debug!(
            cache = %name,
            total_cost_limit = config.total_cost_limit,
            count_limit = config.count_limit,
            "Cache created"
        );
        Self {
            name,
            store: RwLock::new(CacheStore::new(config)),
        }
    }

    /// Creates an empty cache after checking the limits with [`CacheConfig::validate`].
    pub fn try_with_config(name: impl Into<String>, config: CacheConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_config(name, config))
    }

    /// Creates an empty cache with limits read by [`CacheConfig::from_env`].
    pub fn from_env(name: impl Into<String>) -> Result<Self> {
        Self::try_with_config(name, CacheConfig::from_env())
    }

    // == Name ==
    pub fn name(&self) -> &str {
        &self.name
    }

    // == Set ==
    /// Stores `value` under `key` at the default cost.
    ///
    /// Only fails when the default cost itself exceeds the total cost limit.
    #[instrument(level = "trace", skip_all, fields(cache = %self.name))]
    pub fn set(&self, key: impl AsRef<[u8]>, value: impl AsRef<[u8]>) -> Result<()> {
        self.store
            .write()
            .set(key.as_ref().to_vec(), value.as_ref().to_vec())
    }

    // == Set With Cost ==
    /// Stores `value` under `key` at an explicit cost.
    ///
    /// Fails with `InvalidCost` when `cost` is negative and with
    /// `CapacityExceeded` when it exceeds the total cost limit. On failure the
    /// cache, including any previous value for `key`, is unchanged.
    #[instrument(level = "trace", skip(self, key, value), fields(cache = %self.name))]
    pub fn set_with_cost(
        &self,
        key: impl AsRef<[u8]>,
        value: impl AsRef<[u8]>,
        cost: i64,
    ) -> Result<()> {
        self.store
            .write()
            .set_with_cost(key.as_ref().to_vec(), value.as_ref().to_vec(), cost)
    }

    // == Get ==
    /// Returns a copy of the value for `key`, or `NotFound`.
    pub fn get(&self, key: impl AsRef<[u8]>) -> Result<Vec<u8>> {
        self.store.read().get(key.as_ref())
    }

    // == Get String ==
    /// Like [`Cache::get`], decoding the value as UTF-8 (lossily).
    pub fn get_string(&self, key: impl AsRef<[u8]>) -> Result<String> {
        let bytes = self.get(key)?;
        Ok(match String::from_utf8(bytes) {
            Ok(value) => value,
            Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
        })
    }

    // == Contains ==
    pub fn contains(&self, key: impl AsRef<[u8]>) -> bool {
        self.store.read().contains(key.as_ref())
    }

    // == Remove ==
    /// Removes `key`. Removing an absent key has no effect.
    pub fn remove(&self, key: impl AsRef<[u8]>) {
        self.store.write().remove(key.as_ref());
    }

    // == Remove All ==
    /// Removes every entry.
    #[instrument(level = "debug", skip_all, fields(cache = %self.name))]
    pub fn remove_all(&self) {
        let removed = self.store.write().remove_all();
        debug!(removed, "Cache cleared");
    }

    // == Length ==
    pub fn len(&self) -> usize {
        self.store.read().len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.store.read().is_empty()
    }

    // == Total Cost ==
    pub fn total_cost(&self) -> u64 {
        self.store.read().total_cost()
    }

    // == Limits ==
    pub fn total_cost_limit(&self) -> u64 {
        self.store.read().config().total_cost_limit
    }

    pub fn count_limit(&self) -> usize {
        self.store.read().config().count_limit
    }

    /// Changes the total cost limit, evicting LRU entries until it holds.
    #[instrument(level = "debug", skip(self), fields(cache = %self.name))]
    pub fn set_total_cost_limit(&self, limit: u64) {
        let evicted = self.store.write().set_total_cost_limit(limit);
        debug!(evicted, "Total cost limit changed");
    }

    /// Changes the entry count limit (0 = unlimited), evicting LRU entries until it holds.
    #[instrument(level = "debug", skip(self), fields(cache = %self.name))]
    pub fn set_count_limit(&self, limit: usize) {
        let evicted = self.store.write().set_count_limit(limit);
        debug!(evicted, "Count limit changed");
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        self.store.read().stats()
    }
}
