//! Cache Registry Module
//!
//! Maps opaque integer handles to owned cache instances, so callers that can
//! only hold a number address caches without aliasing raw pointers.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::cache::Cache;
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};

// == Cache Handle ==
/// Opaque identifier of a cache in a registry. Never zero, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheHandle(u64);

impl CacheHandle {
    /// Wraps a raw handle value received from a caller.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CacheHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// == Cache Registry ==
/// Owns caches and hands out handles to them.
#[derive(Debug)]
pub struct CacheRegistry {
    caches: RwLock<HashMap<CacheHandle, Arc<Cache>>>,
    next_handle: AtomicU64,
}

static GLOBAL: Lazy<CacheRegistry> = Lazy::new(CacheRegistry::new);

/// Returns the process-wide registry.
pub fn global() -> &'static CacheRegistry {
    &GLOBAL
}

impl CacheRegistry {
    // == Constructor ==
    pub fn new() -> Self {
        Self {
            caches: RwLock::new(HashMap::new()),
            next_handle: AtomicU64::new(1),
        }
    }

    // == Lifecycle ==
    /// Creates an empty cache with default limits and returns its handle.
    pub fn create(&self, namer: &str) -> CacheHandle {
        self.register(Cache::new(namer))
    }

    /// Creates an empty cache with the given limits.
    pub fn create_with_config(&self, namer: &str, config: CacheConfig) -> Result<CacheHandle> {
        Ok(self.register(Cache::try_with_config(namer, config)?))
    }

    /// Creates an empty cache with limits read from the environment.
    pub fn create_from_env(&self, namer: &str) -> Result<CacheHandle> {
        Ok(self.register(Cache::from_env(namer)?))
    }

    fn register(&self, cache: Cache) -> CacheHandle {
        let handle = CacheHandle(self.next_handle.fetch_add(1, Ordering::Relaxed));
        info!(%handle, cache = cache.name(), "Registered cache");
        self.caches.write().insert(handle, Arc::new(cache));
        handle
    }

    // == Lookup ==
    /// Returns the cache behind `handle`.
    pub fn lookup(&self, handle: CacheHandle) -> Result<Arc<Cache>> {
        self.caches
            .read()
            .get(&handle)
            .cloned()
            .ok_or(CacheError::UnknownHandle(handle.0))
    }

    // == Destroy ==
    /// Unregisters the cache behind `handle`.
    ///
    /// Callers still holding the `Arc` from [`CacheRegistry::lookup`] keep a
    /// working cache until they drop it.
    pub fn destroy(&self, handle: CacheHandle) -> Result<()> {
        let cache = self
            .caches
            .write()
            .remove(&handle)
            .ok_or(CacheError::UnknownHandle(handle.0))?;
        info!(%handle, cache = cache.name(), "Destroyed cache");
        Ok(())
    }

    // == Handles Named ==
    /// Handles of every registered cache created with `namer`, in creation order.
    pub fn handles_named(&self, namer: &str) -> Vec<CacheHandle> {
        let mut handles: Vec<CacheHandle> = self
            .caches
            .read()
            .iter()
            .filter(|(_, cache)| cache.name() == namer)
            .map(|(handle, _)| *handle)
            .collect();
        handles.sort();
        handles
    }

    // == Length ==
    pub fn len(&self) -> usize {
        self.caches.read().len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.caches.read().is_empty()
    }

    // == Handle-addressed operations ==

    // == Set ==
    pub fn set(&self, handle: CacheHandle, key: &[u8], value: &[u8]) -> Result<()> {
        self.lookup(handle)?.set(key, value)
    }

    // == Set With Cost ==
    pub fn set_with_cost(
        &self,
        handle: CacheHandle,
        key: &[u8],
        value: &[u8],
        cost: i64,
    ) -> Result<()> {
        self.lookup(handle)?.set_with_cost(key, value, cost)
    }

    // == Get ==
    pub fn get(&self, handle: CacheHandle, key: &[u8]) -> Result<Vec<u8>> {
        self.lookup(handle)?.get(key)
    }

    // == Remove ==
    /// Removes `key` from the addressed cache. An absent key is not an error,
    /// an unknown handle is.
    pub fn remove(&self, handle: CacheHandle, key: &[u8]) -> Result<()> {
        self.lookup(handle)?.remove(key);
        Ok(())
    }

    // == Remove All ==
    /// Empties the addressed cache only.
    pub fn remove_all(&self, handle: CacheHandle) -> Result<()> {
        let cache = self.lookup(handle)?;
        cache.remove_all();
        debug!(%handle, cache = cache.name(), "Removed all entries");
        Ok(())
    }
}

impl Default for CacheRegistry {
    fn default() -> Self {
        Self::new()
    }
}
