//! Error types for the cache engine
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for cache and registry operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Key not resident in the cache (never set, removed, or evicted)
    #[error("Key not found: {0}")]
    NotFound(String),

    /// A negative cost was supplied
    #[error("Invalid cost: {0} (cost cannot be negative)")]
    InvalidCost(i64),

    /// The entry cannot fit even after evicting every other entry
    #[error("Entry cost {cost} exceeds total cost limit {capacity}")]
    CapacityExceeded { cost: u64, capacity: u64 },

    /// No cache is registered under this handle
    #[error("Unknown cache handle: {0}")]
    UnknownHandle(u64),

    /// Configuration values are inconsistent
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl CacheError {
    /// Builds a `NotFound` error, rendering the key lossily as UTF-8.
    pub fn not_found(key: &[u8]) -> Self {
        CacheError::NotFound(String::from_utf8_lossy(key).into_owned())
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache engine.
pub type Result<T> = std::result::Result<T, CacheError>;
