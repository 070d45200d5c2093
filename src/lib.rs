//! Deep Pockets - A cost-aware in-memory cache engine
//!
//! Provides named caches bounded by a total entry cost, evicting least
//! recently used entries, and a registry that addresses caches by handle.

pub mod cache;
pub mod config;
pub mod error;
pub mod logging;
pub mod registry;

pub use cache::{Cache, CacheStats};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
pub use registry::{CacheHandle, CacheRegistry};
