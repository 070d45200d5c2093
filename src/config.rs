//! Configuration Module
//!
//! Handles loading and managing cache limits from environment variables.

use std::env;

use serde::{Deserialize, Serialize};

use crate::error::{CacheError, Result};

/// Default maximum total cost of resident entries.
pub const DEFAULT_TOTAL_COST_LIMIT: u64 = 1000;

/// Default maximum number of resident entries.
pub const DEFAULT_COUNT_LIMIT: usize = 100;

/// Cost charged by a plain `set`.
pub const UNIT_COST: u64 = 1;

/// Cache limits.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum cumulative cost of resident entries
    pub total_cost_limit: u64,
    /// Maximum number of resident entries, 0 = unlimited
    pub count_limit: usize,
    /// Cost charged for entries stored without an explicit cost
    pub default_cost: u64,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// Hosts embedding the engine pick this up through `Cache::from_env` or
    /// `CacheRegistry::create_from_env`.
    ///
    /// # Environment Variables
    /// - `DEEP_POCKETS_TOTAL_COST_LIMIT` - Total cost limit (default: 1000)
    /// - `DEEP_POCKETS_COUNT_LIMIT` - Entry count limit, 0 disables it (default: 100)
    /// - `DEEP_POCKETS_DEFAULT_COST` - Cost of a plain set (default: 1)
    pub fn from_env() -> Self {
        Self {
            total_cost_limit: env::var("DEEP_POCKETS_TOTAL_COST_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TOTAL_COST_LIMIT),
            count_limit: env::var("DEEP_POCKETS_COUNT_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_COUNT_LIMIT),
            default_cost: env::var("DEEP_POCKETS_DEFAULT_COST")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(UNIT_COST),
        }
    }

    pub fn with_total_cost_limit(mut self, limit: u64) -> Self {
        self.total_cost_limit = limit;
        self
    }

    pub fn with_count_limit(mut self, limit: usize) -> Self {
        self.count_limit = limit;
        self
    }

    pub fn with_default_cost(mut self, cost: u64) -> Self {
        self.default_cost = cost;
        self
    }

    /// Checks that a plain `set` can ever succeed under these limits.
    pub fn validate(&self) -> Result<()> {
        if self.default_cost > self.total_cost_limit {
            return Err(CacheError::InvalidConfig(format!(
                "default cost {} exceeds total cost limit {}",
                self.default_cost, self.total_cost_limit
            )));
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            total_cost_limit: DEFAULT_TOTAL_COST_LIMIT,
            count_limit: DEFAULT_COUNT_LIMIT,
            default_cost: UNIT_COST,
        }
    }
}
