//! Session configuration.

use std::num::NonZeroUsize;

/// Default number of clean entities kept in the cache.
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

/// Session configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Bound on clean cached entities. Dirty entities are not counted and
    /// never evicted.
    pub cache_capacity: NonZeroUsize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionConfig {
    pub fn new() -> Self {
        Self {
            cache_capacity: NonZeroUsize::new(DEFAULT_CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN),
        }
    }

    /// Set the cache capacity. Zero is raised to one.
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_overrides() {
        assert_eq!(SessionConfig::default().cache_capacity.get(), DEFAULT_CACHE_CAPACITY);
        assert_eq!(SessionConfig::new().with_cache_capacity(8).cache_capacity.get(), 8);
        assert_eq!(SessionConfig::new().with_cache_capacity(0).cache_capacity.get(), 1);
    }
}
