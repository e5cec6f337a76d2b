//! Fresh identifier suffixes for created entities.

use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Produces the suffix of a new entity IRI. Must not repeat within one
/// process, also across threads.
pub trait FreshIdGenerator: Send + Sync {
    fn fresh_suffix_for(&self, tag: &str) -> String;
}

/// Random v4 UUID suffixes.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidSuffixes;

impl FreshIdGenerator for UuidSuffixes {
    fn fresh_suffix_for(&self, _tag: &str) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Counter suffixes `1`, `2`, ... shared across tags. Deterministic, for
/// tests and reproducible fixtures.
#[derive(Debug)]
pub struct SequentialSuffixes {
    next: AtomicU64,
}

impl SequentialSuffixes {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }
}

impl Default for SequentialSuffixes {
    fn default() -> Self {
        Self::new()
    }
}

impl FreshIdGenerator for SequentialSuffixes {
    fn fresh_suffix_for(&self, _tag: &str) -> String {
        self.next.fetch_add(1, Ordering::Relaxed).to_string()
    }
}
