//! A store that fails on demand.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use weft_core::UpdateRequest;
use weft_parser::SelectQuery;
use weft_store::{GraphStore, MemoryStore, Solution, StoreError, StoreResult};

/// Wraps a `MemoryStore`, counts update round trips and refuses updates
/// while failing.
#[derive(Debug)]
pub struct FlakyStore {
    inner: MemoryStore,
    failing: AtomicBool,
    updates: AtomicUsize,
}

impl FlakyStore {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            failing: AtomicBool::new(false),
            updates: AtomicUsize::new(0),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Update requests received, including refused ones.
    pub fn updates(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }
}

impl GraphStore for FlakyStore {
    fn execute_update(&self, update: &UpdateRequest) -> StoreResult<()> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::unavailable("connection reset by peer"));
        }
        self.inner.execute_update(update)
    }

    fn execute_query(&self, query: &SelectQuery) -> StoreResult<Vec<Solution>> {
        self.inner.execute_query(query)
    }
}
