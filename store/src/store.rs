//! The store contract.

use crate::{Solution, StoreResult};
use std::sync::Arc;
use weft_core::UpdateRequest;
use weft_parser::SelectQuery;

/// A graph store reachable by update and query requests.
///
/// One call is one round trip. Implementations apply an update request as a
/// whole or not at all.
pub trait GraphStore: Send + Sync {
    fn execute_update(&self, update: &UpdateRequest) -> StoreResult<()>;

    /// Solution rows in store order; unbound variables are absent.
    fn execute_query(&self, query: &SelectQuery) -> StoreResult<Vec<Solution>>;
}

impl<S: GraphStore + ?Sized> GraphStore for Arc<S> {
    fn execute_update(&self, update: &UpdateRequest) -> StoreResult<()> {
        (**self).execute_update(update)
    }

    fn execute_query(&self, query: &SelectQuery) -> StoreResult<Vec<Solution>> {
        (**self).execute_query(query)
    }
}

impl<S: GraphStore + ?Sized> GraphStore for &S {
    fn execute_update(&self, update: &UpdateRequest) -> StoreResult<()> {
        (**self).execute_update(update)
    }

    fn execute_query(&self, query: &SelectQuery) -> StoreResult<Vec<Solution>> {
        (**self).execute_query(query)
    }
}
