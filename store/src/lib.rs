//! Weft Store
//!
//! The graph store contract used by the journal and session, plus an
//! in-memory store that evaluates the query subset the parser accepts:
//! - Basic graph patterns (nested-loop join over indexed triples)
//! - OPTIONAL, groups, UNION and MINUS
//! - FILTER with comparisons, `bound` and EXISTS
//! - Atomic application of update requests

mod error;
mod eval;
mod graph;
mod memory;
mod solution;
mod store;

pub use error::{StoreError, StoreResult};
pub use eval::Evaluator;
pub use graph::TripleSet;
pub use memory::MemoryStore;
pub use solution::Solution;
pub use store::GraphStore;
