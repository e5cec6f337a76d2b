//! Weft Journal
//!
//! Ordered log of pending mutations and the commit protocol:
//! - Append change nodes in call order
//! - Materialize them into one combined update request
//! - Submit it in a single store round trip
//! - Clear on success, keep everything for retry on failure

mod error;
mod journal;
mod node;

pub use error::{JournalError, JournalResult};
pub use journal::{CommitOutcome, Journal, JournalState, PendingCommit};
pub use node::ChangeNode;
