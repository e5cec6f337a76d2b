//! The mutation journal and its commit protocol.

use crate::{ChangeNode, JournalError, JournalResult};
use tracing::{debug, debug_span, info, trace, warn};
use weft_core::UpdateRequest;
use weft_store::GraphStore;

/// Journal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JournalState {
    /// Accepting appends; no commit in flight.
    #[default]
    Open,
    /// A combined update has been handed to the store.
    Committing,
}

/// What a successful commit flushed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CommitOutcome {
    /// Change nodes flushed.
    pub nodes: usize,
    /// Update operations submitted.
    pub operations: usize,
}

/// A combined update taken from the journal and not yet acknowledged.
#[derive(Debug, Clone)]
pub struct PendingCommit {
    pub update: UpdateRequest,
    pub nodes: usize,
}

/// Ordered log of pending mutations.
///
/// Nodes are never reordered or coalesced. Nodes appended while a commit is
/// in flight stay queued for the next commit.
#[derive(Debug, Default)]
pub struct Journal {
    nodes: Vec<ChangeNode>,
    state: JournalState,
    in_flight: usize,
}

impl Journal {
    /// Create an empty journal.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, node: ChangeNode) {
        debug!(kind = node.kind(), entity = %node.entity(), "journal append");
        self.nodes.push(node);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn state(&self) -> JournalState {
        self.state
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChangeNode> {
        self.nodes.iter()
    }

    pub fn nodes(&self) -> &[ChangeNode] {
        &self.nodes
    }

    /// The combined update a commit would submit now.
    pub fn preview(&self) -> UpdateRequest {
        materialize(&self.nodes)
    }

    /// Drop every queued node. Refused while a commit is in flight.
    pub fn clear(&mut self) -> JournalResult<()> {
        if self.state == JournalState::Committing {
            return Err(JournalError::AlreadyCommitting);
        }
        self.nodes.clear();
        Ok(())
    }

    /// Materialize every queued node and enter `Committing`.
    pub fn begin_commit(&mut self) -> JournalResult<PendingCommit> {
        if self.state == JournalState::Committing {
            return Err(JournalError::AlreadyCommitting);
        }
        self.state = JournalState::Committing;
        self.in_flight = self.nodes.len();
        Ok(PendingCommit {
            update: materialize(&self.nodes),
            nodes: self.in_flight,
        })
    }

    /// Leave `Committing`. On success the flushed nodes are removed; on
    /// failure everything stays queued.
    pub fn finish_commit(&mut self, success: bool) -> JournalResult<()> {
        if self.state != JournalState::Committing {
            return Err(JournalError::NotCommitting);
        }
        if success {
            self.nodes.drain(..self.in_flight);
        }
        self.in_flight = 0;
        self.state = JournalState::Open;
        Ok(())
    }

    /// Submit every queued node to `store` as one update request.
    ///
    /// An empty journal commits without a round trip.
    pub fn commit(&mut self, store: &dyn GraphStore) -> JournalResult<CommitOutcome> {
        if self.is_empty() {
            return Ok(CommitOutcome::default());
        }
        let pending = self.begin_commit()?;
        let outcome = CommitOutcome {
            nodes: pending.nodes,
            operations: pending.update.len(),
        };

        let span = debug_span!(
            "journal_commit",
            nodes = outcome.nodes,
            operations = outcome.operations
        );
        let _enter = span.enter();
        trace!(update = %pending.update, "submitting combined update");

        match store.execute_update(&pending.update) {
            Ok(()) => {
                self.finish_commit(true)?;
                info!(
                    nodes = outcome.nodes,
                    operations = outcome.operations,
                    "commit succeeded"
                );
                Ok(outcome)
            }
            Err(e) => {
                self.finish_commit(false)?;
                warn!(error = %e, "commit failed; journal kept for retry");
                Err(JournalError::CommitFailure(e))
            }
        }
    }
}

fn materialize(nodes: &[ChangeNode]) -> UpdateRequest {
    let mut request = UpdateRequest::new();
    for node in nodes {
        node.materialize_into(&mut request);
    }
    request
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::Ordering;
    use support::CountingStore;
    use weft_core::{Iri, Triple};
    use weft_store::{MemoryStore, StoreError};

    mod support {
        use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
        use weft_core::UpdateRequest;
        use weft_parser::SelectQuery;
        use weft_store::{GraphStore, Solution, StoreError, StoreResult};

        /// Counts round trips and fails while `failing` is set.
        #[derive(Default)]
        pub struct CountingStore {
            pub calls: AtomicUsize,
            pub failing: AtomicBool,
        }

        impl GraphStore for CountingStore {
            fn execute_update(&self, _update: &UpdateRequest) -> StoreResult<()> {
                self.calls.fetch_add(1, Ordering::SeqCst);
                if self.failing.load(Ordering::SeqCst) {
                    Err(StoreError::unavailable("connection refused"))
                } else {
                    Ok(())
                }
            }

            fn execute_query(&self, _query: &SelectQuery) -> StoreResult<Vec<Solution>> {
                Ok(Vec::new())
            }
        }
    }

    fn iri(s: &str) -> Iri {
        Iri::new(format!("http://x/{}", s)).unwrap()
    }

    fn add(value: &str) -> ChangeNode {
        ChangeNode::PropertyAdd {
            subject: iri("b1"),
            predicate: iri("tag"),
            value: iri(value).into(),
        }
    }

    fn remove(value: &str) -> ChangeNode {
        ChangeNode::PropertyRemove {
            subject: iri("b1"),
            predicate: iri("tag"),
            value: iri(value).into(),
        }
    }

    #[test]
    fn test_commit_preserves_append_order() {
        // GIVEN [Add(p1), Remove(p1), Add(p2)]
        let store = MemoryStore::new();
        let mut journal = Journal::new();
        journal.append(add("p1"));
        journal.append(remove("p1"));
        journal.append(add("p2"));

        // WHEN committed against a fresh store
        let outcome = journal.commit(&store).unwrap();

        // THEN p2 is present, p1 absent, journal empty
        assert_eq!(outcome, CommitOutcome { nodes: 3, operations: 3 });
        assert!(store.contains(&Triple::new(iri("b1"), iri("tag"), iri("p2"))));
        assert!(!store.contains(&Triple::new(iri("b1"), iri("tag"), iri("p1"))));
        assert!(journal.is_empty());
        assert_eq!(journal.state(), JournalState::Open);
    }

    #[test]
    fn test_commit_is_one_round_trip() {
        let store = CountingStore::default();
        let mut journal = Journal::new();
        journal.append(add("p1"));
        journal.append(add("p2"));

        journal.commit(&store).unwrap();
        assert_eq!(store.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failed_commit_keeps_journal_for_retry() {
        // GIVEN a store that refuses connections
        let store = CountingStore::default();
        store.failing.store(true, Ordering::SeqCst);
        let mut journal = Journal::new();
        journal.append(add("p1"));
        let before = journal.preview();

        // WHEN the commit fails
        let result = journal.commit(&store);

        // THEN the identical update is still queued
        assert_eq!(
            result,
            Err(JournalError::CommitFailure(StoreError::unavailable(
                "connection refused"
            )))
        );
        assert_eq!(journal.len(), 1);
        assert_eq!(journal.preview(), before);
        assert_eq!(journal.state(), JournalState::Open);

        // AND a retry succeeds once the store is back
        store.failing.store(false, Ordering::SeqCst);
        assert_eq!(journal.commit(&store).unwrap().nodes, 1);
        assert!(journal.is_empty());
    }

    #[test]
    fn test_empty_commit_skips_round_trip() {
        let store = CountingStore::default();
        let mut journal = Journal::new();
        assert_eq!(journal.commit(&store).unwrap(), CommitOutcome::default());
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_appends_during_commit_survive() {
        // GIVEN a commit in flight
        let mut journal = Journal::new();
        journal.append(add("p1"));
        let pending = journal.begin_commit().unwrap();
        assert_eq!(pending.nodes, 1);

        // WHEN another node is appended and the commit succeeds
        journal.append(add("p2"));
        assert_eq!(journal.begin_commit().err(), Some(JournalError::AlreadyCommitting));
        assert_eq!(journal.clear(), Err(JournalError::AlreadyCommitting));
        journal.finish_commit(true).unwrap();

        // THEN only the late node remains
        assert_eq!(journal.nodes(), &[add("p2")]);
        assert_eq!(journal.finish_commit(true), Err(JournalError::NotCommitting));
    }

    #[test]
    fn test_remove_twice_is_noop() {
        let store = MemoryStore::with_triples([Triple::new(iri("b1"), iri("tag"), iri("p1"))]);
        let mut journal = Journal::new();
        journal.append(remove("p1"));
        journal.append(remove("p1"));

        journal.commit(&store).unwrap();
        assert!(store.is_empty());
    }
}
