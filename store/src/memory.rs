//! In-process reference store.

use crate::eval::Evaluator;
use crate::{GraphStore, Solution, StoreResult, TripleSet};
use parking_lot::RwLock;
use tracing::{debug, trace};
use weft_core::{Triple, TriplePattern, UpdateOp, UpdateRequest};
use weft_parser::SelectQuery;

/// A `GraphStore` over an in-memory triple set.
///
/// Updates are applied to a copy of the graph and swapped in, so a request
/// takes effect entirely or not at all.
#[derive(Debug, Default)]
pub struct MemoryStore {
    graph: RwLock<TripleSet>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_triples(triples: impl IntoIterator<Item = Triple>) -> Self {
        Self {
            graph: RwLock::new(triples.into_iter().collect()),
        }
    }

    pub fn insert(&self, triple: Triple) -> bool {
        self.graph.write().insert(triple)
    }

    pub fn contains(&self, triple: &Triple) -> bool {
        self.graph.read().contains(triple)
    }

    pub fn len(&self) -> usize {
        self.graph.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.read().is_empty()
    }

    /// A snapshot of every triple, sorted.
    pub fn triples(&self) -> Vec<Triple> {
        self.graph.read().iter().cloned().collect()
    }
}

fn instantiate_all(patterns: &[TriplePattern], solutions: &[Solution]) -> Vec<Triple> {
    let mut out = Vec::new();
    for solution in solutions {
        let lookup = |name: &str| solution.get(name);
        out.extend(patterns.iter().filter_map(|p| p.instantiate(&lookup)));
    }
    out
}

fn apply(graph: &mut TripleSet, op: &UpdateOp) {
    match op {
        UpdateOp::InsertData(triples) => {
            for triple in triples {
                graph.insert(triple.clone());
            }
        }
        UpdateOp::DeleteData(triples) => {
            for triple in triples {
                graph.remove(triple);
            }
        }
        UpdateOp::DeleteWhere(patterns) => {
            let solutions = Evaluator::new(graph).match_triples(patterns, vec![Solution::new()]);
            for triple in instantiate_all(patterns, &solutions) {
                graph.remove(&triple);
            }
        }
        UpdateOp::Modify {
            delete,
            insert,
            pattern,
        } => {
            let solutions = Evaluator::new(graph).match_triples(pattern, vec![Solution::new()]);
            let removed = instantiate_all(delete, &solutions);
            let added = instantiate_all(insert, &solutions);
            for triple in &removed {
                graph.remove(triple);
            }
            for triple in added {
                graph.insert(triple);
            }
        }
    }
}

impl GraphStore for MemoryStore {
    fn execute_update(&self, update: &UpdateRequest) -> StoreResult<()> {
        trace!(update = %update, "executing update");
        let mut guard = self.graph.write();
        let mut next = guard.clone();
        for op in update.iter() {
            apply(&mut next, op);
        }
        debug!(
            operations = update.len(),
            before = guard.len(),
            after = next.len(),
            "update applied"
        );
        *guard = next;
        Ok(())
    }

    fn execute_query(&self, query: &SelectQuery) -> StoreResult<Vec<Solution>> {
        trace!(query = %query, "executing query");
        let graph = self.graph.read();
        let rows = Evaluator::new(&graph).select(query)?;
        debug!(rows = rows.len(), "query evaluated");
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use weft_core::{Iri, PatternTerm, Term};

    fn iri(s: &str) -> Iri {
        Iri::new(format!("http://x/{}", s)).unwrap()
    }

    fn var(name: &str) -> PatternTerm {
        PatternTerm::var(name)
    }

    fn store() -> MemoryStore {
        MemoryStore::with_triples([
            Triple::new(iri("b1"), iri("wheel"), iri("w1")),
            Triple::new(iri("b2"), iri("wheel"), iri("w1")),
            Triple::new(iri("w1"), iri("size"), 26i64),
            Triple::new(iri("w2"), iri("size"), 28i64),
        ])
    }

    #[test]
    fn test_insert_and_delete_data() {
        let store = MemoryStore::new();
        let t = Triple::new(iri("b1"), iri("mfg"), 2020i64);

        store
            .execute_update(&UpdateOp::InsertData(vec![t.clone()]).into())
            .unwrap();
        assert!(store.contains(&t));

        // WHEN the same deletion is applied twice
        let delete: UpdateRequest = UpdateOp::DeleteData(vec![t.clone()]).into();
        store.execute_update(&delete).unwrap();
        store.execute_update(&delete).unwrap();

        // THEN the second is a no-op
        assert!(store.is_empty());
    }

    #[test]
    fn test_delete_where_subject_and_object() {
        // GIVEN w1 referenced by two bikes
        let store = store();

        // WHEN every triple mentioning w1 is deleted
        let request = UpdateRequest::from(vec![
            UpdateOp::DeleteWhere(vec![TriplePattern::new(iri("w1"), var("p"), var("o"))]),
            UpdateOp::DeleteWhere(vec![TriplePattern::new(var("s"), var("p"), iri("w1"))]),
        ]);
        store.execute_update(&request).unwrap();

        // THEN only w2 remains
        assert_eq!(
            store.triples(),
            vec![Triple::new(iri("w2"), iri("size"), 28i64)]
        );
    }

    #[test]
    fn test_modify_redirects_references() {
        let store = store();
        let request: UpdateRequest = UpdateOp::Modify {
            delete: vec![TriplePattern::new(var("s"), var("p"), iri("w1"))],
            insert: vec![TriplePattern::new(var("s"), var("p"), iri("w2"))],
            pattern: vec![TriplePattern::new(var("s"), var("p"), iri("w1"))],
        }
        .into();
        store.execute_update(&request).unwrap();

        assert!(store.contains(&Triple::new(iri("b1"), iri("wheel"), iri("w2"))));
        assert!(store.contains(&Triple::new(iri("b2"), iri("wheel"), iri("w2"))));
        assert!(!store.contains(&Triple::new(iri("b1"), iri("wheel"), iri("w1"))));
        assert!(store.contains(&Triple::new(iri("w1"), iri("size"), 26i64)));
    }

    #[test]
    fn test_ops_observe_earlier_ops() {
        // GIVEN an insert followed by a pattern delete of the same subject
        let store = MemoryStore::new();
        let request = UpdateRequest::from(vec![
            UpdateOp::InsertData(vec![Triple::new(iri("b9"), iri("mfg"), 2000i64)]),
            UpdateOp::DeleteWhere(vec![TriplePattern::new(iri("b9"), var("p"), var("o"))]),
        ]);

        store.execute_update(&request).unwrap();

        // THEN the delete saw the insert
        assert!(store.is_empty());
    }

    #[test]
    fn test_execute_query() {
        let store = store();
        let query =
            weft_parser::parse_query("SELECT ?b WHERE { ?b <http://x/wheel> <http://x/w1> }")
                .unwrap();
        let rows = store.execute_query(&query).unwrap();
        let bikes: Vec<&Term> = rows.iter().filter_map(|r| r.get("b")).collect();
        assert_eq!(bikes, vec![&Term::from(iri("b1")), &Term::from(iri("b2"))]);
    }
}
