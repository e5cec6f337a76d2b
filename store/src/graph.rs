//! Indexed triple storage.

use std::collections::{BTreeSet, HashMap, HashSet};
use weft_core::{Iri, Term, Triple};

/// A set of triples with subject and object indexes.
#[derive(Debug, Clone, Default)]
pub struct TripleSet {
    /// Triple storage
    triples: BTreeSet<Triple>,
    /// Subject index
    by_subject: HashMap<Iri, HashSet<Triple>>,
    /// Object index
    by_object: HashMap<Term, HashSet<Triple>>,
}

impl TripleSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a triple. Returns false if it was already present.
    pub fn insert(&mut self, triple: Triple) -> bool {
        if !self.triples.insert(triple.clone()) {
            return false;
        }
        self.by_subject
            .entry(triple.subject.clone())
            .or_default()
            .insert(triple.clone());
        self.by_object
            .entry(triple.object.clone())
            .or_default()
            .insert(triple);
        true
    }

    /// Remove a triple. Returns false if it was absent.
    pub fn remove(&mut self, triple: &Triple) -> bool {
        if !self.triples.remove(triple) {
            return false;
        }
        if let Some(set) = self.by_subject.get_mut(&triple.subject) {
            set.remove(triple);
            if set.is_empty() {
                self.by_subject.remove(&triple.subject);
            }
        }
        if let Some(set) = self.by_object.get_mut(&triple.object) {
            set.remove(triple);
            if set.is_empty() {
                self.by_object.remove(&triple.object);
            }
        }
        true
    }

    pub fn contains(&self, triple: &Triple) -> bool {
        self.triples.contains(triple)
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// All triples in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    /// Triples matching the fixed positions. Uses the subject index, then the
    /// object index, then a full scan.
    pub fn matching(
        &self,
        subject: Option<&Iri>,
        predicate: Option<&Iri>,
        object: Option<&Term>,
    ) -> Vec<&Triple> {
        let accept = |t: &&Triple| {
            subject.map_or(true, |s| &t.subject == s)
                && predicate.map_or(true, |p| &t.predicate == p)
                && object.map_or(true, |o| &t.object == o)
        };
        let mut found: Vec<&Triple> = match (subject, object) {
            (Some(s), _) => self
                .by_subject
                .get(s)
                .into_iter()
                .flatten()
                .filter(accept)
                .collect(),
            (None, Some(o)) => self
                .by_object
                .get(o)
                .into_iter()
                .flatten()
                .filter(accept)
                .collect(),
            (None, None) => self.triples.iter().filter(accept).collect(),
        };
        // Index buckets are unordered.
        found.sort();
        found
    }
}

impl FromIterator<Triple> for TripleSet {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        let mut set = TripleSet::new();
        for triple in iter {
            set.insert(triple);
        }
        set
    }
}
