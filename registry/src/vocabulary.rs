//! The Vocabulary - immutable predicate lookup.

use crate::{Cardinality, PredicateDef, Range};
use std::collections::HashMap;
use weft_core::Iri;

/// Relation hints consulted by the analyzer. Immutable after construction.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    predicates: HashMap<Iri, PredicateDef>,
}

static UNKNOWN: Range = Range::Unknown;

impl Vocabulary {
    /// A vocabulary with no declarations.
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn new(predicates: HashMap<Iri, PredicateDef>) -> Self {
        Self { predicates }
    }

    pub fn get(&self, iri: &Iri) -> Option<&PredicateDef> {
        self.predicates.get(iri)
    }

    /// Declared range, `Range::Unknown` for undeclared predicates.
    pub fn range_of(&self, iri: &Iri) -> &Range {
        self.predicates.get(iri).map(|p| &p.range).unwrap_or(&UNKNOWN)
    }

    /// Declared cardinality, `One` for undeclared predicates.
    pub fn cardinality_of(&self, iri: &Iri) -> Cardinality {
        self.predicates
            .get(iri)
            .map(|p| p.cardinality)
            .unwrap_or_default()
    }

    pub fn is_many(&self, iri: &Iri) -> bool {
        self.cardinality_of(iri) == Cardinality::Many
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PredicateDef> {
        self.predicates.values()
    }
}
