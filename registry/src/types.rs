//! Predicate definition types.

use serde::{Deserialize, Serialize};
use weft_core::{Datatype, Iri};

/// What the objects of a predicate are.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Range {
    /// Entity-valued; carries the class tag of the referenced entities.
    Entity(String),
    /// Literal-valued with a known datatype.
    Literal(Datatype),
    /// No declaration.
    Unknown,
}

impl Range {
    pub fn is_entity(&self) -> bool {
        matches!(self, Range::Entity(_))
    }
}

/// How many objects one subject may have for a predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cardinality {
    /// At most one (the default assumption).
    #[default]
    One,
    /// Known one-to-many relation.
    Many,
}

/// Declared facts about one predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredicateDef {
    pub iri: Iri,
    pub range: Range,
    pub cardinality: Cardinality,
}

impl PredicateDef {
    pub fn new(iri: Iri) -> Self {
        Self {
            iri,
            range: Range::Unknown,
            cardinality: Cardinality::One,
        }
    }

    pub fn is_many(&self) -> bool {
        self.cardinality == Cardinality::Many
    }
}
