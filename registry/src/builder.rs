//! VocabularyBuilder for constructing an immutable Vocabulary.

use crate::{Cardinality, PredicateDef, Range, Vocabulary};
use std::collections::HashMap;
use thiserror::Error;
use weft_core::{CoreError, Datatype, Iri};

/// Errors that can occur while building a vocabulary or reading configuration.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Duplicate predicate: {0}")]
    DuplicatePredicate(String),

    #[error("Predicate {0} declares both an entity range and a datatype")]
    ConflictingRange(String),

    #[error("Unknown datatype tag: {0}")]
    UnknownDatatype(String),

    #[error("Unknown multiplicity '{0}' (expected 1, ? or *)")]
    UnknownMultiplicity(String),

    #[error("Undeclared prefix in '{0}'")]
    UndeclaredPrefix(String),

    #[error(transparent)]
    InvalidTerm(#[from] CoreError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] serde_json::Error),
}

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Builder for constructing an immutable Vocabulary.
#[derive(Debug, Default)]
pub struct VocabularyBuilder {
    predicates: HashMap<Iri, PredicateDef>,
}

impl VocabularyBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a predicate definition.
    pub fn add_predicate(&mut self, iri: Iri) -> PredicateBuilder<'_> {
        PredicateBuilder {
            builder: self,
            def: PredicateDef::new(iri),
        }
    }

    /// Build the immutable Vocabulary.
    pub fn build(self) -> RegistryResult<Vocabulary> {
        Ok(Vocabulary::new(self.predicates))
    }
}

/// Builder for one predicate definition.
pub struct PredicateBuilder<'a> {
    builder: &'a mut VocabularyBuilder,
    def: PredicateDef,
}

impl<'a> PredicateBuilder<'a> {
    /// Objects are entities of the given class.
    pub fn entity(mut self, class_tag: impl Into<String>) -> Self {
        self.def.range = Range::Entity(class_tag.into());
        self
    }

    /// Objects are literals of the given datatype.
    pub fn literal(mut self, datatype: Datatype) -> Self {
        self.def.range = Range::Literal(datatype);
        self
    }

    /// Mark as a one-to-many relation.
    pub fn many(mut self) -> Self {
        self.def.cardinality = Cardinality::Many;
        self
    }

    pub fn cardinality(mut self, cardinality: Cardinality) -> Self {
        self.def.cardinality = cardinality;
        self
    }

    /// Finish building this predicate.
    pub fn done(self) -> RegistryResult<()> {
        if self.builder.predicates.contains_key(&self.def.iri) {
            return Err(RegistryError::DuplicatePredicate(
                self.def.iri.as_str().to_string(),
            ));
        }
        self.builder
            .predicates
            .insert(self.def.iri.clone(), self.def);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bk(local: &str) -> Iri {
        Iri::new(format!("http://example.org/bike#{}", local)).unwrap()
    }

    #[test]
    fn test_lookup_declared_predicate() {
        // GIVEN a vocabulary declaring frontWheel as one-to-many Wheel
        let mut builder = VocabularyBuilder::new();
        builder
            .add_predicate(bk("frontWheel"))
            .entity("Wheel")
            .many()
            .done()
            .unwrap();
        let vocab = builder.build().unwrap();

        // WHEN looking it up
        let def = vocab.get(&bk("frontWheel"));

        // THEN range and cardinality are as declared
        let def = def.unwrap();
        assert_eq!(def.range, Range::Entity("Wheel".into()));
        assert!(def.is_many());
        assert!(vocab.is_many(&bk("frontWheel")));
    }

    #[test]
    fn test_undeclared_predicate_defaults() {
        // GIVEN an empty vocabulary
        let vocab = Vocabulary::empty();

        // WHEN asking about any predicate
        // THEN range is unknown and cardinality is one
        assert_eq!(vocab.range_of(&bk("mfgDate")), &Range::Unknown);
        assert_eq!(vocab.cardinality_of(&bk("mfgDate")), Cardinality::One);
        assert!(vocab.is_empty());
    }

    #[test]
    fn test_duplicate_predicate_rejected() {
        // GIVEN a builder with mfgDate declared
        let mut builder = VocabularyBuilder::new();
        builder
            .add_predicate(bk("mfgDate"))
            .literal(Datatype::Integer)
            .done()
            .unwrap();

        // WHEN declaring it again
        let result = builder.add_predicate(bk("mfgDate")).done();

        // THEN DuplicatePredicate error
        assert!(matches!(result, Err(RegistryError::DuplicatePredicate(iri)) if iri.ends_with("mfgDate")));
    }
}
