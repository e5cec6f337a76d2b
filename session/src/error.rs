//! Session error types.

use thiserror::Error;
use weft_core::{CoreError, Iri};

/// Session errors.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Parse error.
    #[error("parse error: {0}")]
    Parse(#[from] weft_parser::ParseError),

    /// Analysis error.
    #[error("analysis error: {0}")]
    Analysis(#[from] weft_analyzer::AnalyzerError),

    /// Template generation or binding error.
    #[error("synthesis error: {0}")]
    Synthesis(#[from] weft_synthesizer::SynthError),

    /// Class configuration error.
    #[error("configuration error: {0}")]
    Registry(#[from] weft_registry::RegistryError),

    /// Store query error.
    #[error("store error: {0}")]
    Store(#[from] weft_store::StoreError),

    /// Commit error, including `CommitFailure`.
    #[error("journal error: {0}")]
    Journal(#[from] weft_journal::JournalError),

    #[error("invalid term: {0}")]
    InvalidTerm(#[from] CoreError),

    #[error("class '{class}' has no property '{property}'")]
    UnknownProperty { class: String, property: String },

    /// Single-value accessor on a multi-valued property or the reverse.
    #[error("property '{property}' is not {expected}")]
    WrongMultiplicity {
        property: String,
        expected: &'static str,
    },

    #[error("property '{property}' expects {expected}, got {found}")]
    KindMismatch {
        property: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("property '{property}' is not nullable")]
    NullAssignment { property: String },

    #[error("missing value for mandatory property '{property}'")]
    MissingValue { property: String },

    #[error("entity {iri} is deleted")]
    MutationOnDeletedEntity { iri: String },

    #[error("entity {iri} not found")]
    EntityNotFound { iri: String },
}

impl SessionError {
    pub fn unknown_property(class: impl Into<String>, property: impl Into<String>) -> Self {
        Self::UnknownProperty {
            class: class.into(),
            property: property.into(),
        }
    }

    pub fn wrong_multiplicity(property: impl Into<String>, expected: &'static str) -> Self {
        Self::WrongMultiplicity {
            property: property.into(),
            expected,
        }
    }

    pub fn kind_mismatch(
        property: impl Into<String>,
        expected: &'static str,
        found: &'static str,
    ) -> Self {
        Self::KindMismatch {
            property: property.into(),
            expected,
            found,
        }
    }

    pub fn null_assignment(property: impl Into<String>) -> Self {
        Self::NullAssignment {
            property: property.into(),
        }
    }

    pub fn missing_value(property: impl Into<String>) -> Self {
        Self::MissingValue {
            property: property.into(),
        }
    }

    pub fn mutation_on_deleted_entity(iri: &Iri) -> Self {
        Self::MutationOnDeletedEntity {
            iri: iri.to_string(),
        }
    }

    pub fn entity_not_found(iri: &Iri) -> Self {
        Self::EntityNotFound {
            iri: iri.to_string(),
        }
    }
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;
