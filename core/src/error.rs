//! Core error types.

use thiserror::Error;

/// Errors raised while constructing terms.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoreError {
    /// The IRI is empty or contains characters that cannot appear in `<...>`.
    #[error("invalid IRI '{iri}'")]
    InvalidIri { iri: String },

    /// The lexical form is not valid for the datatype.
    #[error("invalid lexical form '{lexical}' for datatype {datatype}")]
    InvalidLiteral { lexical: String, datatype: String },
}

impl CoreError {
    pub fn invalid_iri(iri: impl Into<String>) -> Self {
        Self::InvalidIri { iri: iri.into() }
    }

    pub fn invalid_literal(lexical: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self::InvalidLiteral {
            lexical: lexical.into(),
            datatype: datatype.into(),
        }
    }
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
