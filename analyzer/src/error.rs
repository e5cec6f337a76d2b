//! Analyzer error types.

use thiserror::Error;

/// Setup-time failures. Analysis aborts on the first one; no partial result
/// is returned.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AnalyzerError {
    /// A construct whose cardinality cannot be derived.
    #[error("Unsupported pattern: {construct} ({detail})")]
    UnsupportedPattern { construct: String, detail: String },

    /// The anchor is not among the projected variables.
    #[error("Anchor variable '?{anchor}' is not projected by the query")]
    UnknownAnchor { anchor: String },

    /// A projected variable never occurs next to a concrete predicate.
    #[error("Cannot resolve a type for '?{variable}': it has no observed predicate")]
    UnresolvedType { variable: String },

    /// A variable bound in sibling optional blocks.
    #[error("Variable '?{variable}' is bound in several sibling OPTIONAL blocks")]
    AmbiguousOptionalBinding { variable: String },
}

impl AnalyzerError {
    pub fn unsupported_pattern(construct: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::UnsupportedPattern {
            construct: construct.into(),
            detail: detail.into(),
        }
    }

    pub fn unknown_anchor(anchor: impl Into<String>) -> Self {
        Self::UnknownAnchor {
            anchor: anchor.into(),
        }
    }

    pub fn unresolved_type(variable: impl Into<String>) -> Self {
        Self::UnresolvedType {
            variable: variable.into(),
        }
    }

    pub fn ambiguous_optional_binding(variable: impl Into<String>) -> Self {
        Self::AmbiguousOptionalBinding {
            variable: variable.into(),
        }
    }
}

/// Result type for analyzer operations.
pub type AnalyzerResult<T> = Result<T, AnalyzerError>;
