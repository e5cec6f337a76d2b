//! Synthesizer error types.

use thiserror::Error;
use weft_analyzer::AnalyzerError;

/// Errors raised while generating or binding update templates.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SynthError {
    /// The variable has no descriptor.
    #[error("Unknown variable '?{variable}'")]
    UnknownVariable { variable: String },

    /// The variable is not linked to the anchor by a single predicate.
    #[error("Variable '?{variable}' has no direct predicate from the anchor")]
    UnanchoredVariable { variable: String },

    /// A template slot had no value at bind time.
    #[error("Template '{template}' is missing parameter '{parameter}'")]
    MissingParameter { template: String, parameter: String },

    #[error(transparent)]
    Analysis(#[from] AnalyzerError),
}

impl SynthError {
    pub fn unknown_variable(variable: impl Into<String>) -> Self {
        Self::UnknownVariable {
            variable: variable.into(),
        }
    }

    pub fn unanchored_variable(variable: impl Into<String>) -> Self {
        Self::UnanchoredVariable {
            variable: variable.into(),
        }
    }

    pub fn missing_parameter(template: impl Into<String>, parameter: impl Into<String>) -> Self {
        Self::MissingParameter {
            template: template.into(),
            parameter: parameter.into(),
        }
    }
}

/// Result type for synthesizer operations.
pub type SynthResult<T> = Result<T, SynthError>;
