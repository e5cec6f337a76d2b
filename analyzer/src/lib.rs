//! Weft Analyzer
//!
//! Derives, for every projected variable of a SELECT query, whether it is
//! single-valued, optional, and literal- or entity-valued, relative to one
//! anchor variable that stands for the entity identity.

mod analyzer;
mod error;
mod scope;
mod types;

pub use analyzer::{analyze, Analyzer};
pub use error::{AnalyzerError, AnalyzerResult};
pub use scope::{OptionalId, OptionalPath};
pub use types::*;
