//! Weft Registry
//!
//! Relation hints for query analysis: which predicates are entity-valued and
//! which are known to be one-to-many. The vocabulary is immutable after
//! construction via VocabularyBuilder or JSON configuration.

mod builder;
mod config;
mod types;
mod vocabulary;

pub use builder::{PredicateBuilder, RegistryError, RegistryResult, VocabularyBuilder};
pub use config::*;
pub use types::*;
pub use vocabulary::Vocabulary;
