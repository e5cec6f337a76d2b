//! Weft integration test support.
//!
//! Fixtures shared by the scenarios under `tests/`: the bike vocabulary and
//! class, a seeded store, and a store whose updates can be made to fail.

mod fixtures;
mod store;

pub use fixtures::*;
pub use store::FlakyStore;

/// Everything a scenario usually needs.
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::store::FlakyStore;
    pub use std::sync::Arc;
    pub use weft_analyzer::{analyze, AnalyzerError, QueryAnalysis};
    pub use weft_core::{Iri, Literal, Term, Triple};
    pub use weft_journal::{ChangeNode, Journal, JournalError};
    pub use weft_parser::parse_query;
    pub use weft_registry::{Vocabulary, VocabularyBuilder};
    pub use weft_session::{
        EntityClass, EntityHandle, EntityInit, SequentialSuffixes, Session, SessionError, Slot,
    };
    pub use weft_store::{GraphStore, MemoryStore};
    pub use weft_synthesizer::{QuerySynthesizer, SynthError};
}
