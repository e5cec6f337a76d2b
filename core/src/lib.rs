//! Weft Core Types
//!
//! This crate provides the foundational types used throughout Weft:
//! - RDF terms (Iri, Literal, Term) and datatypes
//! - Triples and triple patterns with variables
//! - The update IR replayed against a graph store
//! - Common error types

mod error;
mod term;
mod triple;
mod update;
pub mod vocab;

pub use error::*;
pub use term::*;
pub use triple::*;
pub use update::*;
