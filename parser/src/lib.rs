//! Weft Parser
//!
//! This crate parses the SELECT query subset used to define entity classes:
//! - Prologue (`PREFIX`) and projection (`SELECT [DISTINCT] ?v … | *`)
//! - Group graph patterns: triples blocks, `OPTIONAL`, nested groups,
//!   `UNION`, `MINUS`, `FILTER`, `BIND`
//! - Filter expressions (`||`, `&&`, `!`, comparisons, `bound`, `EXISTS`)
//! - Error handling with location information

mod ast;
mod error;
mod lexer;
mod parser;

pub use ast::*;
pub use error::*;
pub use parser::{parse_expr, parse_query};
