//! Weft CLI
//!
//! `weft analyze` prints what the analyzer derives for a query, `weft
//! synthesize` prints the update templates, and `weft classes` compiles a
//! class configuration file.

mod cli;
mod commands;
mod error;
mod format;

pub use cli::{Cli, Commands, QueryArgs};
pub use commands::run;
pub use error::{CliError, CliResult};
