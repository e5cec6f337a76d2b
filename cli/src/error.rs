//! CLI errors.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Usage(String),

    #[error(transparent)]
    Parse(#[from] weft_parser::ParseError),

    #[error(transparent)]
    Analysis(#[from] weft_analyzer::AnalyzerError),

    #[error(transparent)]
    Synthesis(#[from] weft_synthesizer::SynthError),

    #[error(transparent)]
    Registry(#[from] weft_registry::RegistryError),

    #[error(transparent)]
    Session(#[from] weft_session::SessionError),
}

impl CliError {
    pub fn usage(message: impl Into<String>) -> Self {
        CliError::Usage(message.into())
    }
}

pub type CliResult<T> = Result<T, CliError>;
