use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "weft",
    about = "Analyze entity queries and synthesize their update templates",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Show debug logs (RUST_LOG takes precedence)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the descriptor table, dependencies and ambiguous variables
    Analyze(QueryArgs),

    /// Print the creation template and every initializer template
    Synthesize(QueryArgs),

    /// Compile every class of a JSON class configuration file
    Classes {
        /// Class configuration file
        file: PathBuf,

        /// Vocabulary JSON file with predicate hints
        #[arg(long)]
        vocab: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Query text, or @PATH to read it from a file
    pub query: String,

    /// Anchor variable (defaults to the first projected variable)
    #[arg(long)]
    pub anchor: Option<String>,

    /// Vocabulary JSON file with predicate hints
    #[arg(long)]
    pub vocab: Option<PathBuf>,

    /// Extra prefix declaration
    #[arg(long = "prefix", value_name = "NAME=IRI")]
    pub prefixes: Vec<String>,
}
