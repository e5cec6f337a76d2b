//! Command implementations. Each returns the text to print.

use crate::cli::{Cli, Commands, QueryArgs};
use crate::format;
use crate::{CliError, CliResult};
use std::fs;
use std::path::Path;
use tracing::debug;
use weft_analyzer::analyze;
use weft_parser::{parse_query, SelectQuery};
use weft_registry::{ClassConfig, Vocabulary};
use weft_session::EntityClass;
use weft_synthesizer::QuerySynthesizer;

pub fn run(cli: &Cli) -> CliResult<String> {
    match &cli.command {
        Commands::Analyze(args) => {
            let (query, anchor, vocabulary) = prepare(args)?;
            analyze_query(&query, &anchor, &vocabulary)
        }
        Commands::Synthesize(args) => {
            let (query, anchor, vocabulary) = prepare(args)?;
            synthesize_query(&query, &anchor, &vocabulary)
        }
        Commands::Classes { file, vocab } => {
            let vocabulary = load_vocabulary(vocab.as_deref())?;
            compile_classes(&read_file(file)?, &vocabulary)
        }
    }
}

fn read_file(path: &Path) -> CliResult<String> {
    fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn load_vocabulary(path: Option<&Path>) -> CliResult<Vocabulary> {
    match path {
        Some(path) => Ok(Vocabulary::from_json(&read_file(path)?)?),
        None => Ok(Vocabulary::empty()),
    }
}

fn prepare(args: &QueryArgs) -> CliResult<(SelectQuery, String, Vocabulary)> {
    let text = match args.query.strip_prefix('@') {
        Some(path) => read_file(Path::new(path))?,
        None => args.query.clone(),
    };
    let (query, anchor) = parse_with(&text, args.anchor.as_deref(), &args.prefixes)?;
    let vocabulary = load_vocabulary(args.vocab.as_deref())?;
    Ok((query, anchor, vocabulary))
}

/// Parse `text` with extra `NAME=IRI` prefixes and resolve the anchor.
fn parse_with(
    text: &str,
    anchor: Option<&str>,
    prefixes: &[String],
) -> CliResult<(SelectQuery, String)> {
    let mut source = String::new();
    for prefix in prefixes {
        let (name, iri) = prefix
            .split_once('=')
            .ok_or_else(|| CliError::usage(format!("expected NAME=IRI, got '{}'", prefix)))?;
        source.push_str(&format!("PREFIX {}: <{}>\n", name, iri));
    }
    source.push_str(text);

    let query = parse_query(&source)?;
    let anchor = match anchor {
        Some(anchor) => anchor.trim_start_matches('?').to_string(),
        None => query
            .projected_variables()
            .into_iter()
            .next()
            .ok_or_else(|| CliError::usage("query projects no variables"))?,
    };
    debug!(anchor = %anchor, "parsed query");
    Ok((query, anchor))
}

fn analyze_query(query: &SelectQuery, anchor: &str, vocabulary: &Vocabulary) -> CliResult<String> {
    let analysis = analyze(query, anchor, vocabulary)?;
    Ok(format::analysis(&analysis))
}

fn synthesize_query(
    query: &SelectQuery,
    anchor: &str,
    vocabulary: &Vocabulary,
) -> CliResult<String> {
    let synthesizer = QuerySynthesizer::from_query(query, anchor, vocabulary)?;
    let creation = synthesizer.base_creation_update();
    let initializers = synthesizer.initializer_updates();
    Ok(format::templates(
        std::iter::once(&creation).chain(initializers.iter()),
    ))
}

fn compile_classes(json: &str, vocabulary: &Vocabulary) -> CliResult<String> {
    let mut out = String::new();
    for (name, config) in ClassConfig::map_from_json(json)? {
        let class = EntityClass::from_config(name, &config, vocabulary)?;
        out.push_str(&format::class(&class));
    }
    Ok(out)
}
