//! The `weft` binary.

use clap::Parser;
use tracing_subscriber::EnvFilter;
use weft_cli::{run, Cli};

fn init_tracing(verbose: bool) {
    // RUST_LOG wins; otherwise info for weft crates, debug with --verbose.
    let default = if verbose { "weft=debug" } else { "weft=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(output) => print!("{}", output),
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    }
}
