//! `qae` - JSON-in/JSON-out command surface over the authoring engine
//!
//! Results go to stdout as pretty JSON; logs go to stderr, filtered by
//! `RUST_LOG` (default `info`).

mod cli;

use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let matches = cli::build_cli().get_matches();
    cli::run(&matches)
}
