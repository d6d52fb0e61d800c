//! Shelf CLI binary.
//!
//! This is the entry point for the `shelf` command-line tool. It initializes
//! logging via `tracing`, parses arguments with `clap`, and dispatches to
//! the appropriate command handler.
//!
//! `main` stays synchronous: downloads go through a blocking HTTP client,
//! and commands that install in parallel start their own runtime.

mod cli;
mod commands;

use miette::Result;
use tracing_subscriber::EnvFilter;

/// Log filter applied by `--verbose` when `RUST_LOG` is not set.
const VERBOSE_FILTER: &str =
    "warn,shelf_core=debug,shelf_catalog=debug,shelf_resolver=debug,shelf_ops=debug";

fn main() -> Result<()> {
    let args = cli::parse();

    let default_filter = if args.verbose { VERBOSE_FILTER } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    commands::dispatch(args)
}
