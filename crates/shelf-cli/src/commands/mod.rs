//! Command dispatch and handler modules.

mod info;
mod install;
mod list;
mod remove;
mod search;
mod tree;
mod update;

use miette::Result;

use shelf_core::reference::LibraryRef;
use shelf_ops::context::Context;

use crate::cli::{Cli, Command};

/// Route a parsed CLI invocation to the appropriate command handler.
pub fn dispatch(cli: Cli) -> Result<()> {
    let ctx = Context::load()?;
    tracing::debug!("Using data directory {}", ctx.layout.data_dir().display());

    match cli.command {
        Command::Update { force } => update::exec(&ctx, force),
        Command::Install {
            libraries,
            force,
            reinstall,
        } => install::exec(&ctx, &libraries, force, reinstall),
        Command::Remove { names } => remove::exec(&ctx, &names),
        Command::Search { query } => search::exec(&ctx, &query),
        Command::Info { library } => info::exec(&ctx, &library),
        Command::List => list::exec(&ctx),
        Command::Tree { libraries } => tree::exec(&ctx, &libraries),
    }
}

/// Parse every command-line library reference, failing on the first bad one.
fn parse_refs(raw: &[String]) -> Result<Vec<LibraryRef>> {
    raw.iter()
        .map(|r| LibraryRef::parse(r).map_err(Into::into))
        .collect()
}

/// Only draw progress bars when someone is watching.
fn interactive() -> bool {
    console::Term::stderr().features().is_attended()
}
