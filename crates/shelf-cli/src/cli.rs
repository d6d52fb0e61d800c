//! CLI argument definitions for shelf.
//!
//! Uses `clap` derive macros to define the full command surface. Each command
//! corresponds to a handler in the [`super::commands`] module.

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "shelf",
    version,
    about = "A library manager for versioned source libraries",
    long_about = "Shelf installs libraries published in a remote index, resolving their \
                  dependencies to one version per library and recording what is installed."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Download the remote index if it is out of date
    Update {
        /// Download even if the local copy is recent
        #[arg(short, long)]
        force: bool,
    },

    /// Install libraries and their dependencies
    Install {
        /// Libraries to install, optionally with a constraint (e.g. `gears>=1.2`)
        #[arg(required = true)]
        libraries: Vec<String>,
        /// Replace installed libraries of a different version
        #[arg(short, long)]
        force: bool,
        /// Install again even if the same version is installed
        #[arg(long)]
        reinstall: bool,
    },

    /// Remove installed libraries
    Remove {
        /// Names of the libraries to remove
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Search the remote index (names may contain `*` and `?`)
    Search {
        /// Name pattern, optionally with a constraint
        query: String,
    },

    /// Show details about a library in the remote index
    Info {
        /// Library name, optionally with a constraint
        library: String,
    },

    /// List installed libraries
    List,

    /// Show the versions an install would pin, as a tree
    Tree {
        /// Libraries to resolve, optionally with constraints
        #[arg(required = true)]
        libraries: Vec<String>,
    },
}

pub fn parse() -> Cli {
    Cli::parse()
}
