use std::fmt;
use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all shelf operations.
#[derive(Debug, Error, Diagnostic)]
pub enum ShelfError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A version or constraint string could not be parsed.
    #[error("Malformed constraint `{constraint}`: {reason}")]
    #[diagnostic(
        code(shelf::malformed_constraint),
        help("Constraints look like `1.2.0`, `=1.2.0`, `>=1.0`, `<2`, or `^1.4.0`")
    )]
    MalformedConstraint { constraint: String, reason: String },

    /// Two requirements on the same library cannot be met by a single version.
    #[error("Dependency resolution failed: {0}")]
    #[diagnostic(
        code(shelf::resolution_conflict),
        help("Relax one of the conflicting constraints; a library is pinned to a single version")
    )]
    ResolutionConflict(Box<ConflictDetail>),

    /// No version in the remote index satisfies a requirement.
    #[error("No version of `{name}` matching `{constraint}` found in the index")]
    #[diagnostic(
        code(shelf::not_found_in_index),
        help("Run `shelf update` to refresh the index, or `shelf search {name}` to list versions")
    )]
    NotFoundInIndex { name: String, constraint: String },

    /// A different version of the library is already installed.
    #[error("`{name}` {installed} is installed but {requested} was requested")]
    #[diagnostic(
        code(shelf::conflicting_version_installed),
        help("Pass --force to replace the installed version")
    )]
    ConflictingVersionInstalled {
        name: String,
        installed: String,
        requested: String,
    },

    /// The local index holds more than one record for one library.
    #[error("Local index is corrupted: {count} records found for `{name}`")]
    #[diagnostic(
        code(shelf::corrupted_local_catalog),
        help("Edit local_index.json so that each library appears once")
    )]
    CorruptedLocalCatalog { name: String, count: usize },

    /// A record for the library already exists in the local index.
    #[error("`{name}` {version} is already registered in the local index")]
    #[diagnostic(code(shelf::already_installed))]
    AlreadyInstalled { name: String, version: String },

    /// The library is not installed.
    #[error("No installed library named `{name}`")]
    #[diagnostic(code(shelf::not_installed))]
    NotInstalled { name: String },

    /// The remote index has never been downloaded.
    #[error("Remote index not found at {}", path.display())]
    #[diagnostic(code(shelf::index_missing), help("Run `shelf update` first"))]
    IndexMissing { path: PathBuf },

    /// A directory exists at the install location without a local index entry.
    #[error("Found files for `{name}` at {} that are not tracked by the local index", path.display())]
    #[diagnostic(
        code(shelf::orphan_install),
        help("Run `shelf remove {name}` or install again with --reinstall")
    )]
    OrphanInstall { name: String, path: PathBuf },

    /// A library name that cannot be used as a single directory name.
    #[error("Invalid library name `{name}`: {reason}")]
    #[diagnostic(
        code(shelf::invalid_library_name),
        help("Library names are plain directory names without `/`, `\\` or `..`")
    )]
    InvalidLibraryName { name: String, reason: String },

    /// A catalog document could not be read or written.
    #[error("Catalog error: {message}")]
    Catalog { message: String },

    /// Network request or download failed.
    #[error("Network error: {message}")]
    Network { message: String },

    /// An archive could not be unpacked.
    #[error("Archive error: {message}")]
    Archive { message: String },

    /// Invalid configuration file.
    #[error("Config error: {message}")]
    #[diagnostic(help("Check config.toml for syntax errors"))]
    Config { message: String },

    /// Catch-all for miscellaneous errors.
    #[error("{message}")]
    Generic { message: String },
}

/// Everything needed to explain a resolution conflict without re-running it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictDetail {
    /// The library that could not be pinned consistently.
    pub name: String,
    /// Version already chosen for the library.
    pub pinned: String,
    /// Requests the pinned version was chosen for.
    pub existing: Vec<RequestTrace>,
    /// The request the pinned version fails to satisfy.
    pub incoming: RequestTrace,
}

/// One requirement on a library together with the chain that asked for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTrace {
    /// Constraint text, `*` for "any version".
    pub constraint: String,
    /// Requesting libraries from the root request down to the direct requester.
    pub chain: Vec<String>,
}

impl RequestTrace {
    /// The library that made the request, if it was not a root request.
    pub fn requester(&self) -> Option<&str> {
        self.chain.last().map(String::as_str)
    }
}

impl fmt::Display for RequestTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.chain.is_empty() {
            write!(f, "`{}` (requested directly)", self.constraint)
        } else {
            write!(f, "`{}` (required by {})", self.constraint, self.chain.join(" -> "))
        }
    }
}

impl fmt::Display for ConflictDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}` is pinned to {} for ", self.name, self.pinned)?;
        for (i, req) in self.existing.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{req}")?;
        }
        write!(f, ", which does not satisfy {}", self.incoming)
    }
}

/// Convenience alias for `miette::Result<T>`.
pub type ShelfResult<T> = miette::Result<T>;
