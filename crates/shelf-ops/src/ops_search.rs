//! Operation: search the remote index by name pattern and constraint.

use globset::{Glob, GlobMatcher};

use shelf_catalog::catalog::Catalog;
use shelf_catalog::local::LocalCatalog;
use shelf_catalog::remote::RemoteCatalog;
use shelf_core::library::LibraryRecord;
use shelf_core::reference::LibraryRef;
use shelf_util::errors::ShelfError;

use crate::context::Context;

/// One library matching a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub name: String,
    /// Matching versions, newest first.
    pub versions: Vec<String>,
    /// Short description of the newest matching version.
    pub description: String,
    /// Installed version, if any.
    pub installed: Option<String>,
}

/// `shelf search <pattern>[constraint]`.
///
/// The name part may use `*`, `?` and `[...]` globs; a name without glob
/// characters matches only itself.
pub fn search(ctx: &Context, query: &str) -> miette::Result<Vec<SearchHit>> {
    let remote = ctx.remote_catalog()?;
    Ok(search_catalogs(&remote, &ctx.local_catalog(), query)?)
}

pub fn search_catalogs(
    remote: &RemoteCatalog,
    local: &LocalCatalog,
    query: &str,
) -> Result<Vec<SearchHit>, ShelfError> {
    let reference = LibraryRef::parse(query)?;
    let requirement = reference.requirement()?;
    let matcher = compile(&reference.name)?;

    let mut hits = Vec::new();
    for name in remote.names()? {
        if !matcher.is_match(&name) {
            continue;
        }
        let records = remote.search(&name, &requirement)?;
        let Some(newest) = records.first() else {
            continue;
        };
        hits.push(SearchHit {
            description: newest.manifest.library.short_description.clone(),
            versions: records.iter().map(|r| r.version().to_string()).collect(),
            installed: local
                .installed_record(&name)?
                .map(|r| r.version().to_string()),
            name,
        });
    }
    tracing::debug!("Search `{query}` matched {} libraries", hits.len());
    Ok(hits)
}

fn compile(pattern: &str) -> Result<GlobMatcher, ShelfError> {
    Glob::new(pattern)
        .map(|g| g.compile_matcher())
        .map_err(|e| ShelfError::Generic {
            message: format!("Invalid search pattern `{pattern}`: {e}"),
        })
}
