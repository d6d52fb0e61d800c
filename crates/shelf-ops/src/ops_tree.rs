//! Operation: show what installing a set of references would pin.

use shelf_core::constraint::Requirement;
use shelf_core::reference::LibraryRef;
use shelf_resolver::graph::Resolution;
use shelf_resolver::resolver;
use shelf_util::errors::ShelfError;

use crate::context::Context;

/// `shelf tree <ref>...`: resolve against the downloaded index without installing.
pub fn tree(ctx: &Context, refs: &[LibraryRef]) -> miette::Result<Resolution> {
    let remote = ctx.remote_catalog()?;
    let roots = refs
        .iter()
        .map(|r| Ok((r.name.clone(), r.requirement()?)))
        .collect::<Result<Vec<(String, Requirement)>, ShelfError>>()?;
    Ok(resolver::resolve_all(&remote, &roots)?)
}
