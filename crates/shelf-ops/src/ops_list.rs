//! Operation: list installed libraries.

use shelf_core::library::LocalLibrary;

use crate::context::Context;

/// `shelf list`: installed libraries sorted by name.
pub fn list(ctx: &Context) -> miette::Result<Vec<LocalLibrary>> {
    Ok(ctx.local_catalog().installed()?)
}
