//! Operation: refresh the local copy of the remote index.

use shelf_catalog::fetch::IndexFetcher;

use crate::context::Context;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateSummary {
    /// Whether a new copy was downloaded.
    pub fetched: bool,
    /// Distinct library names in the index afterwards.
    pub libraries: usize,
}

/// `shelf update [--force]`.
pub fn update(ctx: &Context, fetcher: &dyn IndexFetcher, force: bool) -> miette::Result<UpdateSummary> {
    let sp = shelf_util::progress::spinner("Updating index...");
    let fetched = ctx.refresh_index(fetcher, force);
    sp.finish_and_clear();
    let fetched = fetched?;

    let libraries = ctx.remote_catalog()?.len();
    if fetched {
        shelf_util::progress::status("Updated", &format!("index ({libraries} libraries)"));
    } else {
        shelf_util::progress::status_info(
            "Fresh",
            &format!(
                "index is less than {} hours old; use --force to update anyway",
                ctx.config.index.refresh_hours
            ),
        );
    }
    Ok(UpdateSummary { fetched, libraries })
}
