//! Handler for `shelf update`.

use miette::Result;

use shelf_catalog::fetch::HttpFetcher;
use shelf_ops::context::Context;
use shelf_ops::ops_update;

pub fn exec(ctx: &Context, force: bool) -> Result<()> {
    let fetcher = HttpFetcher::new()?;
    ops_update::update(ctx, &fetcher, force)?;
    Ok(())
}
