//! Handler for `shelf remove`.

use miette::Result;

use shelf_ops::context::Context;
use shelf_ops::ops_remove;

pub fn exec(ctx: &Context, names: &[String]) -> Result<()> {
    ops_remove::remove(ctx, names)?;
    Ok(())
}
