//! Handler for `shelf tree`.

use miette::Result;

use shelf_ops::context::Context;
use shelf_ops::ops_tree;

pub fn exec(ctx: &Context, libraries: &[String]) -> Result<()> {
    let refs = super::parse_refs(libraries)?;
    let resolution = ops_tree::tree(ctx, &refs)?;
    print!("{}", resolution.print_tree());
    Ok(())
}
