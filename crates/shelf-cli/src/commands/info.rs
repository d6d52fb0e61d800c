//! Handler for `shelf info`.

use miette::Result;

use shelf_ops::context::Context;
use shelf_ops::ops_info;

pub fn exec(ctx: &Context, library: &str) -> Result<()> {
    let info = ops_info::info(ctx, library)?;
    print!("{}", info.render());
    Ok(())
}
