//! Handler for `shelf list`.

use miette::Result;

use shelf_core::library::LibraryRecord;
use shelf_ops::context::Context;
use shelf_ops::ops_list;

pub fn exec(ctx: &Context) -> Result<()> {
    let installed = ops_list::list(ctx)?;
    if installed.is_empty() {
        println!("No libraries installed.");
        return Ok(());
    }

    let width = installed.iter().map(|r| r.name().len()).max().unwrap_or(0);
    for record in &installed {
        println!(
            "{:<width$}  {}  {}",
            record.name(),
            record.version(),
            record.location.display()
        );
    }
    Ok(())
}
