//! Handler for `shelf search`.

use console::Style;
use miette::Result;

use shelf_ops::context::Context;
use shelf_ops::ops_search;

pub fn exec(ctx: &Context, query: &str) -> Result<()> {
    let hits = ops_search::search(ctx, query)?;
    if hits.is_empty() {
        println!("No libraries match `{query}`.");
        return Ok(());
    }

    let bold = Style::new().bold();
    let dim = Style::new().dim();
    for hit in &hits {
        let installed = hit
            .installed
            .as_ref()
            .map(|v| format!(" [installed {v}]"))
            .unwrap_or_default();
        println!(
            "{} ({}){installed}",
            bold.apply_to(&hit.name),
            hit.versions.join(", ")
        );
        if !hit.description.is_empty() {
            println!("    {}", dim.apply_to(&hit.description));
        }
    }
    Ok(())
}
