//! Handler for `shelf install`.

use std::sync::Arc;

use miette::Result;

use shelf_catalog::fetch::HttpFetcher;
use shelf_ops::context::Context;
use shelf_ops::ops_install::{self, InstallOptions};

pub fn exec(ctx: &Context, libraries: &[String], force: bool, reinstall: bool) -> Result<()> {
    let refs = super::parse_refs(libraries)?;
    let fetcher = HttpFetcher::new()?.with_progress(super::interactive());

    let outcomes = ops_install::install(
        ctx,
        &fetcher,
        Arc::new(fetcher.clone()),
        &refs,
        InstallOptions { force, reinstall },
    )?;

    let changed = outcomes.iter().filter(|o| o.changed()).count();
    if changed > 0 {
        shelf_util::progress::status(
            "Finished",
            &format!(
                "{changed} {} into {}",
                if changed == 1 { "library" } else { "libraries" },
                ctx.layout.libraries_dir().display()
            ),
        );
    }
    Ok(())
}
