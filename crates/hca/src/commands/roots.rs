//! `hca roots` -- list linked entities without parents.

use anyhow::Result;

use crate::cli::BundleArgs;
use crate::context::RuntimeContext;
use crate::output::{entity_views, output_entities};

pub fn run(ctx: &RuntimeContext, args: &BundleArgs) -> Result<()> {
    let bundle = ctx.load_bundle(&args.dir)?;
    let roots = bundle.root_entities();
    let views = entity_views(roots.values().copied());
    output_entities(ctx.json, &views, "No root entities.")?;
    Ok(())
}
