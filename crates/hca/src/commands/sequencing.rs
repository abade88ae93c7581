//! `hca sequencing` -- the sequenced biomaterials and the resulting files.

use anyhow::Result;
use serde::Serialize;

use crate::cli::BundleArgs;
use crate::context::RuntimeContext;
use crate::output::{EntityView, entity_views, output_entities, output_json};

#[derive(Serialize)]
struct SequencingView {
    input: Vec<EntityView>,
    output: Vec<EntityView>,
}

pub fn run(ctx: &RuntimeContext, args: &BundleArgs) -> Result<()> {
    let bundle = ctx.load_bundle(&args.dir)?;
    let view = SequencingView {
        input: entity_views(bundle.sequencing_input()),
        output: entity_views(bundle.sequencing_output()),
    };

    if ctx.json {
        output_json(&view)?;
        return Ok(());
    }

    println!("Sequencing input:");
    output_entities(false, &view.input, "  (none)")?;
    println!();
    println!("Sequencing output:");
    output_entities(false, &view.output, "  (none)")?;
    Ok(())
}
