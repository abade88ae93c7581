//! `hca show` -- one entity, its neighbours and its lineage.

use anyhow::{Context, Result, anyhow};
use hca_metadata::{Bundle, Entity};
use serde::Serialize;
use uuid::Uuid;

use crate::cli::ShowArgs;
use crate::context::RuntimeContext;
use crate::output::{ENTITY_HEADERS, EntityView, entity_label, entity_views, output_json, output_table};

#[derive(Serialize)]
struct ShowView<'a> {
    entity: &'a Entity,
    parents: Vec<EntityView>,
    children: Vec<EntityView>,
    ancestors: Vec<EntityView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    descendants: Option<Vec<EntityView>>,
}

fn neighbours(bundle: &Bundle, ids: impl Iterator<Item = Uuid>) -> Vec<EntityView> {
    entity_views(ids.filter_map(|id| bundle.entity(id)))
}

pub fn run(ctx: &RuntimeContext, args: &ShowArgs) -> Result<()> {
    let id: Uuid = args
        .id
        .parse()
        .with_context(|| format!("invalid document id {:?}", args.id))?;
    let bundle = ctx.load_bundle(&args.dir)?;
    let entity = bundle
        .entity(id)
        .ok_or_else(|| anyhow!("no entity with document id {id} in bundle {}", bundle.uuid()))?;

    let mut ancestors = Vec::new();
    bundle.ancestors(id, &mut |e: &Entity| ancestors.push(EntityView::from_entity(e)));

    let descendants = args.descendants.then(|| {
        let mut found = Vec::new();
        bundle.accept(id, &mut |e: &Entity| {
            if e.document_id() != id {
                found.push(EntityView::from_entity(e));
            }
        });
        found
    });

    let view = ShowView {
        entity,
        parents: neighbours(&bundle, entity.parent_ids()),
        children: neighbours(&bundle, entity.child_ids()),
        ancestors,
        descendants,
    };

    if ctx.json {
        output_json(&view)?;
        return Ok(());
    }

    println!("{}", entity.address());
    println!("  Label:    {}", entity_label(entity));
    println!("  Category: {}", entity.category());
    match entity.version() {
        Some(version) => println!("  Version:  {version}"),
        None => println!("  Version:  (unversioned)"),
    }

    let sections = [
        ("Parents", Some(&view.parents)),
        ("Children", Some(&view.children)),
        ("Ancestors", Some(&view.ancestors)),
        ("Descendants", view.descendants.as_ref()),
    ];
    for (title, views) in sections {
        let Some(views) = views else {
            continue;
        };
        if views.is_empty() {
            continue;
        }
        println!();
        println!("{title}:");
        let rows: Vec<Vec<String>> = views.iter().map(EntityView::row).collect();
        output_table(&ENTITY_HEADERS, &rows);
    }
    Ok(())
}
