//! `hca summary` -- bundle identity, entity counts and roots.

use anyhow::Result;
use hca_metadata::{Bundle, Category};
use indexmap::IndexMap;
use serde::Serialize;
use uuid::Uuid;

use crate::cli::BundleArgs;
use crate::context::RuntimeContext;
use crate::output::{EntityView, entity_views, output_json, output_table};

#[derive(Serialize)]
struct Summary {
    uuid: Uuid,
    version: String,
    files: usize,
    links: usize,
    entities: IndexMap<&'static str, usize>,
    projects: Vec<String>,
    roots: Vec<EntityView>,
    specimens: Vec<EntityView>,
}

impl Summary {
    fn new(bundle: &Bundle) -> Self {
        Self {
            uuid: bundle.uuid(),
            version: bundle.version().to_owned(),
            files: bundle.manifest().len(),
            links: bundle.links().len(),
            entities: Category::ALL
                .iter()
                .map(|c| (c.as_str(), bundle.by_category(*c).count()))
                .collect(),
            projects: bundle
                .projects()
                .filter_map(|e| e.as_project())
                .map(|p| p.short_name.clone())
                .collect(),
            roots: entity_views(bundle.root_entities().values().copied()),
            specimens: entity_views(bundle.specimens()),
        }
    }
}

pub fn run(ctx: &RuntimeContext, args: &BundleArgs) -> Result<()> {
    let bundle = ctx.load_bundle(&args.dir)?;
    let summary = Summary::new(&bundle);

    if ctx.json {
        output_json(&summary)?;
        return Ok(());
    }

    println!("Bundle:    {}", summary.uuid);
    println!("Version:   {}", summary.version);
    if !summary.projects.is_empty() {
        println!("Project:   {}", summary.projects.join(", "));
    }
    println!("Files:     {}", summary.files);
    println!("Links:     {}", summary.links);
    println!();

    let rows: Vec<Vec<String>> = summary
        .entities
        .iter()
        .map(|(category, count)| vec![category.to_string(), count.to_string()])
        .collect();
    output_table(&["CATEGORY", "COUNT"], &rows);

    println!();
    println!("Roots:     {}", labels(&summary.roots));
    println!("Specimens: {}", labels(&summary.specimens));
    Ok(())
}

fn labels(views: &[EntityView]) -> String {
    views
        .iter()
        .map(|v| format!("{} ({})", v.label, v.schema_name))
        .collect::<Vec<_>>()
        .join(", ")
}
