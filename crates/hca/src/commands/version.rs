//! `hca version` -- crate version and the schema knowledge built into it.

use std::path::PathBuf;

use anyhow::Result;
use hca_lookup::CURATED_OVERRIDES;
use hca_metadata::EntityKind;
use serde::Serialize;

use crate::context::RuntimeContext;
use crate::output::output_json;

#[derive(Debug, Serialize)]
struct VersionInfo {
    version: &'static str,
    /// Number of concrete schemas the entity registry recognizes.
    schemas: usize,
    /// Built-in property renames.
    curated_overrides: usize,
    overrides_enabled: bool,
    /// Configured migration table, as written in the config.
    migration_table: Option<PathBuf>,
}

impl VersionInfo {
    fn new(ctx: &RuntimeContext) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            schemas: EntityKind::ALL.len(),
            curated_overrides: CURATED_OVERRIDES.len(),
            overrides_enabled: ctx.config.migrations.overrides,
            migration_table: ctx.config.migrations.path.clone(),
        }
    }

    fn lines(&self) -> Vec<String> {
        let overrides = if self.overrides_enabled { "enabled" } else { "disabled" };
        let table = match &self.migration_table {
            Some(path) => path.display().to_string(),
            None => "none".to_owned(),
        };
        vec![
            format!("hca {}", self.version),
            format!("schemas:           {}", self.schemas),
            format!("curated overrides: {} ({overrides})", self.curated_overrides),
            format!("migration table:   {table}"),
        ]
    }
}

pub fn run(ctx: &RuntimeContext) -> Result<()> {
    let info = VersionInfo::new(ctx);
    if ctx.json {
        return output_json(&info);
    }
    for line in info.lines() {
        println!("{line}");
    }
    Ok(())
}
