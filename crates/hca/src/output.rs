//! Output formatting helpers for the `hca` CLI.
//!
//! Provides JSON output, table formatting and a compact view of entities.

use std::io::{self, Write};

use anyhow::{Context, Result};
use hca_metadata::{Entity, EntityBody};
use serde::Serialize;
use uuid::Uuid;

/// A compact view of an entity for listings.
#[derive(Debug, Serialize)]
pub struct EntityView {
    pub document_id: Uuid,
    pub schema_name: &'static str,
    pub category: &'static str,
    /// The human-readable id: biomaterial/process/protocol id, file name or
    /// project short name.
    pub label: String,
}

impl EntityView {
    pub fn from_entity(entity: &Entity) -> Self {
        Self {
            document_id: entity.document_id(),
            schema_name: entity.schema_name(),
            category: entity.category().as_str(),
            label: entity_label(entity).to_string(),
        }
    }

    pub fn row(&self) -> Vec<String> {
        vec![
            self.document_id.to_string(),
            self.schema_name.to_string(),
            self.label.clone(),
        ]
    }
}

/// Headers matching [`EntityView::row`].
pub const ENTITY_HEADERS: [&str; 3] = ["DOCUMENT ID", "SCHEMA", "LABEL"];

pub fn entity_label(entity: &Entity) -> &str {
    match entity.body() {
        EntityBody::Project(p) => &p.short_name,
        EntityBody::Biomaterial(b) => &b.biomaterial_id,
        EntityBody::Process(p) => &p.process_id,
        EntityBody::Protocol(p) => &p.protocol_id,
        EntityBody::File(f) => &f.manifest_entry.name,
    }
}

pub fn entity_views<'a>(entities: impl IntoIterator<Item = &'a Entity>) -> Vec<EntityView> {
    entities.into_iter().map(EntityView::from_entity).collect()
}

/// Print entity views as JSON or as a table, with `empty` shown when
/// there is nothing to list in text mode.
pub fn output_entities(json: bool, views: &[EntityView], empty: &str) -> Result<()> {
    if json {
        return output_json(views);
    }
    if views.is_empty() {
        println!("{empty}");
    } else {
        let rows: Vec<Vec<String>> = views.iter().map(EntityView::row).collect();
        output_table(&ENTITY_HEADERS, &rows);
    }
    Ok(())
}

/// Pretty-print `value` as JSON on stdout.
pub fn output_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    match write_json(io::stdout().lock(), value) {
        Err(err) if is_broken_pipe(&err) => Ok(()),
        result => result,
    }
}

fn write_json<W: Write, T: Serialize + ?Sized>(mut out: W, value: &T) -> Result<()> {
    let mut json = serde_json::to_vec_pretty(value).context("failed to serialize JSON output")?;
    json.push(b'\n');
    out.write_all(&json)?;
    out.flush()?;
    Ok(())
}

/// A closed stdout (e.g. piped into `head`) is not an error.
fn is_broken_pipe(err: &anyhow::Error) -> bool {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<io::Error>())
        .any(|io_err| io_err.kind() == io::ErrorKind::BrokenPipe)
}

/// Print a simple table with headers and rows.
///
/// Column widths are computed from the data for alignment.
pub fn output_table(headers: &[&str], rows: &[Vec<String>]) {
    if rows.is_empty() {
        return;
    }

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let _ = handle.write_all(format_table(headers, rows).as_bytes());
}

fn format_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.len());
            }
        }
    }

    let mut out = String::new();
    let header: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    for line in std::iter::once(&header).chain(std::iter::once(&separator)).chain(rows) {
        let cells: Vec<String> = line
            .iter()
            .enumerate()
            .map(|(i, cell)| match widths.get(i) {
                Some(width) => format!("{:<width$}", cell, width = width),
                None => cell.clone(),
            })
            .collect();
        out.push_str(cells.join("  ").trim_end());
        out.push('\n');
    }
    out
}
