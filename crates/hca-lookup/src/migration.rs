//! Property migrations: the record of which properties were renamed in
//! which schema version.
//!
//! The facts themselves come from an external authority. [`MigrationTable`]
//! is an in-memory authority built from the authority's published
//! `{"migrations": [...]}` document.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::version::SchemaVersion;

/// One published property rename.
///
/// `source_schema.property` was replaced by `target_schema.replaced_by` in
/// the schema version `effective_from`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyMigration {
    pub source_schema: String,
    pub property: String,
    pub target_schema: String,
    pub replaced_by: String,
    pub effective_from: SchemaVersion,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reason: String,

    /// Migration kind, e.g. `"renamed property"` (serialised as "type").
    #[serde(default, rename = "type", skip_serializing_if = "String::is_empty")]
    pub migration_type: String,
}

impl PropertyMigration {
    /// The fully-qualified key before the migration.
    pub fn old_key(&self) -> String {
        format!("{}.{}", self.source_schema, self.property)
    }

    /// The fully-qualified key after the migration.
    pub fn new_key(&self) -> String {
        format!("{}.{}", self.target_schema, self.replaced_by)
    }
}

/// A source of truth for property renames across schema versions.
pub trait MigrationAuthority {
    /// Returns the key under which `key` is stored in a document written
    /// against `version`, or `None` if the authority has no opinion.
    fn translate(&self, key: &str, version: &SchemaVersion) -> Option<String>;
}

/// Errors raised while loading a migration table.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("failed to read migration table: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse migration table: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Deserialize)]
struct MigrationDocument {
    migrations: Vec<PropertyMigration>,
}

/// An in-memory [`MigrationAuthority`].
///
/// Renames are applied in both directions: a document older than
/// `effective_from` is read under the old key, a newer one under the new
/// key. A rename of a property also renames every key nested below it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationTable {
    migrations: Vec<PropertyMigration>,
}

impl MigrationTable {
    pub fn new(migrations: Vec<PropertyMigration>) -> Self {
        Self { migrations }
    }

    /// Parses a migration table from the authority's JSON document.
    pub fn from_json(json: &str) -> Result<Self, MigrationError> {
        let doc: MigrationDocument = serde_json::from_str(json)?;
        Ok(Self::new(doc.migrations))
    }

    /// Loads a migration table from a JSON file.
    pub fn load(path: &Path) -> Result<Self, MigrationError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn migrations(&self) -> &[PropertyMigration] {
        &self.migrations
    }

    pub fn is_empty(&self) -> bool {
        self.migrations.is_empty()
    }

    /// Translates `key` once, trying the longest prefix first.
    fn translate_once(&self, key: &str, version: &SchemaVersion) -> Option<String> {
        let segments: Vec<&str> = key.split('.').collect();
        // A prefix needs a schema name and at least one property.
        for split in (2..=segments.len()).rev() {
            let prefix = segments[..split].join(".");
            if let Some(replacement) = self.translate_exact(&prefix, version) {
                let rest = &segments[split..];
                if rest.is_empty() {
                    return Some(replacement);
                }
                return Some(format!("{}.{}", replacement, rest.join(".")));
            }
        }
        None
    }

    fn translate_exact(&self, prefix: &str, version: &SchemaVersion) -> Option<String> {
        self.migrations.iter().find_map(|m| {
            if *version < m.effective_from && prefix == m.new_key() {
                Some(m.old_key())
            } else if *version >= m.effective_from && prefix == m.old_key() {
                Some(m.new_key())
            } else {
                None
            }
        })
    }
}

impl MigrationAuthority for MigrationTable {
    fn translate(&self, key: &str, version: &SchemaVersion) -> Option<String> {
        // Follow chains of renames; the bound guards against cyclic tables.
        let mut current = self.translate_once(key, version)?;
        for _ in 0..self.migrations.len() {
            match self.translate_once(&current, version) {
                Some(next) if next != current && next != key => current = next,
                _ => break,
            }
        }
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const TABLE: &str = r#"{
        "migrations": [
            {
                "source_schema": "cell_suspension",
                "property": "selected_cell_type",
                "target_schema": "cell_suspension",
                "replaced_by": "selected_cell_types",
                "effective_from": "13.0.0",
                "reason": "Schema consistency update",
                "type": "renamed property"
            },
            {
                "source_schema": "donor_organism",
                "property": "age",
                "target_schema": "donor_organism",
                "replaced_by": "organism_age",
                "effective_from": "5.0.0",
                "type": "renamed property"
            },
            {
                "source_schema": "donor_organism",
                "property": "organism_age",
                "target_schema": "donor_organism",
                "replaced_by": "donor_age",
                "effective_from": "20.0.0",
                "type": "renamed property"
            }
        ]
    }"#;

    fn table() -> MigrationTable {
        MigrationTable::from_json(TABLE).unwrap()
    }

    #[test]
    fn parse_published_document() {
        let t = table();
        assert_eq!(t.migrations().len(), 3);
        let m = &t.migrations()[0];
        assert_eq!(m.effective_from, SchemaVersion::new(13, 0, 0));
        assert_eq!(m.migration_type, "renamed property");
        assert_eq!(m.old_key(), "cell_suspension.selected_cell_type");
        assert_eq!(m.new_key(), "cell_suspension.selected_cell_types");
    }

    #[test]
    fn current_key_maps_to_old_name_in_old_documents() {
        let t = table();
        assert_eq!(
            t.translate("cell_suspension.selected_cell_types", &SchemaVersion::new(12, 0, 0)),
            Some("cell_suspension.selected_cell_type".to_string())
        );
        assert_eq!(
            t.translate("cell_suspension.selected_cell_types", &SchemaVersion::new(13, 1, 1)),
            None
        );
    }

    #[test]
    fn old_key_maps_forward_in_new_documents() {
        let t = table();
        assert_eq!(
            t.translate("cell_suspension.selected_cell_type", &SchemaVersion::new(13, 1, 1)),
            Some("cell_suspension.selected_cell_types".to_string())
        );
    }

    #[test]
    fn nested_keys_follow_the_renamed_prefix() {
        let t = table();
        assert_eq!(
            t.translate(
                "cell_suspension.selected_cell_type.text",
                &SchemaVersion::new(13, 1, 1)
            ),
            Some("cell_suspension.selected_cell_types.text".to_string())
        );
    }

    #[test]
    fn chained_renames() {
        let t = table();
        assert_eq!(
            t.translate("donor_organism.donor_age", &SchemaVersion::new(4, 0, 0)),
            Some("donor_organism.age".to_string())
        );
        assert_eq!(
            t.translate("donor_organism.age", &SchemaVersion::new(21, 0, 0)),
            Some("donor_organism.donor_age".to_string())
        );
    }

    #[test]
    fn unknown_key_has_no_opinion() {
        assert_eq!(
            table().translate("project.project_core.project_title", &SchemaVersion::new(1, 0, 0)),
            None
        );
    }

    #[test]
    fn malformed_document_is_an_error() {
        assert!(matches!(
            MigrationTable::from_json(r#"{"migrations": [{"property": "x"}]}"#),
            Err(MigrationError::Parse(_))
        ));
    }
}
