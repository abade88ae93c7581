//! Property lookup for HCA metadata documents.
//!
//! Metadata documents are self-describing: each one names its schema in a
//! `describedBy` URL and the schema version either in a `schema_version`
//! field or as a segment of that URL. Property names change between schema
//! versions, so a logical key such as `cell_suspension.estimated_cell_count`
//! has to be translated to the name that was current when the document was
//! written before it can be resolved.
//!
//! The main entry point is [`PropertyResolver`]. For one-off lookups on
//! documents without version information, the free functions [`lookup`] and
//! [`lookup_or`] use a resolver with only the curated override rules.

pub mod migration;
pub mod ontology;
pub mod overrides;
pub mod path;
pub mod resolver;
pub mod version;

pub use migration::{MigrationAuthority, MigrationError, MigrationTable, PropertyMigration};
pub use ontology::{OntologyError, ontology_label, ontology_labels};
pub use overrides::{Applies, CURATED_OVERRIDES, OverrideRule};
pub use resolver::{LookupError, OptionalLookup, PropertyResolver, lookup, lookup_or};
pub use version::{SchemaVersion, VersionError, content, document_version, schema_name};
