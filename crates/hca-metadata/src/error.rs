//! Error types for entity construction and bundle assembly.

use hca_lookup::{LookupError, OntologyError};
use uuid::Uuid;

use crate::link::Direction;

/// No entity type is registered for a document's schema URL.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no entity type for schema URL '{described_by}'")]
pub struct TypeLookupError {
    /// The full `describedBy` URL of the document.
    pub described_by: String,
}

/// Errors raised while wiring links between entities.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LinkError {
    /// The link names a relationship the domain model does not allow.
    #[error("{entity} cannot {} {other}", .direction.verb())]
    Disallowed {
        /// Address of the entity being connected.
        entity: String,
        /// Address of the entity it was connected to.
        other: String,
        direction: Direction,
    },

    /// A link endpoint does not exist in the bundle.
    #[error("link references unknown entity {0}")]
    UnknownEntity(Uuid),

    /// A link endpoint is not a linked entity (e.g. a project).
    #[error("{0} cannot take part in links")]
    NotLinkable(String),
}

/// Errors raised while constructing a single entity.
#[derive(Debug, thiserror::Error)]
pub enum EntityError {
    #[error(transparent)]
    TypeLookup(#[from] TypeLookupError),

    #[error("document has no describedBy schema URL")]
    MissingSchema,

    #[error("document has no provenance block with a document_id")]
    MissingDocumentId,

    #[error("invalid document_id {value:?}: {source}")]
    InvalidDocumentId {
        value: String,
        source: uuid::Error,
    },

    #[error("{address}: {source}")]
    Property {
        address: String,
        source: LookupError,
    },

    #[error("{address}: {source}")]
    Ontology {
        address: String,
        source: OntologyError,
    },

    #[error("{address}: property {key} must be {expected}")]
    InvalidValue {
        address: String,
        key: String,
        expected: &'static str,
    },

    #[error("{address}: file {file_name:?} is not in the bundle manifest")]
    MissingManifestEntry {
        address: String,
        file_name: String,
    },

    #[error("{0} uses a deprecated schema")]
    Deprecated(String),
}

/// Errors raised while assembling a bundle.
#[derive(Debug, thiserror::Error)]
pub enum BundleError {
    #[error("invalid bundle UUID {0:?}")]
    InvalidUuid(String),

    #[error("unable to detect bundle structure (neither project.json nor project_0.json present)")]
    UnrecognizedLayout,

    #[error("bundle has no links.json with a top-level links list")]
    MissingLinks,

    #[error("invalid manifest entry: {0}")]
    InvalidManifest(#[source] serde_json::Error),

    #[error("invalid link record: {0}")]
    InvalidLink(#[source] serde_json::Error),

    #[error("{file}: expected a list under {key:?}")]
    InvalidCategoryFile { file: String, key: &'static str },

    #[error(transparent)]
    Entity(#[from] EntityError),

    #[error(transparent)]
    Link(#[from] LinkError),
}

impl From<TypeLookupError> for BundleError {
    fn from(e: TypeLookupError) -> Self {
        Self::Entity(EntityError::TypeLookup(e))
    }
}
