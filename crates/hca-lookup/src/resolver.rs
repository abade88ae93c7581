//! The schema-version aware property resolver.

use std::fmt;
use std::iter;
use std::sync::Arc;

use serde_json::Value;
use tracing::trace;

use crate::migration::MigrationAuthority;
use crate::overrides::{self, CURATED_OVERRIDES, OverrideRule};
use crate::path;
use crate::version::{SchemaVersion, content, document_version};

/// Errors returned by property lookups.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    /// Neither the primary key nor any fallback resolved. Always names the
    /// primary key.
    #[error("property not found: {key}")]
    NotFound { key: String },

    #[error("invalid property key {0:?}: expected <schema>.<path>")]
    InvalidKey(String),
}

impl LookupError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Turns a not-found lookup into `Ok(None)`.
pub trait OptionalLookup {
    fn optional(self) -> Result<Option<Value>, LookupError>;
}

impl OptionalLookup for Result<Value, LookupError> {
    fn optional(self) -> Result<Option<Value>, LookupError> {
        match self {
            Ok(value) => Ok(Some(value)),
            Err(LookupError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// Resolves logical property keys against metadata documents.
///
/// Keys are dotted paths whose first segment names the schema
/// (`donor_organism.biomaterial_core.biomaterial_id`); that segment is only
/// used for translation and is stripped before the path is resolved.
///
/// Before resolution a key is translated for the document's schema version:
/// first through the migration authority, if any, then through the override
/// rules, which win when they match the untranslated key.
#[derive(Clone)]
pub struct PropertyResolver {
    authority: Option<Arc<dyn MigrationAuthority + Send + Sync>>,
    overrides: Vec<OverrideRule>,
}

impl Default for PropertyResolver {
    fn default() -> Self {
        Self {
            authority: None,
            overrides: CURATED_OVERRIDES.to_vec(),
        }
    }
}

impl fmt::Debug for PropertyResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyResolver")
            .field("authority", &self.authority.is_some())
            .field("overrides", &self.overrides.len())
            .finish()
    }
}

impl PropertyResolver {
    /// A resolver with the curated overrides and no migration authority.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_authority(mut self, authority: Arc<dyn MigrationAuthority + Send + Sync>) -> Self {
        self.authority = Some(authority);
        self
    }

    /// Replaces the override rules (an empty vector disables them).
    pub fn with_overrides(mut self, overrides: Vec<OverrideRule>) -> Self {
        self.overrides = overrides;
        self
    }

    /// Translates `key` for a document of the given version.
    ///
    /// Unversioned documents are never translated.
    pub fn translate(&self, key: &str, version: Option<&SchemaVersion>) -> String {
        let Some(version) = version else {
            return key.to_owned();
        };
        let migrated = self
            .authority
            .as_ref()
            .and_then(|authority| authority.translate(key, version));
        if let Some(replacement) = overrides::apply(&self.overrides, key, version) {
            trace!(key, replacement, %version, "override rule applied");
            return replacement.to_owned();
        }
        match migrated {
            Some(migrated) => {
                trace!(key, %migrated, %version, "key migrated");
                migrated
            }
            None => key.to_owned(),
        }
    }

    /// Looks up `key` in `document`, trying `fallbacks` in order.
    ///
    /// The document may be wrapped in a `content` envelope; its version is
    /// taken from the document itself.
    pub fn lookup(&self, document: &Value, key: &str, fallbacks: &[&str]) -> Result<Value, LookupError> {
        let version = document_version(document);
        self.lookup_versioned(content(document), version.as_ref(), key, fallbacks)
    }

    /// Like [`lookup`](Self::lookup) but returns `default` when no key
    /// resolves. `None` is a valid default.
    pub fn lookup_or(
        &self,
        document: &Value,
        key: &str,
        fallbacks: &[&str],
        default: Option<Value>,
    ) -> Result<Option<Value>, LookupError> {
        match self.lookup(document, key, fallbacks).optional()? {
            Some(value) => Ok(Some(value)),
            None => Ok(default),
        }
    }

    /// Looks up `key` in an already unwrapped document body whose version
    /// is known to the caller.
    pub fn lookup_versioned(
        &self,
        body: &Value,
        version: Option<&SchemaVersion>,
        key: &str,
        fallbacks: &[&str],
    ) -> Result<Value, LookupError> {
        for candidate in iter::once(key).chain(fallbacks.iter().copied()) {
            let translated = self.translate(candidate, version);
            let segments = relative_segments(&translated)?;
            if let Some(value) = path::resolve(body, &segments) {
                return Ok(value);
            }
        }
        Err(LookupError::NotFound {
            key: key.to_owned(),
        })
    }

    /// Looks up `property` inside one element of a nested collection.
    ///
    /// `element` is e.g. one entry of a project's `contributors` list and
    /// `parent` the collection's key (`project.contributors`). The full key
    /// `parent.property` is translated, then resolved relative to `element`.
    pub fn lookup_local(
        &self,
        element: &Value,
        version: Option<&SchemaVersion>,
        parent: &str,
        property: &str,
        fallbacks: &[&str],
    ) -> Result<Value, LookupError> {
        let depth = parent.split('.').count();
        for candidate in iter::once(property).chain(fallbacks.iter().copied()) {
            let translated = self.translate(&format!("{parent}.{candidate}"), version);
            let segments: Vec<&str> = translated.split('.').skip(depth).collect();
            if segments.is_empty() || segments.iter().any(|s| s.is_empty()) {
                return Err(LookupError::InvalidKey(translated));
            }
            if let Some(value) = path::resolve(element, &segments) {
                return Ok(value);
            }
        }
        Err(LookupError::NotFound {
            key: format!("{parent}.{property}"),
        })
    }
}

/// Splits a key into path segments, dropping the leading schema name.
fn relative_segments(key: &str) -> Result<Vec<&str>, LookupError> {
    let segments: Vec<&str> = key.split('.').skip(1).collect();
    if segments.is_empty() || segments.iter().any(|s| s.is_empty()) {
        return Err(LookupError::InvalidKey(key.to_owned()));
    }
    Ok(segments)
}

/// Looks up `key` (then `fallbacks`) with a default resolver.
pub fn lookup(document: &Value, key: &str, fallbacks: &[&str]) -> Result<Value, LookupError> {
    PropertyResolver::default().lookup(document, key, fallbacks)
}

/// Looks up `key` (then `fallbacks`) with a default resolver, returning
/// `default` if nothing resolves.
pub fn lookup_or(
    document: &Value,
    key: &str,
    fallbacks: &[&str],
    default: Option<Value>,
) -> Result<Option<Value>, LookupError> {
    PropertyResolver::default().lookup_or(document, key, fallbacks, default)
}
