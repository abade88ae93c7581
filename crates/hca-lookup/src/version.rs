//! Schema versions and the self-describing parts of a metadata document.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// A `major.minor.patch` schema version.
///
/// Missing trailing components parse as zero, so `"5.3"` equals `"5.3.0"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SchemaVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl SchemaVersion {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

/// Errors returned when parsing a schema version.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VersionError {
    #[error("invalid schema version {0:?}: expected <major>.<minor>.<patch>")]
    Invalid(String),
}

impl FromStr for SchemaVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || VersionError::Invalid(s.to_owned());
        let mut parts = [0u32; 3];
        let mut count = 0;
        for part in s.trim().split('.') {
            if count == parts.len() {
                return Err(invalid());
            }
            parts[count] = part.parse().map_err(|_| invalid())?;
            count += 1;
        }
        Ok(Self::new(parts[0], parts[1], parts[2]))
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl Serialize for SchemaVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SchemaVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Returns the document body, unwrapping a `content` envelope if present.
pub fn content(document: &Value) -> &Value {
    match document.get("content") {
        Some(inner) if inner.is_object() => inner,
        _ => document,
    }
}

/// Returns the schema name, the final path segment of `describedBy`.
pub fn schema_name(document: &Value) -> Option<&str> {
    let described_by = content(document).get("describedBy")?.as_str()?;
    described_by.rsplit('/').next().filter(|s| !s.is_empty())
}

/// Determines the schema version a document was written against.
///
/// An explicit `schema_version` field wins over the version segment of the
/// `describedBy` URL (`.../type/biomaterial/13.1.1/cell_suspension`).
/// Returns `None` if neither yields a parseable version.
pub fn document_version(document: &Value) -> Option<SchemaVersion> {
    let body = content(document);
    if let Some(version) = body.get("schema_version").and_then(Value::as_str) {
        return version.parse().ok();
    }
    let described_by = body.get("describedBy")?.as_str()?;
    let mut segments = described_by.rsplit('/');
    segments.next()?;
    segments.next()?.parse().ok()
}
