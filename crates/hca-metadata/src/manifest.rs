//! Bundle manifest entries.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// File-transfer metadata for one physical file in a bundle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// MIME type (serialised as "content-type").
    #[serde(rename = "content-type", alias = "content_type")]
    pub content_type: String,

    pub crc32c: String,

    pub indexed: bool,

    pub name: String,

    pub s3_etag: String,

    pub sha1: String,

    pub sha256: String,

    pub size: u64,

    /// Direct-access URL, only present if the bundle was requested with
    /// direct URLs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    pub uuid: Uuid,

    pub version: String,
}

/// Parses manifest records into a map keyed by file name.
///
/// Later records with the same name replace earlier ones.
pub fn parse_manifest(records: &[Value]) -> Result<IndexMap<String, ManifestEntry>, serde_json::Error> {
    records
        .iter()
        .map(|record| {
            let entry = ManifestEntry::deserialize(record)?;
            Ok((entry.name.clone(), entry))
        })
        .collect()
}
