//! Reading a bundle stored as a directory of JSON files.
//!
//! ```text
//! <dir>/manifest.json   {"uuid": ..., "version": ..., "files": [<manifest entry>, ...]}
//! <dir>/links.json
//! <dir>/<metadata>.json (either layout)
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

/// Name of the file holding the bundle's identity and file manifest.
pub const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, Deserialize)]
struct ManifestFile {
    uuid: String,
    version: String,
    #[serde(default)]
    files: Vec<Value>,
}

/// The raw contents of a bundle directory.
#[derive(Debug)]
pub struct BundleFiles {
    pub uuid: String,
    pub version: String,
    pub manifest: Vec<Value>,
    /// Every other `*.json` file, keyed by file name in lexicographic order.
    pub metadata: IndexMap<String, Value>,
}

pub fn read_bundle_dir(dir: &Path) -> Result<BundleFiles> {
    if !dir.is_dir() {
        bail!("{} is not a directory", dir.display());
    }

    let manifest_path = dir.join(MANIFEST_FILE);
    let manifest: ManifestFile = read_json(&manifest_path)
        .and_then(|value| serde_json::from_value(value).context("expected uuid, version and files"))
        .with_context(|| format!("invalid bundle manifest {}", manifest_path.display()))?;

    let mut names = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("failed to list {}", dir.display()))? {
        let entry = entry?;
        let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
            continue;
        };
        if name.ends_with(".json") && name != MANIFEST_FILE && entry.path().is_file() {
            names.push(name);
        }
    }
    names.sort();

    let mut metadata = IndexMap::with_capacity(names.len());
    for name in names {
        let value = read_json(&dir.join(&name))?;
        metadata.insert(name, value);
    }
    tracing::debug!(dir = %dir.display(), files = metadata.len(), "read bundle directory");

    Ok(BundleFiles {
        uuid: manifest.uuid,
        version: manifest.version,
        manifest: manifest.files,
        metadata,
    })
}

fn read_json(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("{} is not valid JSON", path.display()))
}
