//! Display labels for ontology references.
//!
//! An ontology reference is a small record describing a coded term:
//!
//! ```json
//! {"text": "Homo sapiens", "ontology": "NCBITaxon:9606", "ontology_label": "Homo sapiens"}
//! ```

use serde_json::Value;

/// Label fields in order of preference.
const LABEL_FIELDS: [&str; 3] = ["ontology_label", "text", "ontology"];

/// Errors returned when extracting ontology labels.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OntologyError {
    /// The record is present but carries none of the label fields, or the
    /// preferred one is not a string.
    #[error("malformed ontology reference (no ontology_label, text or ontology): {0}")]
    Malformed(String),
}

/// Returns the best display label for an ontology reference.
///
/// Strings are returned as-is. For records, `ontology_label` is preferred,
/// then `text`, then the raw `ontology` code. An absent reference (or JSON
/// `null`) yields `Ok(None)`.
pub fn ontology_label(reference: Option<&Value>) -> Result<Option<String>, OntologyError> {
    match reference {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Object(map)) => {
            let malformed = || OntologyError::Malformed(Value::Object(map.clone()).to_string());
            // The first label field that is set decides; it must be a string.
            let label = LABEL_FIELDS
                .iter()
                .filter_map(|field| map.get(*field))
                .find(|value| !value.is_null())
                .ok_or_else(malformed)?;
            label.as_str().map(|label| Some(label.to_owned())).ok_or_else(malformed)
        }
        Some(other) => Err(OntologyError::Malformed(other.to_string())),
    }
}

/// Returns the labels of a list of ontology references.
///
/// A single reference is treated as a one-element list; absence yields an
/// empty list.
pub fn ontology_labels(references: Option<&Value>) -> Result<Vec<String>, OntologyError> {
    match references {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| ontology_label(Some(item)).transpose())
            .collect(),
        other => Ok(ontology_label(other)?.into_iter().collect()),
    }
}
