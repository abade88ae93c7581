//! Typed property access used while constructing entities.

use hca_lookup::{LookupError, OptionalLookup, PropertyResolver, SchemaVersion, ontology_label, ontology_labels};
use indexmap::IndexSet;
use serde_json::Value;

use crate::error::EntityError;

type Result<T> = std::result::Result<T, EntityError>;

#[derive(Clone, Copy)]
enum Scope<'a> {
    /// Keys are resolved against a whole document body.
    Document,
    /// Keys name a property of one element of the collection at `parent`.
    Element { parent: &'a str },
}

/// Reads typed property values from one document (or one element of a
/// nested collection), reporting failures against the entity's address.
pub(crate) struct Fields<'a> {
    resolver: &'a PropertyResolver,
    body: &'a Value,
    version: Option<SchemaVersion>,
    address: &'a str,
    scope: Scope<'a>,
}

impl<'a> Fields<'a> {
    pub(crate) fn new(
        resolver: &'a PropertyResolver,
        body: &'a Value,
        version: Option<SchemaVersion>,
        address: &'a str,
    ) -> Self {
        Self {
            resolver,
            body,
            version,
            address,
            scope: Scope::Document,
        }
    }

    /// Fields of one element of the collection stored under `parent`.
    pub(crate) fn element<'b>(&'b self, element: &'b Value, parent: &'b str) -> Fields<'b>
    where
        'a: 'b,
    {
        Fields {
            resolver: self.resolver,
            body: element,
            version: self.version,
            address: self.address,
            scope: Scope::Element { parent },
        }
    }

    fn full_key(&self, key: &str) -> String {
        match self.scope {
            Scope::Document => key.to_owned(),
            Scope::Element { parent } => format!("{parent}.{key}"),
        }
    }

    fn resolve(&self, key: &str, fallbacks: &[&str]) -> std::result::Result<Value, LookupError> {
        match self.scope {
            Scope::Document => {
                self.resolver
                    .lookup_versioned(self.body, self.version.as_ref(), key, fallbacks)
            }
            Scope::Element { parent } => {
                self.resolver
                    .lookup_local(self.body, self.version.as_ref(), parent, key, fallbacks)
            }
        }
    }

    fn property_error(&self, source: LookupError) -> EntityError {
        EntityError::Property {
            address: self.address.to_owned(),
            source,
        }
    }

    fn invalid(&self, key: &str, expected: &'static str) -> EntityError {
        EntityError::InvalidValue {
            address: self.address.to_owned(),
            key: self.full_key(key),
            expected,
        }
    }

    /// An optional value; JSON `null` counts as absent.
    pub(crate) fn optional(&self, key: &str, fallbacks: &[&str]) -> Result<Option<Value>> {
        let value = self
            .resolve(key, fallbacks)
            .optional()
            .map_err(|e| self.property_error(e))?;
        Ok(value.filter(|v| !v.is_null()))
    }

    pub(crate) fn required(&self, key: &str, fallbacks: &[&str]) -> Result<Value> {
        self.optional(key, fallbacks)?.ok_or_else(|| {
            self.property_error(LookupError::NotFound {
                key: self.full_key(key),
            })
        })
    }

    pub(crate) fn string(&self, key: &str, fallbacks: &[&str]) -> Result<String> {
        match self.required(key, fallbacks)? {
            Value::String(s) => Ok(s),
            _ => Err(self.invalid(key, "a string")),
        }
    }

    pub(crate) fn opt_string(&self, key: &str, fallbacks: &[&str]) -> Result<Option<String>> {
        match self.optional(key, fallbacks)? {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(_) => Err(self.invalid(key, "a string")),
        }
    }

    /// An optional string that older schemas stored as a number.
    pub(crate) fn opt_text(&self, key: &str, fallbacks: &[&str]) -> Result<Option<String>> {
        match self.optional(key, fallbacks)? {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(_) => Err(self.invalid(key, "a string or number")),
        }
    }

    pub(crate) fn opt_bool(&self, key: &str, fallbacks: &[&str]) -> Result<Option<bool>> {
        match self.optional(key, fallbacks)? {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(b)),
            Some(_) => Err(self.invalid(key, "a boolean")),
        }
    }

    pub(crate) fn opt_integer(&self, key: &str, fallbacks: &[&str]) -> Result<Option<i64>> {
        match self.optional(key, fallbacks)? {
            None => Ok(None),
            Some(v) => v
                .as_i64()
                .or_else(|| v.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
                .map(Some)
                .ok_or_else(|| self.invalid(key, "an integer")),
        }
    }

    pub(crate) fn number(&self, key: &str, fallbacks: &[&str]) -> Result<f64> {
        self.required(key, fallbacks)?
            .as_f64()
            .ok_or_else(|| self.invalid(key, "a number"))
    }

    /// A required list of integers; a single integer is a one-element list.
    pub(crate) fn integers(&self, key: &str, fallbacks: &[&str]) -> Result<Vec<i64>> {
        let value = self.required(key, fallbacks)?;
        let items = match &value {
            Value::Array(items) => items.as_slice(),
            single => std::slice::from_ref(single),
        };
        items
            .iter()
            .map(|v| v.as_i64().ok_or_else(|| self.invalid(key, "a list of integers")))
            .collect()
    }

    /// An optional set of strings; absence yields an empty set.
    pub(crate) fn strings(&self, key: &str, fallbacks: &[&str]) -> Result<IndexSet<String>> {
        match self.optional(key, fallbacks)? {
            None => Ok(IndexSet::new()),
            Some(Value::String(s)) => Ok(IndexSet::from([s])),
            Some(Value::Array(items)) => items
                .into_iter()
                .map(|v| match v {
                    Value::String(s) => Ok(s),
                    _ => Err(self.invalid(key, "a list of strings")),
                })
                .collect(),
            Some(_) => Err(self.invalid(key, "a list of strings")),
        }
    }

    /// An optional list of records; absence yields an empty list.
    pub(crate) fn list(&self, key: &str, fallbacks: &[&str]) -> Result<Vec<Value>> {
        match self.optional(key, fallbacks)? {
            None => Ok(Vec::new()),
            Some(Value::Array(items)) => Ok(items),
            Some(single) => Ok(vec![single]),
        }
    }

    /// The label of an optional ontology reference.
    pub(crate) fn label(&self, key: &str, fallbacks: &[&str]) -> Result<Option<String>> {
        let value = self.optional(key, fallbacks)?;
        ontology_label(value.as_ref()).map_err(|source| EntityError::Ontology {
            address: self.address.to_owned(),
            source,
        })
    }

    pub(crate) fn required_label(&self, key: &str, fallbacks: &[&str]) -> Result<String> {
        let value = self.required(key, fallbacks)?;
        ontology_label(Some(&value))
            .map_err(|source| EntityError::Ontology {
                address: self.address.to_owned(),
                source,
            })?
            .ok_or_else(|| self.invalid(key, "an ontology reference"))
    }

    /// The labels of an optional list of ontology references.
    pub(crate) fn labels(&self, key: &str, fallbacks: &[&str]) -> Result<IndexSet<String>> {
        let value = self.optional(key, fallbacks)?;
        let labels = ontology_labels(value.as_ref()).map_err(|source| EntityError::Ontology {
            address: self.address.to_owned(),
            source,
        })?;
        Ok(labels.into_iter().collect())
    }

    pub(crate) fn required_labels(&self, key: &str, fallbacks: &[&str]) -> Result<IndexSet<String>> {
        let value = self.required(key, fallbacks)?;
        let labels = ontology_labels(Some(&value)).map_err(|source| EntityError::Ontology {
            address: self.address.to_owned(),
            source,
        })?;
        Ok(labels.into_iter().collect())
    }
}
