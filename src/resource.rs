//! Fidelity-preserving resource node model.
//!
//! A [`Resource`] is the in-memory representation of one structured YAML
//! document. It is backed by an ordered value tree rather than a fixed
//! struct, so fields the pipeline never inspects survive a parse/serialize
//! cycle with their values and key order intact. Mutators operate on named
//! paths within the tree and leave untouched subtrees structurally
//! identical.
//!
//! Serialization normalizes cosmetic details (indentation, quoting) but is
//! idempotent: re-parsing and re-serializing a document twice without
//! mutation yields the same bytes both times.

use serde::Deserialize;
use serde_yaml::{Mapping, Value};

use crate::errors::{Error, Result};

const METADATA: &str = "metadata";
const ANNOTATIONS: &str = "annotations";

/// One structured configuration document.
///
/// Logical fields (`apiVersion`, `kind`, `metadata.name`,
/// `metadata.namespace`, `metadata.annotations`) are exposed through typed
/// accessors; everything else is carried opaquely.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    root: Value,
}

impl Resource {
    /// Parse a single YAML document.
    ///
    /// Fails with [`Error::MalformedDocument`] on syntactically invalid
    /// input. Structural well-formedness is the only requirement; no schema
    /// is enforced.
    pub fn parse(input: &str) -> Result<Self> {
        let root: Value =
            serde_yaml::from_str(input).map_err(|source| Error::malformed(0, source))?;
        Ok(Self { root })
    }

    /// Parse every document in a multi-document stream, in stream order.
    ///
    /// Documents are delimited by the `---` boundary marker. An empty stream
    /// (or an empty document between markers) contributes no nodes and is
    /// not an error. The first malformed document fails the whole call; no
    /// partial sequence is returned.
    pub fn parse_all(input: &str) -> Result<Vec<Self>> {
        let mut nodes = Vec::new();
        for (index, document) in serde_yaml::Deserializer::from_str(input).enumerate() {
            let root = Value::deserialize(document).map_err(|source| Error::malformed(index, source))?;
            if root.is_null() {
                continue;
            }
            nodes.push(Self { root });
        }
        Ok(nodes)
    }

    /// Wrap an already-built value tree.
    pub fn from_value(root: Value) -> Self {
        Self { root }
    }

    /// Serialize the node back to YAML (no leading document marker, one
    /// trailing newline).
    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(&self.root)?)
    }

    /// The underlying value tree.
    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Look up a field by dotted path, e.g. `metadata.name`.
    pub fn field(&self, path: &str) -> Option<&Value> {
        let mut current = &self.root;
        for key in path.split('.') {
            current = current.get(key)?;
        }
        Some(current)
    }

    /// `apiVersion`, or "" when absent.
    pub fn api_version(&self) -> &str {
        self.str_field("apiVersion")
    }

    /// `kind`, or "" when absent. Case is preserved exactly as found in the
    /// document.
    pub fn kind(&self) -> &str {
        self.str_field("kind")
    }

    /// `metadata.name`, or "" when absent.
    pub fn name(&self) -> &str {
        self.str_field("metadata.name")
    }

    /// `metadata.namespace`, or "" when absent.
    pub fn namespace(&self) -> &str {
        self.str_field("metadata.namespace")
    }

    /// Look up one annotation. Scalar values that are not strings (a mode
    /// written as a bare integer, say) are converted to their string form.
    pub fn annotation(&self, key: &str) -> Option<String> {
        scalar_to_string(self.field("metadata.annotations")?.get(key)?)
    }

    /// All annotations in document order.
    pub fn annotations(&self) -> Vec<(String, String)> {
        let Some(Value::Mapping(map)) = self.field("metadata.annotations") else {
            return Vec::new();
        };
        map.iter()
            .filter_map(|(k, v)| Some((k.as_str()?.to_string(), scalar_to_string(v)?)))
            .collect()
    }

    /// Upsert one annotation.
    ///
    /// Inserts at the end of the annotations mapping when the key is absent;
    /// overwrites the value in place (position preserved) when it is
    /// present. The `metadata` and `metadata.annotations` mappings are
    /// created, appended at the end of their parents, when missing. Keys may
    /// contain dots or slashes; they are never split.
    pub fn set_annotation(&mut self, key: &str, value: &str) {
        let metadata = mapping_entry(&mut self.root, METADATA);
        let annotations = mapping_entry(metadata, ANNOTATIONS);
        as_mapping_mut(annotations).insert(
            Value::String(key.to_string()),
            Value::String(value.to_string()),
        );
    }

    /// Remove one annotation, dropping the annotations mapping entirely once
    /// it becomes empty. Relative order of the remaining entries is kept.
    pub fn remove_annotation(&mut self, key: &str) {
        let Some(Value::Mapping(metadata)) = self.root.get_mut(METADATA) else {
            return;
        };
        if let Some(Value::Mapping(annotations)) = metadata.get_mut(ANNOTATIONS) {
            annotations.shift_remove(key);
            if annotations.is_empty() {
                metadata.shift_remove(ANNOTATIONS);
            }
        }
    }

    /// Set a field by dotted path, creating intermediate mappings as needed.
    /// Existing sibling fields keep their values and positions.
    pub fn set_field(&mut self, path: &str, value: Value) {
        let mut keys = path.split('.').peekable();
        let mut current = &mut self.root;
        while let Some(key) = keys.next() {
            if keys.peek().is_none() {
                as_mapping_mut(current).insert(Value::String(key.to_string()), value);
                return;
            }
            current = mapping_entry(current, key);
        }
    }

    fn str_field(&self, path: &str) -> &str {
        self.field(path).and_then(Value::as_str).unwrap_or("")
    }
}

/// Coerce `value` to a mapping (replacing a scalar in place) and return the
/// entry for `key`, inserting an empty mapping when the key is absent.
fn mapping_entry<'a>(value: &'a mut Value, key: &str) -> &'a mut Value {
    as_mapping_mut(value)
        .entry(Value::String(key.to_string()))
        .or_insert_with(|| Value::Mapping(Mapping::new()))
}

fn as_mapping_mut(value: &mut Value) -> &mut Mapping {
    if !value.is_mapping() {
        *value = Value::Mapping(Mapping::new());
    }
    match value {
        Value::Mapping(map) => map,
        _ => unreachable!("value was just replaced with a mapping"),
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
