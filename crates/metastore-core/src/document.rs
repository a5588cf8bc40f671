//! # Documents
//!
//! A [`Document`] is a named, schema-tagged metadata record. Its persisted
//! ("trimmed") form is a JSON object with exactly three keys:
//!
//! ```json
//! { "displayName": "...", "schemaName": "...", "properties": { ... } }
//! ```
//!
//! The document's `name` comes from the backing file's base name and is
//! authoritative over anything name-like inside the content. `resource` and
//! `invalid_reason` are derived on load and never written.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::DocumentError;

/// Schema applied when a document does not name one.
pub const DEFAULT_SCHEMA_NAME: &str = "kfp";

/// Tag recorded in `invalid_reason` when a listed document failed validation.
pub const INVALID_REASON_VALIDATION: &str = "ValidationError";

/// On-disk shape. Every field is optional here so that absence can be
/// reported with a precise [`DocumentError`] rather than a serde message.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredDocument {
    display_name: Option<String>,
    schema_name: Option<String>,
    properties: Option<Map<String, Value>>,
}

/// A metadata record.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Identifier, taken from the backing file's base name on load.
    pub name: Option<String>,
    /// Human-readable name.
    pub display_name: String,
    /// Schema the document is validated against.
    pub schema_name: String,
    /// The stored payload.
    pub properties: Map<String, Value>,
    /// Location of the backing file, set on load.
    pub resource: Option<PathBuf>,
    /// Set only by tolerant listing when validation failed.
    pub invalid_reason: Option<String>,
}

impl Document {
    /// Create an unnamed document using [`DEFAULT_SCHEMA_NAME`].
    pub fn new(display_name: impl Into<String>, properties: Map<String, Value>) -> Self {
        Self {
            name: None,
            display_name: display_name.into(),
            schema_name: DEFAULT_SCHEMA_NAME.to_string(),
            properties,
            resource: None,
            invalid_reason: None,
        }
    }

    /// Select the validation schema. An empty name keeps the default.
    pub fn with_schema_name(mut self, schema_name: impl Into<String>) -> Self {
        let schema_name = schema_name.into();
        if !schema_name.is_empty() {
            self.schema_name = schema_name;
        }
        self
    }

    /// Decode a document from its serialized JSON form.
    ///
    /// # Errors
    ///
    /// [`DocumentError::MissingDisplayName`] if `displayName` is absent and
    /// [`DocumentError::Malformed`] if the value is not an object, a field
    /// has the wrong type, or `properties` is absent.
    pub fn from_value(value: Value) -> Result<Self, DocumentError> {
        if !value.is_object() {
            return Err(DocumentError::Malformed {
                reason: "document is not a JSON object".to_string(),
            });
        }
        let stored: StoredDocument =
            serde_json::from_value(value).map_err(|e| DocumentError::Malformed {
                reason: e.to_string(),
            })?;

        let display_name = stored.display_name.ok_or(DocumentError::MissingDisplayName)?;
        let properties = stored.properties.ok_or_else(|| DocumentError::Malformed {
            reason: "missing required 'properties' attribute".to_string(),
        })?;

        let doc = Self::new(display_name, properties);
        Ok(match stored.schema_name {
            Some(schema_name) => doc.with_schema_name(schema_name),
            None => doc,
        })
    }

    /// Serialize to a JSON value.
    ///
    /// With `trim` set, only the persisted keys are emitted. Otherwise
    /// `name`, `resource` and `reason` are included when present.
    pub fn to_value(&self, trim: bool) -> Value {
        let mut map = Map::new();
        map.insert("displayName".into(), Value::String(self.display_name.clone()));
        map.insert("schemaName".into(), Value::String(self.schema_name.clone()));
        map.insert("properties".into(), Value::Object(self.properties.clone()));
        if !trim {
            if let Some(name) = &self.name {
                map.insert("name".into(), Value::String(name.clone()));
            }
            if let Some(resource) = &self.resource {
                map.insert(
                    "resource".into(),
                    Value::String(resource.display().to_string()),
                );
            }
            if let Some(reason) = &self.invalid_reason {
                map.insert("reason".into(), Value::String(reason.clone()));
            }
        }
        Value::Object(map)
    }

    /// Pretty-printed JSON, as written to disk when `trim` is set.
    pub fn to_json(&self, trim: bool) -> Result<String, DocumentError> {
        serde_json::to_string_pretty(&self.to_value(trim)).map_err(|e| DocumentError::Malformed {
            reason: e.to_string(),
        })
    }

    /// Whether tolerant listing flagged this document as invalid.
    pub fn is_invalid(&self) -> bool {
        self.invalid_reason.is_some()
    }
}

/// Condensed view of a stored document, for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummary {
    /// Document identifier.
    pub name: String,
    /// Human-readable name.
    pub display_name: String,
    /// Backing file location.
    pub location: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn props(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn new_uses_default_schema() {
        let doc = Document::new("My Runtime", Map::new());
        assert_eq!(doc.schema_name, DEFAULT_SCHEMA_NAME);
        assert!(doc.name.is_none());
        assert!(!doc.is_invalid());
    }

    #[test]
    fn empty_schema_name_keeps_default() {
        let doc = Document::new("x", Map::new()).with_schema_name("");
        assert_eq!(doc.schema_name, DEFAULT_SCHEMA_NAME);
        let doc = Document::new("x", Map::new()).with_schema_name("airflow");
        assert_eq!(doc.schema_name, "airflow");
    }

    #[test]
    fn trimmed_value_has_exactly_three_keys() {
        let mut doc = Document::new("My Runtime", props(json!({"api_endpoint": "http://x"})));
        doc.name = Some("my-runtime".into());
        doc.resource = Some(PathBuf::from("/tmp/my-runtime.json"));
        doc.invalid_reason = Some(INVALID_REASON_VALIDATION.into());

        let trimmed = doc.to_value(true);
        let keys: Vec<&String> = trimmed.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 3);
        assert_eq!(trimmed["displayName"], "My Runtime");
        assert_eq!(trimmed["schemaName"], "kfp");
        assert_eq!(trimmed["properties"]["api_endpoint"], "http://x");
    }

    #[test]
    fn full_value_includes_derived_fields() {
        let mut doc = Document::new("d", Map::new());
        doc.name = Some("n".into());
        doc.resource = Some(PathBuf::from("/r/n.json"));
        doc.invalid_reason = Some("ValidationError".into());

        let full = doc.to_value(false);
        assert_eq!(full["name"], "n");
        assert_eq!(full["resource"], "/r/n.json");
        assert_eq!(full["reason"], "ValidationError");
    }

    #[test]
    fn from_value_decodes_persisted_form() {
        let doc = Document::from_value(json!({
            "displayName": "Snippet",
            "schemaName": "code-snippet",
            "properties": {"language": "python"},
            "name": "ignored"
        }))
        .unwrap();
        assert_eq!(doc.display_name, "Snippet");
        assert_eq!(doc.schema_name, "code-snippet");
        assert_eq!(doc.properties["language"], "python");
        assert!(doc.name.is_none(), "name inside content must not be trusted");
    }

    #[test]
    fn from_value_defaults_missing_schema_name() {
        let doc = Document::from_value(json!({"displayName": "d", "properties": {}})).unwrap();
        assert_eq!(doc.schema_name, DEFAULT_SCHEMA_NAME);
    }

    #[test]
    fn from_value_requires_display_name() {
        let err = Document::from_value(json!({"schemaName": "kfp", "properties": {}})).unwrap_err();
        assert_eq!(err, DocumentError::MissingDisplayName);
    }

    #[test]
    fn from_value_requires_properties() {
        let err = Document::from_value(json!({"displayName": "d"})).unwrap_err();
        assert!(matches!(err, DocumentError::Malformed { .. }));
    }

    #[test]
    fn from_value_rejects_non_objects_and_bad_types() {
        assert!(matches!(
            Document::from_value(json!([1, 2])),
            Err(DocumentError::Malformed { .. })
        ));
        assert!(matches!(
            Document::from_value(json!({"displayName": 7, "properties": {}})),
            Err(DocumentError::Malformed { .. })
        ));
    }

    #[test]
    fn trimmed_json_decodes_back() {
        let doc = Document::new("My Runtime", props(json!({"api_endpoint": "http://x"})))
            .with_schema_name("kfp");
        let text = doc.to_json(true).unwrap();
        let decoded = Document::from_value(serde_json::from_str(&text).unwrap()).unwrap();
        assert_eq!(decoded, doc);
    }

    #[test]
    fn summary_serializes_camel_case() {
        let summary = DocumentSummary {
            name: "a".into(),
            display_name: "A".into(),
            location: PathBuf::from("/m/a.json"),
        };
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["displayName"], "A");
        assert_eq!(value["location"], "/m/a.json");
    }
}
