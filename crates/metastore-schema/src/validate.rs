//! # Document Validation
//!
//! Applies JSON Schema draft-7 validation, including `format` assertions,
//! to a document's serialized form.
//!
//! ## Diagnostics
//!
//! `jsonschema` errors can span several lines. Only the first line of the
//! first error is kept, producing a one-line message suitable for logs:
//!
//! ```text
//! schema validation failed for metadata 'my-runtime' in namespace 'runtimes' with error: "x" is not a "uri".
//! ```
//!
//! ## Schema Resolution
//!
//! `$ref`s naming another schema (by name, `<name>.json`, or its `$id`)
//! are resolved from the schemas of the same namespace handed to the
//! engine. Unresolvable references fail compilation instead of reaching
//! out to the network.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use jsonschema::{Retrieve, Uri};
use serde_json::Value;

use crate::error::SchemaError;

/// Resolves `$ref` URIs against a namespace's schemas held in memory.
struct NamespaceRetriever {
    schemas_by_uri: HashMap<String, Arc<Value>>,
}

impl Retrieve for NamespaceRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let uri_str = uri.as_str();

        if let Some(value) = self.schemas_by_uri.get(uri_str) {
            return Ok(Value::clone(value));
        }

        // Fall back to the last path segment, with and without `.json`.
        let segment = uri_str
            .trim_end_matches('#')
            .rsplit('/')
            .next()
            .unwrap_or(uri_str);
        let stem = segment.strip_suffix(".json").unwrap_or(segment);
        for key in [segment, stem] {
            if let Some(value) = self.schemas_by_uri.get(key) {
                return Ok(Value::clone(value));
            }
        }

        Err(format!("schema not found for URI: {uri_str}").into())
    }
}

/// Validates documents of one namespace.
#[derive(Debug, Clone)]
pub struct ValidationEngine {
    namespace: String,
    references: BTreeMap<String, Arc<Value>>,
}

impl ValidationEngine {
    /// Engine for `namespace` with no cross-schema references.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            references: BTreeMap::new(),
        }
    }

    /// Make `schemas` available to `$ref` resolution.
    pub fn with_references(mut self, schemas: BTreeMap<String, Arc<Value>>) -> Self {
        self.references = schemas;
        self
    }

    /// Namespace this engine reports in diagnostics.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn retriever(&self) -> NamespaceRetriever {
        let mut schemas_by_uri = HashMap::new();
        for (name, schema) in &self.references {
            schemas_by_uri.insert(name.clone(), Arc::clone(schema));
            schemas_by_uri.insert(format!("{name}.json"), Arc::clone(schema));
            if let Some(id) = schema.get("$id").and_then(Value::as_str) {
                schemas_by_uri.insert(id.to_string(), Arc::clone(schema));
            }
        }
        NamespaceRetriever { schemas_by_uri }
    }

    /// Check `payload` against `schema`.
    ///
    /// # Errors
    ///
    /// [`SchemaError::ValidationFailed`] with a one-line message if the
    /// payload does not conform, [`SchemaError::SchemaCompile`] if the schema
    /// itself is unusable.
    pub fn validate(
        &self,
        document_id: &str,
        schema_name: &str,
        schema: &Value,
        payload: &Value,
    ) -> Result<(), SchemaError> {
        tracing::debug!(
            document = document_id,
            namespace = %self.namespace,
            schema_name,
            "validating metadata resource"
        );

        let validator = jsonschema::options()
            .with_draft(jsonschema::Draft::Draft7)
            .should_validate_formats(true)
            .with_retriever(self.retriever())
            .build(schema)
            .map_err(|e| SchemaError::SchemaCompile {
                schema_name: schema_name.to_string(),
                reason: e.to_string(),
            })?;

        let Some(error) = validator.iter_errors(payload).next() else {
            return Ok(());
        };

        let detail = error.to_string();
        let first_line = detail.lines().next().unwrap_or_default();
        let message = format!(
            "schema validation failed for metadata '{document_id}' in namespace '{}' with error: {first_line}.",
            self.namespace
        );
        tracing::error!("{message}");
        Err(SchemaError::ValidationFailed { message })
    }
}
