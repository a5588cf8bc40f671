//! Errors returned by schema loading, lookup and validation.

use thiserror::Error;

/// Errors returned by [`SchemaCache`](crate::SchemaCache) and
/// [`ValidationEngine`](crate::ValidationEngine).
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The namespace is not one the cache loaded schemas for.
    #[error("namespace '{namespace}' is not in the list of valid namespaces: {known:?}")]
    UnknownNamespace {
        /// The rejected namespace.
        namespace: String,
        /// Namespaces the cache does know, sorted.
        known: Vec<String>,
    },

    /// The namespace is known but has no schema by that name.
    #[error("schema '{schema_name}' in namespace '{namespace}' was not found")]
    SchemaNotFound {
        /// Namespace that was searched.
        namespace: String,
        /// The missing schema.
        schema_name: String,
    },

    /// A document did not conform to its schema.
    #[error("{message}")]
    ValidationFailed {
        /// Single-line diagnostic.
        message: String,
    },

    /// A schema file or the schema directory could not be loaded.
    #[error("failed to load schema {path}: {reason}")]
    SchemaLoad {
        /// Path of the offending file or directory.
        path: String,
        /// Human-readable reason.
        reason: String,
    },

    /// A schema could not be compiled into a validator.
    #[error("failed to compile schema '{schema_name}': {reason}")]
    SchemaCompile {
        /// The schema that failed to compile.
        schema_name: String,
        /// Human-readable reason.
        reason: String,
    },

    /// I/O error while reading the schema directory.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
