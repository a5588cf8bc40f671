//! # Store Errors
//!
//! The caller-facing error taxonomy. Schema- and document-level errors are
//! flattened into it so callers match on one enum.

use std::path::PathBuf;

use metastore_core::DocumentError;
use metastore_schema::SchemaError;
use thiserror::Error;

/// Errors returned by [`MetadataStore`](crate::MetadataStore) implementations
/// and the [`MetadataManager`](crate::MetadataManager).
#[derive(Error, Debug)]
pub enum StoreError {
    /// The namespace is not one the schema cache knows.
    #[error("namespace '{namespace}' is not in the list of valid namespaces: {known:?}")]
    UnknownNamespace {
        /// The rejected namespace.
        namespace: String,
        /// Namespaces that are valid.
        known: Vec<String>,
    },

    /// A document names a schema its namespace does not have.
    #[error("schema '{schema_name}' in namespace '{namespace}' was not found")]
    SchemaNotFound {
        /// Namespace that was searched.
        namespace: String,
        /// The missing schema.
        schema_name: String,
    },

    /// A document failed schema validation.
    #[error("{message}")]
    ValidationFailed {
        /// Single-line diagnostic.
        message: String,
    },

    /// The document name breaks the identifier rule.
    #[error("invalid metadata name {name:?}: {reason}")]
    InvalidName {
        /// The rejected name.
        name: String,
        /// Which part of the rule was broken.
        reason: String,
    },

    /// No document name was given.
    #[error("name of metadata was not provided")]
    MissingName,

    /// No document was given to save.
    #[error("a metadata document was not provided")]
    MissingDocument,

    /// The target exists and replacement was not requested.
    #[error("metadata resource '{}' already exists; use the replace flag to overwrite", path.display())]
    AlreadyExists {
        /// The existing resource.
        path: PathBuf,
    },

    /// No directory in the search path holds the named document.
    #[error("metadata '{name}' in namespace '{namespace}' was not found")]
    NotFound {
        /// The requested name.
        name: String,
        /// The namespace searched.
        namespace: String,
    },

    /// A stored file is not a well-formed document.
    #[error("malformed metadata document: {reason}")]
    Malformed {
        /// Human-readable reason, including the file when known.
        reason: String,
    },

    /// The schema directory or a schema could not be loaded or compiled.
    #[error("schema error: {0}")]
    Schema(String),

    /// Store configuration is incomplete or invalid.
    #[error("configuration error: {reason}")]
    Config {
        /// Human-readable reason.
        reason: String,
    },

    /// Underlying filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<SchemaError> for StoreError {
    fn from(err: SchemaError) -> Self {
        match err {
            SchemaError::UnknownNamespace { namespace, known } => {
                Self::UnknownNamespace { namespace, known }
            }
            SchemaError::SchemaNotFound {
                namespace,
                schema_name,
            } => Self::SchemaNotFound {
                namespace,
                schema_name,
            },
            SchemaError::ValidationFailed { message } => Self::ValidationFailed { message },
            SchemaError::Io(e) => Self::Io(e),
            other @ (SchemaError::SchemaLoad { .. } | SchemaError::SchemaCompile { .. }) => {
                Self::Schema(other.to_string())
            }
        }
    }
}

impl From<DocumentError> for StoreError {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::MissingName => Self::MissingName,
            DocumentError::InvalidName { name, reason } => Self::InvalidName { name, reason },
            other @ (DocumentError::MissingDisplayName | DocumentError::Malformed { .. }) => {
                Self::Malformed {
                    reason: other.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_errors_flatten() {
        let err: StoreError = SchemaError::SchemaNotFound {
            namespace: "runtimes".into(),
            schema_name: "nonexistent".into(),
        }
        .into();
        assert!(matches!(err, StoreError::SchemaNotFound { .. }));

        let err: StoreError = SchemaError::ValidationFailed {
            message: "bad".into(),
        }
        .into();
        assert_eq!(err.to_string(), "bad");

        let err: StoreError = SchemaError::SchemaCompile {
            schema_name: "kfp".into(),
            reason: "oops".into(),
        }
        .into();
        assert!(matches!(err, StoreError::Schema(ref m) if m.contains("kfp")));
    }

    #[test]
    fn document_errors_flatten() {
        let err: StoreError = DocumentError::MissingName.into();
        assert!(matches!(err, StoreError::MissingName));

        let err: StoreError = DocumentError::MissingDisplayName.into();
        assert!(matches!(err, StoreError::Malformed { ref reason } if reason.contains("displayName")));
    }

    #[test]
    fn already_exists_display_names_path() {
        let err = StoreError::AlreadyExists {
            path: PathBuf::from("/m/runtimes/a.json"),
        };
        assert!(err.to_string().contains("/m/runtimes/a.json"));
    }
}
