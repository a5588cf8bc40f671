//! # Store Contract
//!
//! [`MetadataStore`] is the CRUD contract every backend implements. The
//! filesystem-backed [`FileMetadataStore`](crate::FileMetadataStore) is the
//! only variant today; the [`MetadataManager`](crate::MetadataManager)
//! accepts any.

use std::path::{Path, PathBuf};

use metastore_core::{Document, DocumentSummary};

use crate::error::StoreError;

/// Result of [`MetadataStore::save`].
///
/// A document that fails validation after being written is not an error:
/// the store cleans up and reports `Rejected`. Callers must check which
/// variant they got.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum SaveOutcome {
    /// The document was written and validated.
    Persisted(PathBuf),
    /// The document failed validation and nothing was kept.
    Rejected {
        /// One-line validation diagnostic.
        reason: String,
    },
}

impl SaveOutcome {
    /// The persisted resource, if any.
    pub fn resource(&self) -> Option<&Path> {
        match self {
            Self::Persisted(path) => Some(path),
            Self::Rejected { .. } => None,
        }
    }

    /// Consume, returning the persisted resource, if any.
    pub fn into_resource(self) -> Option<PathBuf> {
        match self {
            Self::Persisted(path) => Some(path),
            Self::Rejected { .. } => None,
        }
    }

    /// Whether the document was kept.
    pub fn is_persisted(&self) -> bool {
        matches!(self, Self::Persisted(_))
    }
}

/// Namespace-scoped document CRUD.
pub trait MetadataStore: Send + Sync + std::fmt::Debug {
    /// Namespace this store serves.
    fn namespace(&self) -> &str;

    /// Where new documents are written.
    fn location(&self) -> &Path;

    /// Whether any directory in the search path exists for the namespace.
    fn namespace_exists(&self) -> bool;

    /// Every loadable document across the search path.
    ///
    /// Documents failing validation are dropped unless `include_invalid`
    /// is set, in which case they are returned with `invalid_reason` set.
    /// Documents that cannot be loaded at all are always dropped.
    fn get_all(&self, include_invalid: bool) -> Result<Vec<Document>, StoreError>;

    /// Name, display name and location of every listed document.
    fn get_all_summary(&self, include_invalid: bool) -> Result<Vec<DocumentSummary>, StoreError> {
        Ok(self
            .get_all(include_invalid)?
            .into_iter()
            .filter_map(|doc| {
                let name = doc.name?;
                let location = doc
                    .resource
                    .unwrap_or_else(|| self.location().join(format!("{name}.json")));
                Some(DocumentSummary {
                    name,
                    display_name: doc.display_name,
                    location,
                })
            })
            .collect())
    }

    /// Load and validate one document; the first directory holding it wins.
    fn read(&self, name: &str) -> Result<Document, StoreError>;

    /// Write `document` under `name` in the writable location.
    fn save(
        &self,
        name: &str,
        document: Option<&Document>,
        replace: bool,
    ) -> Result<SaveOutcome, StoreError>;

    /// Delete the named document. A missing document is not an error and
    /// yields `Ok(None)`.
    ///
    /// The first file found on the search path is deleted, even when it lives
    /// under a read-only root.
    fn remove(&self, name: &str) -> Result<Option<PathBuf>, StoreError>;
}
