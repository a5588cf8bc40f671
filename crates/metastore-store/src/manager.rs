//! # Metadata Manager
//!
//! Thin facade over one [`MetadataStore`] per namespace. It adds no
//! invariants of its own.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use metastore_core::{Document, DocumentSummary};
use metastore_schema::SchemaCache;

use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::file::FileMetadataStore;
use crate::store::{MetadataStore, SaveOutcome};

/// Caller-facing API for one namespace.
#[derive(Debug)]
pub struct MetadataManager {
    store: Box<dyn MetadataStore>,
}

impl MetadataManager {
    /// Manager backed by a [`FileMetadataStore`].
    ///
    /// # Errors
    ///
    /// [`StoreError::UnknownNamespace`] if `namespace` has no schemas.
    pub fn new(
        namespace: &str,
        schemas: Arc<SchemaCache>,
        config: &StoreConfig,
    ) -> Result<Self, StoreError> {
        let store = FileMetadataStore::new(namespace, schemas, config)?;
        Ok(Self::with_store(Box::new(store)))
    }

    /// Manager backed by any store implementation.
    pub fn with_store(store: Box<dyn MetadataStore>) -> Self {
        Self { store }
    }

    /// Namespace this manager serves.
    pub fn namespace(&self) -> &str {
        self.store.namespace()
    }

    /// Directory new documents are written to.
    pub fn location(&self) -> &Path {
        self.store.location()
    }

    /// Whether any directory in the search path exists for the namespace.
    pub fn namespace_exists(&self) -> bool {
        self.store.namespace_exists()
    }

    /// Every listed document; see [`MetadataStore::get_all`].
    pub fn get_all(&self, include_invalid: bool) -> Result<Vec<Document>, StoreError> {
        self.store.get_all(include_invalid)
    }

    /// Name, display name and location of every listed document.
    pub fn get_all_summary(
        &self,
        include_invalid: bool,
    ) -> Result<Vec<DocumentSummary>, StoreError> {
        self.store.get_all_summary(include_invalid)
    }

    /// Load and validate one document by name.
    pub fn get(&self, name: &str) -> Result<Document, StoreError> {
        self.store.read(name)
    }

    /// Save `document` under `name`. Check the returned [`SaveOutcome`]:
    /// a document that fails validation is reported there, not as an error.
    pub fn add(
        &self,
        name: &str,
        document: &Document,
        replace: bool,
    ) -> Result<SaveOutcome, StoreError> {
        self.store.save(name, Some(document), replace)
    }

    /// Delete the named document. Yields `Ok(None)` if it does not exist.
    pub fn remove(&self, name: &str) -> Result<Option<PathBuf>, StoreError> {
        self.store.remove(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use serde_json::Map;
    use std::collections::HashMap;

    /// In-memory store, to show the manager forwards to any backend.
    #[derive(Debug, Default)]
    struct MemoryStore {
        docs: Mutex<HashMap<String, Document>>,
    }

    impl MetadataStore for MemoryStore {
        fn namespace(&self) -> &str {
            "runtimes"
        }

        fn location(&self) -> &Path {
            Path::new("/memory/runtimes")
        }

        fn namespace_exists(&self) -> bool {
            !self.docs.lock().is_empty()
        }

        fn get_all(&self, _include_invalid: bool) -> Result<Vec<Document>, StoreError> {
            Ok(self.docs.lock().values().cloned().collect())
        }

        fn read(&self, name: &str) -> Result<Document, StoreError> {
            self.docs
                .lock()
                .get(name)
                .cloned()
                .ok_or_else(|| StoreError::NotFound {
                    name: name.to_string(),
                    namespace: "runtimes".to_string(),
                })
        }

        fn save(
            &self,
            name: &str,
            document: Option<&Document>,
            _replace: bool,
        ) -> Result<SaveOutcome, StoreError> {
            let mut doc = document.cloned().ok_or(StoreError::MissingDocument)?;
            let resource = self.location().join(format!("{name}.json"));
            doc.name = Some(name.to_string());
            doc.resource = Some(resource.clone());
            self.docs.lock().insert(name.to_string(), doc);
            Ok(SaveOutcome::Persisted(resource))
        }

        fn remove(&self, name: &str) -> Result<Option<PathBuf>, StoreError> {
            Ok(self.docs.lock().remove(name).and_then(|d| d.resource))
        }
    }

    #[test]
    fn forwards_to_store() {
        let manager = MetadataManager::with_store(Box::<MemoryStore>::default());
        assert_eq!(manager.namespace(), "runtimes");
        assert_eq!(manager.location(), Path::new("/memory/runtimes"));
        assert!(!manager.namespace_exists());

        let doc = Document::new("A", Map::new());
        let outcome = manager.add("a", &doc, true).unwrap();
        assert!(outcome.is_persisted());
        assert!(manager.namespace_exists());
        assert_eq!(manager.get("a").unwrap().display_name, "A");

        let summary = manager.get_all_summary(false).unwrap();
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].location, PathBuf::from("/memory/runtimes/a.json"));

        assert!(manager.remove("a").unwrap().is_some());
        assert!(manager.remove("a").unwrap().is_none());
        assert!(manager.get_all(false).unwrap().is_empty());
    }
}
