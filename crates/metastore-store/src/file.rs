//! # Filesystem-Backed Store
//!
//! One JSON file per document at `<root>/metadata/<namespace>/<name>.json`.
//!
//! ## Resolution
//!
//! - **Reads** scan every existing directory of the search path in order
//!   and stop at the first file whose base name matches.
//! - **Listings** visit every `*.json` file in every existing directory.
//!   The same name appearing under two roots is listed twice.
//! - **Writes** always target the writable root, creating the namespace
//!   directory on demand.
//!
//! ## Rollback Invariant
//!
//! `save` records whether *it* created the namespace directory. If the
//! written document does not survive re-loading, that directory is removed
//! again; otherwise only the file is. No other operation deletes a
//! directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use metastore_core::{Document, DocumentName, INVALID_REASON_VALIDATION};
use metastore_schema::{SchemaCache, SchemaError, ValidationEngine};
use serde_json::Value;

use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::store::{MetadataStore, SaveOutcome};

/// Create the namespace directory (and parents), owner-only on Unix.
fn create_namespace_dir(dir: &Path) -> io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }
    builder.create(dir)
}

/// `*.json` files directly inside `dir`, sorted by path.
fn json_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) == Some("json") && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn file_stem(path: &Path) -> Option<&str> {
    path.file_stem().and_then(|s| s.to_str())
}

/// Filesystem implementation of [`MetadataStore`].
#[derive(Debug, Clone)]
pub struct FileMetadataStore {
    namespace: String,
    schemas: Arc<SchemaCache>,
    metadata_dir: PathBuf,
    search_dirs: Vec<PathBuf>,
}

impl FileMetadataStore {
    /// Create a store for `namespace`.
    ///
    /// # Errors
    ///
    /// [`StoreError::UnknownNamespace`] if the schema cache has no schemas
    /// for `namespace`. No store is built in that case.
    pub fn new(
        namespace: &str,
        schemas: Arc<SchemaCache>,
        config: &StoreConfig,
    ) -> Result<Self, StoreError> {
        if !schemas.is_valid_namespace(namespace) {
            return Err(StoreError::UnknownNamespace {
                namespace: namespace.to_string(),
                known: schemas.namespaces(),
            });
        }

        let metadata_dir = config.namespace_dir(namespace);
        tracing::debug!(
            namespace,
            metadata_dir = %metadata_dir.display(),
            "namespace is using metadata directory"
        );

        Ok(Self {
            namespace: namespace.to_string(),
            schemas,
            metadata_dir,
            search_dirs: config.search_dirs(namespace),
        })
    }

    /// Every candidate directory, writable one first.
    pub fn search_dirs(&self) -> &[PathBuf] {
        &self.search_dirs
    }

    fn existing_dirs(&self) -> impl Iterator<Item = &PathBuf> {
        self.search_dirs.iter().filter(|d| d.is_dir())
    }

    /// Validate `value` against the schema it names, if any.
    ///
    /// Returns `Ok(Some(tag))` for a validation failure tolerated because
    /// `include_invalid` is set.
    fn check(
        &self,
        name: &str,
        path: &Path,
        value: &Value,
        include_invalid: bool,
    ) -> Result<Option<String>, StoreError> {
        let Some(schema_name) = value
            .get("schemaName")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
        else {
            tracing::debug!(
                path = %path.display(),
                "no schema named in metadata resource, skipping validation"
            );
            return Ok(None);
        };

        let schema = self.schemas.get_schema(&self.namespace, schema_name)?;
        let engine = ValidationEngine::new(self.namespace.as_str())
            .with_references(self.schemas.namespace_schemas(&self.namespace)?);

        match engine.validate(name, schema_name, &schema, value) {
            Ok(()) => Ok(None),
            Err(SchemaError::ValidationFailed { .. }) if include_invalid => {
                Ok(Some(INVALID_REASON_VALIDATION.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Load the document stored at `path`.
    ///
    /// The name is always taken from the file's base name so documents can
    /// be copied between roots without editing their content.
    fn load_resource(
        &self,
        path: &Path,
        validate: bool,
        include_invalid: bool,
    ) -> Result<Document, StoreError> {
        tracing::debug!(path = %path.display(), "loading metadata resource");
        let content = fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&content).map_err(|e| StoreError::Malformed {
            reason: format!("{}: {e}", path.display()),
        })?;

        let name = file_stem(path)
            .ok_or_else(|| StoreError::Malformed {
                reason: format!("{}: file name is not valid UTF-8", path.display()),
            })?
            .to_string();

        let invalid_reason = if validate {
            self.check(&name, path, &value, include_invalid)?
        } else {
            None
        };

        let mut doc = Document::from_value(value).map_err(|e| StoreError::Malformed {
            reason: format!("{}: {e}", path.display()),
        })?;
        doc.name = Some(name);
        doc.resource = Some(path.to_path_buf());
        doc.invalid_reason = invalid_reason;
        Ok(doc)
    }

    /// Find `name` across the search path.
    fn find(&self, name: &str, validate: bool) -> Result<Document, StoreError> {
        for dir in self.existing_dirs() {
            for path in json_files(dir)? {
                if file_stem(&path) == Some(name) {
                    return self.load_resource(&path, validate, false);
                }
            }
        }
        Err(StoreError::NotFound {
            name: name.to_string(),
            namespace: self.namespace.clone(),
        })
    }

    /// Undo a write: drop the directory this call created, else the file.
    fn roll_back(&self, resource: &Path, created_dir: bool) -> io::Result<()> {
        if created_dir {
            fs::remove_dir_all(&self.metadata_dir)
        } else {
            fs::remove_file(resource)
        }
    }
}

impl MetadataStore for FileMetadataStore {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn location(&self) -> &Path {
        &self.metadata_dir
    }

    fn namespace_exists(&self) -> bool {
        self.existing_dirs().next().is_some()
    }

    fn get_all(&self, include_invalid: bool) -> Result<Vec<Document>, StoreError> {
        let mut documents = Vec::new();
        for dir in self.existing_dirs() {
            for path in json_files(dir)? {
                match self.load_resource(&path, true, include_invalid) {
                    Ok(doc) => documents.push(doc),
                    Err(e) => {
                        tracing::debug!(
                            path = %path.display(),
                            error = %e,
                            "skipping metadata resource"
                        );
                    }
                }
            }
        }
        Ok(documents)
    }

    fn read(&self, name: &str) -> Result<Document, StoreError> {
        if name.trim().is_empty() {
            return Err(StoreError::MissingName);
        }
        self.find(name, true)
    }

    fn save(
        &self,
        name: &str,
        document: Option<&Document>,
        replace: bool,
    ) -> Result<SaveOutcome, StoreError> {
        let name = DocumentName::new(name)?;
        let document = document.ok_or(StoreError::MissingDocument)?;
        let contents = document.to_json(true)?;

        let resource = self.metadata_dir.join(name.file_name());
        if resource.exists() {
            if !replace {
                tracing::error!(
                    path = %resource.display(),
                    "metadata resource already exists, use the replace flag to overwrite"
                );
                return Err(StoreError::AlreadyExists { path: resource });
            }
            fs::remove_file(&resource)?;
        }

        let created_dir = !self.metadata_dir.is_dir();
        if created_dir {
            tracing::debug!(
                path = %self.metadata_dir.display(),
                "creating metadata directory"
            );
            create_namespace_dir(&self.metadata_dir)?;
        }

        if let Err(e) = fs::write(&resource, contents) {
            // Same rollback invariant as a rejected document (see module docs).
            if created_dir {
                if let Err(cleanup) = fs::remove_dir_all(&self.metadata_dir) {
                    tracing::warn!(
                        path = %self.metadata_dir.display(),
                        error = %cleanup,
                        "failed to remove metadata directory after write error"
                    );
                }
            }
            return Err(e.into());
        }
        tracing::debug!(path = %resource.display(), "created metadata resource");

        // Re-load with validation so nothing invalid is left behind.
        match self.load_resource(&resource, true, false) {
            Ok(_) => Ok(SaveOutcome::Persisted(resource)),
            Err(err) => {
                tracing::error!(
                    path = %resource.display(),
                    error = %err,
                    "removing metadata resource due to previous error"
                );
                self.roll_back(&resource, created_dir)?;
                match err {
                    StoreError::ValidationFailed { message } => {
                        Ok(SaveOutcome::Rejected { reason: message })
                    }
                    other => Err(other),
                }
            }
        }
    }

    fn remove(&self, name: &str) -> Result<Option<PathBuf>, StoreError> {
        if name.trim().is_empty() {
            return Err(StoreError::MissingName);
        }
        tracing::info!(
            name,
            namespace = %self.namespace,
            "removing metadata resource"
        );

        // Invalid documents must stay removable. The file is deleted where
        // it was found, which may be a read-only root of the search path.
        let doc = match self.find(name, false) {
            Ok(doc) => doc,
            Err(StoreError::NotFound { .. }) => {
                tracing::warn!(
                    name,
                    namespace = %self.namespace,
                    "metadata resource was not found"
                );
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let resource = doc
            .resource
            .unwrap_or_else(|| self.metadata_dir.join(format!("{name}.json")));
        fs::remove_file(&resource)?;
        Ok(Some(resource))
    }
}
