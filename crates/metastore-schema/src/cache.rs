//! # Schema Cache
//!
//! Namespace-indexed store of validation schemas.
//!
//! ## Schema Files
//!
//! Every `*.json` file in the schema directory is parsed. A schema must
//! carry a top-level string `namespace` to be included; files without one
//! are skipped with a warning. The schema's `name` attribute selects its
//! key within the namespace and defaults to the file's base name.
//!
//! ## Testing Namespace
//!
//! Schemas declaring [`NAMESPACE_TESTING`] are dropped unless the cache was
//! built with testing enabled. [`SchemaCache::from_env`] reads
//! [`TESTING_ENV_VAR`] once, at construction; [`SchemaCache::reload`] reuses
//! that decision.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use metastore_core::{NAMESPACE_TESTING, TESTING_ENV_VAR};
use parking_lot::RwLock;
use serde_json::Value;

use crate::error::SchemaError;

/// Namespace → (schema name → schema).
pub type NamespaceSchemas = HashMap<String, HashMap<String, Arc<Value>>>;

/// Interpret a boolean-like environment value.
fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Whether `var` is set to a truthy value.
fn env_flag(var: &str) -> bool {
    std::env::var(var).map(|v| is_truthy(&v)).unwrap_or(false)
}

/// Process-lifetime cache of validation schemas.
///
/// ## Thread Safety
///
/// `SchemaCache` is `Send + Sync`. Reads run concurrently; `add_schema`,
/// `remove_schema` and `reload` serialize on the write lock. Lookups hand
/// out `Arc<Value>` so no lock is held while a caller validates.
pub struct SchemaCache {
    schema_dir: PathBuf,
    testing_enabled: bool,
    namespaces: RwLock<NamespaceSchemas>,
}

impl std::fmt::Debug for SchemaCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaCache")
            .field("schema_dir", &self.schema_dir)
            .field("testing_enabled", &self.testing_enabled)
            .field("namespaces", &self.namespaces())
            .finish()
    }
}

impl SchemaCache {
    /// Build a cache from `schema_dir`, taking the testing toggle from
    /// [`TESTING_ENV_VAR`].
    ///
    /// The variable is read here and only here; changing it later has no
    /// effect on this cache.
    pub fn from_env(schema_dir: impl Into<PathBuf>) -> Result<Self, SchemaError> {
        Self::load(schema_dir, env_flag(TESTING_ENV_VAR))
    }

    /// Build a cache from `schema_dir` with an explicit testing toggle.
    ///
    /// # Errors
    ///
    /// [`SchemaError::SchemaLoad`] if the directory does not exist or a
    /// schema file is not valid JSON.
    pub fn load(
        schema_dir: impl Into<PathBuf>,
        testing_enabled: bool,
    ) -> Result<Self, SchemaError> {
        let schema_dir = schema_dir.into();
        let namespaces = Self::load_namespace_schemas(&schema_dir, testing_enabled)?;
        tracing::debug!(
            schema_dir = %schema_dir.display(),
            namespaces = namespaces.len(),
            testing_enabled,
            "schema cache loaded"
        );
        Ok(Self {
            schema_dir,
            testing_enabled,
            namespaces: RwLock::new(namespaces),
        })
    }

    /// Scan `schema_dir` and build the namespace → schemas mapping.
    ///
    /// Files are visited in name order so that, when two files claim the
    /// same `(namespace, name)`, the result does not depend on directory
    /// enumeration order. The later file wins.
    pub fn load_namespace_schemas(
        schema_dir: &Path,
        testing_enabled: bool,
    ) -> Result<NamespaceSchemas, SchemaError> {
        if !schema_dir.is_dir() {
            return Err(SchemaError::SchemaLoad {
                path: schema_dir.display().to_string(),
                reason: "metadata schema directory was not found".to_string(),
            });
        }

        let mut files = Vec::new();
        for entry in fs::read_dir(schema_dir)? {
            let path = entry?.path();
            if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("json") {
                files.push(path);
            }
        }
        files.sort();

        let mut namespaces: NamespaceSchemas = HashMap::new();
        for path in files {
            let content = fs::read_to_string(&path).map_err(|e| SchemaError::SchemaLoad {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
            let schema: Value =
                serde_json::from_str(&content).map_err(|e| SchemaError::SchemaLoad {
                    path: path.display().to_string(),
                    reason: format!("invalid JSON: {e}"),
                })?;

            let Some(namespace) = schema.get("namespace").and_then(Value::as_str) else {
                tracing::warn!(
                    path = %path.display(),
                    "schema file is missing its namespace attribute, skipping"
                );
                continue;
            };
            if namespace == NAMESPACE_TESTING && !testing_enabled {
                continue;
            }
            let namespace = namespace.to_string();

            let name = match schema.get("name").and_then(Value::as_str) {
                Some(name) => name.to_string(),
                None => match path.file_stem().and_then(|s| s.to_str()) {
                    Some(stem) => stem.to_string(),
                    None => continue,
                },
            };

            namespaces
                .entry(namespace)
                .or_default()
                .insert(name, Arc::new(schema));
        }

        Ok(namespaces)
    }

    /// Directory the cache loads from.
    pub fn schema_dir(&self) -> &Path {
        &self.schema_dir
    }

    /// Whether the testing namespace was admitted at construction.
    pub fn testing_enabled(&self) -> bool {
        self.testing_enabled
    }

    /// Whether `namespace` has loaded schemas.
    pub fn is_valid_namespace(&self, namespace: &str) -> bool {
        self.namespaces.read().contains_key(namespace)
    }

    /// All known namespaces, sorted.
    pub fn namespaces(&self) -> Vec<String> {
        let mut names: Vec<String> = self.namespaces.read().keys().cloned().collect();
        names.sort();
        names
    }

    fn unknown_namespace(&self, namespace: &str) -> SchemaError {
        SchemaError::UnknownNamespace {
            namespace: namespace.to_string(),
            known: self.namespaces(),
        }
    }

    /// All schemas of `namespace`, keyed by name.
    pub fn namespace_schemas(
        &self,
        namespace: &str,
    ) -> Result<BTreeMap<String, Arc<Value>>, SchemaError> {
        tracing::debug!(namespace, "fetching all schemas of namespace");
        let found = self.namespaces.read().get(namespace).map(|schemas| {
            schemas
                .iter()
                .map(|(name, schema)| (name.clone(), Arc::clone(schema)))
                .collect()
        });
        found.ok_or_else(|| self.unknown_namespace(namespace))
    }

    /// Look up one schema.
    ///
    /// # Errors
    ///
    /// [`SchemaError::UnknownNamespace`] or [`SchemaError::SchemaNotFound`].
    pub fn get_schema(&self, namespace: &str, schema_name: &str) -> Result<Arc<Value>, SchemaError> {
        tracing::debug!(namespace, schema_name, "fetching schema");
        let lookup = {
            let guard = self.namespaces.read();
            guard
                .get(namespace)
                .map(|schemas| schemas.get(schema_name).cloned())
        };
        match lookup {
            Some(Some(schema)) => Ok(schema),
            Some(None) => Err(SchemaError::SchemaNotFound {
                namespace: namespace.to_string(),
                schema_name: schema_name.to_string(),
            }),
            None => Err(self.unknown_namespace(namespace)),
        }
    }

    /// Add or replace a schema in memory. Nothing is written to disk.
    pub fn add_schema(
        &self,
        namespace: &str,
        schema_name: &str,
        schema: Value,
    ) -> Result<(), SchemaError> {
        let added = {
            let mut guard = self.namespaces.write();
            guard.get_mut(namespace).map(|schemas| {
                schemas.insert(schema_name.to_string(), Arc::new(schema));
            })
        };
        match added {
            Some(()) => {
                tracing::debug!(namespace, schema_name, "added schema");
                Ok(())
            }
            None => Err(self.unknown_namespace(namespace)),
        }
    }

    /// Remove a schema from memory, returning it if it was present.
    pub fn remove_schema(
        &self,
        namespace: &str,
        schema_name: &str,
    ) -> Result<Option<Arc<Value>>, SchemaError> {
        let removed = {
            let mut guard = self.namespaces.write();
            guard
                .get_mut(namespace)
                .map(|schemas| schemas.remove(schema_name))
        };
        match removed {
            Some(schema) => {
                tracing::debug!(namespace, schema_name, "removed schema");
                Ok(schema)
            }
            None => Err(self.unknown_namespace(namespace)),
        }
    }

    /// Re-scan the schema directory, discarding every in-memory change.
    ///
    /// The directory is scanned before the write lock is taken; on error the
    /// current contents are left untouched.
    pub fn reload(&self) -> Result<(), SchemaError> {
        tracing::debug!(schema_dir = %self.schema_dir.display(), "reloading all schemas");
        let fresh = Self::load_namespace_schemas(&self.schema_dir, self.testing_enabled)?;
        *self.namespaces.write() = fresh;
        Ok(())
    }
}
