//! # Store Configuration
//!
//! Resolves the ordered list of root directories a store consults.
//!
//! | Variable | Meaning |
//! |----------|---------|
//! | `METASTORE_DATA_DIR` | Writable data root. Required by [`StoreConfig::from_env`]. |
//! | `METASTORE_PATH` | Extra read-only roots, in platform path-list syntax. |

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::StoreError;

/// Environment variable naming the writable data root.
pub const DATA_DIR_ENV_VAR: &str = "METASTORE_DATA_DIR";

/// Environment variable listing additional read-only roots.
pub const SEARCH_PATH_ENV_VAR: &str = "METASTORE_PATH";

/// Directory under each root that holds the namespace directories.
pub const METADATA_DIR_NAME: &str = "metadata";

/// Writable root plus ordered read-only roots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Root that receives writes. Consulted first on reads.
    pub data_root: PathBuf,
    /// Read-only roots, consulted after `data_root` in this order.
    pub search_roots: Vec<PathBuf>,
}

impl StoreConfig {
    /// Configuration with a writable root and no read-only roots.
    pub fn new(data_root: impl Into<PathBuf>) -> Self {
        Self {
            data_root: data_root.into(),
            search_roots: Vec::new(),
        }
    }

    /// Append a read-only root.
    pub fn with_search_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.search_roots.push(root.into());
        self
    }

    /// Read [`DATA_DIR_ENV_VAR`] and [`SEARCH_PATH_ENV_VAR`].
    pub fn from_env() -> Result<Self, StoreError> {
        Self::from_vars(
            std::env::var_os(DATA_DIR_ENV_VAR),
            std::env::var_os(SEARCH_PATH_ENV_VAR),
        )
    }

    /// Build from raw variable values. Empty entries in the path list are
    /// ignored.
    pub fn from_vars(
        data_dir: Option<OsString>,
        search_path: Option<OsString>,
    ) -> Result<Self, StoreError> {
        let data_root = data_dir
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .ok_or_else(|| StoreError::Config {
                reason: format!("{DATA_DIR_ENV_VAR} is not set"),
            })?;

        let search_roots = search_path
            .map(|paths| {
                std::env::split_paths(&paths)
                    .filter(|p| !p.as_os_str().is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            data_root,
            search_roots,
        })
    }

    /// Writable directory for `namespace`.
    pub fn namespace_dir(&self, namespace: &str) -> PathBuf {
        namespace_dir_in(&self.data_root, namespace)
    }

    /// Every candidate directory for `namespace`, writable one first.
    pub fn search_dirs(&self, namespace: &str) -> Vec<PathBuf> {
        std::iter::once(&self.data_root)
            .chain(self.search_roots.iter())
            .map(|root| namespace_dir_in(root, namespace))
            .collect()
    }
}

fn namespace_dir_in(root: &Path, namespace: &str) -> PathBuf {
    root.join(METADATA_DIR_NAME).join(namespace)
}
