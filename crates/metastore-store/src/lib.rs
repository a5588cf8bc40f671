//! # metastore-store — Namespaced Document Store
//!
//! CRUD over schema-validated JSON documents, one file per document, under
//! `<root>/metadata/<namespace>/<name>.json`.
//!
//! ## Search Path
//!
//! A [`StoreConfig`] names one writable root and any number of read-only
//! roots. Writes go to the writable root; reads and listings consult every
//! root in configured order, writable root first.
//!
//! ## Write Protocol
//!
//! [`MetadataStore::save`] writes the trimmed document, re-loads it with
//! validation, and on failure removes what it wrote: the namespace
//! directory if this call created it, otherwise just the file. A rejected
//! document is reported as [`SaveOutcome::Rejected`], not as an error.
//!
//! ## Concurrency
//!
//! Operations are synchronous and hold no locks over the filesystem.
//! Concurrent writers to the same name may interleave; the last complete
//! write wins, and in rare interleavings no file survives.

pub mod config;
pub mod error;
pub mod file;
pub mod manager;
pub mod store;

// Re-export primary types for ergonomic imports.
pub use config::{StoreConfig, DATA_DIR_ENV_VAR, METADATA_DIR_NAME, SEARCH_PATH_ENV_VAR};
pub use error::StoreError;
pub use file::FileMetadataStore;
pub use manager::MetadataManager;
pub use store::{MetadataStore, SaveOutcome};
