//! # metastore-schema — Schema Cache & Validation
//!
//! Loads the factory JSON schemas, indexes them by `(namespace, name)`, and
//! validates documents against them.
//!
//! ## Responsibilities
//!
//! - **Schema cache:** [`SchemaCache`] scans a schema directory once,
//!   keeping every schema that declares a `namespace`. The set of namespaces
//!   found there is the set of valid namespaces for the process. The cache
//!   never refreshes on its own; [`SchemaCache::reload`] exists for tests
//!   and bootstrapping.
//!
//! - **Validation:** [`ValidationEngine`] applies draft-7 structural and
//!   format validation and reports the first failure as a single line.
//!
//! ## Design
//!
//! The cache is an explicitly constructed object shared by reference
//! (`Arc<SchemaCache>`), not a global. Its map sits behind a
//! `parking_lot::RwLock`: lookups take the read lock, and
//! add/remove/reload take the write lock, so mutation is single-writer.
//!
//! `$ref`s between schemas resolve against the cached schemas of the same
//! namespace only. Nothing is ever fetched over the network.

pub mod cache;
pub mod error;
pub mod validate;

// Re-export primary types for ergonomic imports.
pub use cache::{NamespaceSchemas, SchemaCache};
pub use error::SchemaError;
pub use validate::ValidationEngine;
