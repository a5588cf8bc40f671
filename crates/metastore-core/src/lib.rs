//! # metastore-core — Foundational Types for the Metadata Store
//!
//! This crate defines the data model shared by every other crate in the
//! workspace. It depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Validated names.** A [`DocumentName`] can only be constructed through
//!    its validating constructor, so a store never touches the filesystem with
//!    an identifier that breaks the naming rule.
//!
//! 2. **Derived fields are never persisted.** A [`Document`]'s `name`,
//!    `resource` and `invalid_reason` are reconstructed on every load. Only
//!    the trimmed form (`displayName`, `schemaName`, `properties`) is written.
//!
//! 3. **Namespaces are plain identifiers.** The set of valid namespaces is
//!    owned by the schema cache; this crate only names the built-in ones.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `metastore-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod document;
pub mod error;
pub mod name;
pub mod namespace;

// Re-export primary types for ergonomic imports.
pub use document::{Document, DocumentSummary, DEFAULT_SCHEMA_NAME, INVALID_REASON_VALIDATION};
pub use error::DocumentError;
pub use name::DocumentName;
pub use namespace::{
    NAMESPACE_CODE_SNIPPETS, NAMESPACE_RUNTIMES, NAMESPACE_TESTING, TESTING_ENV_VAR,
};
