//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use metastore_core::Document;
use metastore_schema::SchemaCache;
use metastore_store::{MetadataManager, StoreConfig};
use serde_json::{Map, Value};

/// Find the repository root.
pub fn repo_root() -> PathBuf {
    let mut dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    dir.pop(); // crates/
    dir.pop(); // repo root
    dir
}

/// The factory schemas shipped with the repository.
pub fn schema_dir() -> PathBuf {
    repo_root().join("schemas")
}

/// Route `tracing` output through the test harness. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Factory schemas with the testing namespace enabled.
pub fn schemas() -> Arc<SchemaCache> {
    Arc::new(SchemaCache::load(schema_dir(), true).unwrap())
}

pub fn manager(namespace: &str, config: &StoreConfig) -> MetadataManager {
    MetadataManager::new(namespace, schemas(), config).unwrap()
}

pub fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

/// A `kfp` runtime document pointing at `endpoint`.
pub fn kfp_runtime(display_name: &str, endpoint: &str) -> Document {
    Document::new(display_name, object(serde_json::json!({ "api_endpoint": endpoint })))
        .with_schema_name("kfp")
}
