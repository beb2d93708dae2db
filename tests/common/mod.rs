//! Common test utilities for settree integration tests
//!
//! Provides shared schemas, on-disk fixtures, and helper functions.

#![allow(dead_code)]

use serde_json::Value;
use settree::{EnvSource, Schema};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

// =============================================================================
// Test Schemas
// =============================================================================

/// Schema exercising reopening and redefinition in both directions
pub fn simple_schema() -> Schema {
    Schema::builder()
        .nested("serializers", |s| s.setting("json", "native"))
        .unwrap()
        .nested("mutations", |m| m.nested("action", |a| a.setting("query", ())))
        .unwrap()
        // reopen: keeps `json`, adds `xml`
        .nested("serializers", |s| s.setting("xml", "native"))
        .unwrap()
        .nested("defaults", |d| d.setting("test", false))
        .unwrap()
        // nested => value
        .setting("defaults", ())
        .unwrap()
        .setting("shared", true)
        .unwrap()
        // value => nested
        .nested("shared", |s| s.setting("convert", false))
        .unwrap()
        .setting("steps", 22)
        .unwrap()
        .build()
}

/// A single nested block with one value
pub fn database_schema() -> Schema {
    Schema::builder()
        .nested("database", |db| db.setting("hostname", "localhost"))
        .unwrap()
        .build()
}

// =============================================================================
// Test Fixtures
// =============================================================================

/// Path of a checked-in fixture file under `tests/fixtures`
pub fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Temporary directory for settings files written by a test
pub struct TestFixture {
    pub temp_dir: TempDir,
}

impl TestFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self { temp_dir }
    }

    /// Write `content` to `name` inside the fixture directory
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        std::fs::write(&path, content).expect("Failed to write fixture file");
        path
    }

    /// A path inside the fixture directory that does not exist
    pub fn missing(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// An in-memory environment
pub fn env_source(vars: &[(&str, &str)]) -> Arc<dyn EnvSource> {
    let vars: BTreeMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Arc::new(vars)
}

/// Unwrap a JSON object literal into its map
pub fn object(value: Value) -> serde_json::Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}

/// Route library logs to the test output (`RUST_LOG=settree=trace`)
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
