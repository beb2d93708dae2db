//! Loaders feeding plain mappings into a settings tree
//!
//! Every loader produces a `serde_json::Map`; the tree only ever sees that
//! mapping and deep merges it (see [`crate::tree`]).
//!
//! - [`FileLoad`] - a JSON / YAML / TOML file, strict or lenient about missing files
//! - [`EnvLoad`] - environment variables, optionally prefixed and type-converted
//! - [`LoadInstruction::map`] - an inline mapping

mod env;
mod format;

pub use env::{DefaultEnvSource, EnvLoad, EnvPrefix, EnvSource};
pub use format::{FileFormat, FormatBackend, JsonFormat};

#[cfg(feature = "toml")]
pub use format::TomlFormat;
#[cfg(feature = "yaml")]
pub use format::YamlFormat;

use crate::error::{Error, Result};
use crate::tree::describe;
use log::info;
use serde_json::{Map, Value};
use std::fmt;
use std::path::{Path, PathBuf};

/// A source of settings to merge into a tree
#[derive(Debug, Clone)]
pub enum LoadInstruction {
    File(FileLoad),
    Env(EnvLoad),
    Map(Value),
}

impl LoadInstruction {
    /// Load a file, format inferred from its extension
    pub fn file(path: impl Into<PathBuf>) -> FileLoad {
        FileLoad::new(path)
    }

    /// Load environment variables
    pub fn env() -> EnvLoad {
        EnvLoad::new()
    }

    /// Merge an inline value; it must be a mapping
    pub fn map(value: impl Into<Value>) -> Self {
        LoadInstruction::Map(value.into())
    }

    /// Produce the plain mapping for this source
    ///
    /// # Errors
    ///
    /// * [`Error::FileNotFound`] for a missing file in strict mode
    /// * [`Error::FileRead`] / [`Error::Parse`] for unreadable or malformed files
    /// * [`Error::IncompatibleStructure`] if the top level is not a mapping
    pub fn load(&self) -> Result<Map<String, Value>> {
        match self {
            LoadInstruction::File(file) => file.load(),
            LoadInstruction::Env(env) => Ok(env.load()),
            LoadInstruction::Map(value) => expect_mapping("inline", value.clone()),
        }
    }
}

impl fmt::Display for LoadInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadInstruction::File(file) => write!(f, "file '{}'", file.path.display()),
            LoadInstruction::Env(env) => match env.prefix_ref() {
                Some(prefix) => write!(f, "environment ({prefix})"),
                None => write!(f, "environment"),
            },
            LoadInstruction::Map(_) => write!(f, "inline mapping"),
        }
    }
}

impl From<FileLoad> for LoadInstruction {
    fn from(file: FileLoad) -> Self {
        LoadInstruction::File(file)
    }
}

impl From<EnvLoad> for LoadInstruction {
    fn from(env: EnvLoad) -> Self {
        LoadInstruction::Env(env)
    }
}

impl From<Map<String, Value>> for LoadInstruction {
    fn from(map: Map<String, Value>) -> Self {
        LoadInstruction::Map(Value::Object(map))
    }
}

// =============================================================================
// File Loader
// =============================================================================

/// Load settings from a file
#[derive(Debug, Clone)]
pub struct FileLoad {
    path: PathBuf,
    format: Option<FileFormat>,
    strict: bool,
}

impl FileLoad {
    /// Create a strict file load for `path`
    ///
    /// Supports `~` expansion for home directory.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: expand_home(path.into()),
            format: None,
            strict: true,
        }
    }

    /// Fail on a missing file (`true`, default) or load nothing (`false`)
    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Force a format instead of inferring it from the extension
    #[must_use]
    pub fn format(mut self, format: FileFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Path that will be read
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a missing file is an error
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Format used to parse the file
    pub fn resolved_format(&self) -> FileFormat {
        self.format
            .unwrap_or_else(|| FileFormat::from_path(&self.path).unwrap_or_default())
    }

    /// Read, parse and shape-check the file
    ///
    /// # Errors
    ///
    /// See [`LoadInstruction::load`].
    pub fn load(&self) -> Result<Map<String, Value>> {
        let format = self.resolved_format();
        let backend = format.backend();
        match backend.read(&self.path) {
            Ok(value) => expect_mapping(backend.name(), value),
            Err(Error::FileNotFound(path)) if !self.strict => {
                info!("Skipping missing file '{}' (non-strict)", path.display());
                Ok(Map::new())
            }
            Err(e) => Err(e),
        }
    }
}

/// Require a mapping at the top level of loaded data
pub(crate) fn expect_mapping(format: &str, value: Value) -> Result<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(Error::IncompatibleStructure {
            format: format.to_string(),
            found: describe(&other).to_string(),
        }),
    }
}

fn expand_home(path: PathBuf) -> PathBuf {
    if !path.starts_with("~") {
        return path;
    }
    match dirs::home_dir() {
        Some(home) => home.join(path.strip_prefix("~").unwrap_or(&path)),
        None => path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_inline_map_must_be_mapping() {
        let map = LoadInstruction::map(json!({"a": 1})).load().unwrap();
        assert_eq!(map.get("a"), Some(&json!(1)));

        let err = LoadInstruction::map(json!([1, 2])).load().unwrap_err();
        assert!(matches!(err, Error::IncompatibleStructure { ref found, .. } if found == "an array"));
    }

    #[test]
    fn test_missing_file_strict_and_lenient() {
        let strict = LoadInstruction::file("/nonexistent/settings.json");
        assert!(matches!(strict.load(), Err(Error::FileNotFound(_))));

        let lenient = LoadInstruction::file("/nonexistent/settings.json").strict(false);
        assert!(lenient.load().unwrap().is_empty());
    }

    #[test]
    fn test_file_top_level_must_be_mapping() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("array.json");
        std::fs::write(&path, "[1, 2, 3]").unwrap();

        let err = LoadInstruction::file(&path).load().unwrap_err();
        assert!(matches!(err, Error::IncompatibleStructure { ref format, .. } if format == "JSON"));
    }

    #[test]
    fn test_file_keeps_document_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ordered.json");
        std::fs::write(&path, r#"{"zeta": 1, "alpha": 2, "mid": 3}"#).unwrap();

        let map = LoadInstruction::file(&path).load().unwrap();
        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_home_expansion() {
        let file = FileLoad::new("~/settings.json");
        if let Some(home) = dirs::home_dir() {
            assert_eq!(file.path(), home.join("settings.json"));
        }
    }

    #[test]
    fn test_display() {
        let file: LoadInstruction = LoadInstruction::file("/tmp/a.json").into();
        assert_eq!(file.to_string(), "file '/tmp/a.json'");
        let env: LoadInstruction = LoadInstruction::env().prefix("APP_").into();
        assert_eq!(env.to_string(), "environment (APP_)");
    }
}
