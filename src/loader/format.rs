//! File format backends
//!
//! Each backend turns file contents into a `serde_json::Value`; shape checks
//! happen in the caller.

use crate::error::{Error, Result};
use serde_json::Value;
use std::path::Path;

/// Trait for file format backends
///
/// This allows adding formats without touching the tree or merge code.
pub trait FormatBackend: Send + Sync {
    /// Human readable format name (e.g., "JSON")
    fn name(&self) -> &str;

    /// File extensions handled by this format, lowercase, without the dot
    fn extensions(&self) -> &[&str];

    /// Parse file contents into a value
    fn parse(&self, content: &str) -> Result<Value>;

    /// Read and parse a file
    ///
    /// A missing file is reported as [`Error::FileNotFound`] so callers can
    /// decide whether it is fatal.
    fn read(&self, path: &Path) -> Result<Value> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound(path.to_path_buf())
            } else {
                Error::FileRead {
                    path: path.to_path_buf(),
                    source: e,
                }
            }
        })?;
        self.parse(&content)
    }
}

// =============================================================================
// Format Selection
// =============================================================================

/// Supported file formats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FileFormat {
    #[default]
    Json,
    #[cfg(feature = "yaml")]
    Yaml,
    #[cfg(feature = "toml")]
    Toml,
}

impl FileFormat {
    /// Infer the format from a path's extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|format| format.backend().extensions().contains(&extension.as_str()))
    }

    /// Every format compiled into this build
    pub fn all() -> &'static [FileFormat] {
        &[
            FileFormat::Json,
            #[cfg(feature = "yaml")]
            FileFormat::Yaml,
            #[cfg(feature = "toml")]
            FileFormat::Toml,
        ]
    }

    /// Backend implementing this format
    pub fn backend(self) -> &'static dyn FormatBackend {
        match self {
            FileFormat::Json => &JsonFormat,
            #[cfg(feature = "yaml")]
            FileFormat::Yaml => &YamlFormat,
            #[cfg(feature = "toml")]
            FileFormat::Toml => &TomlFormat,
        }
    }
}

// =============================================================================
// JSON Format
// =============================================================================

/// JSON format backend (always available)
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormat;

impl FormatBackend for JsonFormat {
    fn name(&self) -> &str {
        "JSON"
    }

    fn extensions(&self) -> &[&str] {
        &["json"]
    }

    fn parse(&self, content: &str) -> Result<Value> {
        serde_json::from_str(content).map_err(|e| Error::parse(self.name(), e))
    }
}

// =============================================================================
// YAML Format
// =============================================================================

/// YAML format backend
///
/// An empty document (blank, comments only, or a bare null) loads as an
/// empty mapping.
#[cfg(feature = "yaml")]
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlFormat;

#[cfg(feature = "yaml")]
impl FormatBackend for YamlFormat {
    fn name(&self) -> &str {
        "YAML"
    }

    fn extensions(&self) -> &[&str] {
        &["yaml", "yml"]
    }

    fn parse(&self, content: &str) -> Result<Value> {
        if content.trim().is_empty() {
            return Ok(Value::Object(serde_json::Map::new()));
        }
        // A document of only comments or `~` parses to null
        match serde_yaml::from_str(content).map_err(|e| Error::parse(self.name(), e))? {
            Value::Null => Ok(Value::Object(serde_json::Map::new())),
            value => Ok(value),
        }
    }
}

// =============================================================================
// TOML Format
// =============================================================================

/// TOML format backend
#[cfg(feature = "toml")]
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlFormat;

#[cfg(feature = "toml")]
impl FormatBackend for TomlFormat {
    fn name(&self) -> &str {
        "TOML"
    }

    fn extensions(&self) -> &[&str] {
        &["toml"]
    }

    fn parse(&self, content: &str) -> Result<Value> {
        toml::from_str(content).map_err(|e| Error::parse(self.name(), e))
    }
}

// =============================================================================
// Tests
// =============================================================================
