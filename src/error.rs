//! Error types for settree library

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for settree operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for settree library
#[derive(Error, Debug)]
pub enum Error {
    // -------------------------------------------------------------------------
    // Declaration Errors
    // -------------------------------------------------------------------------
    #[error("Invalid setting key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },

    // -------------------------------------------------------------------------
    // Access Errors
    // -------------------------------------------------------------------------
    #[error("Setting not found: {0}")]
    UnknownSetting(String),

    #[error("Cannot assign a plain value to '{0}': it holds nested settings")]
    AmbiguousSettingValue(String),

    #[error("Setting '{0}' holds a value, not nested settings")]
    NotNested(String),

    // -------------------------------------------------------------------------
    // Loader Errors
    // -------------------------------------------------------------------------
    #[error("Incompatible {format} structure: expected a mapping at the top level, got {found}")]
    IncompatibleStructure { format: String, found: String },

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {format} data: {reason}")]
    Parse { format: String, reason: String },

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Failed to serialize data: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl Error {
    /// Check if this is a "not found" type error
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::UnknownSetting(_) | Error::FileNotFound(_))
    }

    /// Check if this error reports a shape mismatch between a value and the tree
    #[must_use]
    pub fn is_structure_error(&self) -> bool {
        matches!(
            self,
            Error::AmbiguousSettingValue(_)
                | Error::NotNested(_)
                | Error::IncompatibleStructure { .. }
        )
    }

    /// Prefix the setting path carried by access errors with `parent`
    pub(crate) fn within(self, parent: &str) -> Self {
        if parent.is_empty() {
            return self;
        }
        match self {
            Error::UnknownSetting(path) => Error::UnknownSetting(join_path(parent, &path)),
            Error::AmbiguousSettingValue(path) => {
                Error::AmbiguousSettingValue(join_path(parent, &path))
            }
            Error::NotNested(path) => Error::NotNested(join_path(parent, &path)),
            other => other,
        }
    }

    pub(crate) fn parse(format: &str, reason: impl ToString) -> Self {
        Error::Parse {
            format: format.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Join a parent path and a key into the dotted form used in error messages
pub(crate) fn join_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}
