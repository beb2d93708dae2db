//! Setting key validation

use crate::access::PATH_SEPARATOR;
use crate::error::{Error, Result};

/// Check that `key` can be declared as a setting name.
///
/// Keys must be non-empty, must not contain the path separator `.` or control
/// characters, and must not start or end with whitespace.
///
/// # Errors
///
/// Returns [`Error::InvalidKey`] describing the first rule broken.
pub fn validate_key(key: &str) -> Result<()> {
    let reason = if key.is_empty() {
        "key must not be empty"
    } else if key.contains(PATH_SEPARATOR) {
        "key must not contain '.'"
    } else if key.trim() != key {
        "key must not start or end with whitespace"
    } else if key.chars().any(char::is_control) {
        "key must not contain control characters"
    } else {
        return Ok(());
    };

    Err(Error::InvalidKey {
        key: key.to_string(),
        reason: reason.to_string(),
    })
}
