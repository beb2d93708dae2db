//! Type inference for raw string values
//!
//! Environment variables only carry strings. [`convert_value`] turns such a
//! string into the most specific JSON value it looks like, trying each rule
//! in order and stopping at the first match:
//!
//! 1. all digits → integer
//! 2. digits, dot, digits → float
//! 3. `t` / `true` / `f` / `false` (any case) → boolean
//! 4. wrapped in matching `'...'` or `"..."` → the unquoted string, as-is
//! 5. contains a comma and is not wrapped in quotes → array, each part converted
//! 6. anything else → the original string
//!
//! ```
//! use settree::convert_value;
//! use serde_json::json;
//!
//! assert_eq!(convert_value("123"), json!(123));
//! assert_eq!(convert_value("'a,b'"), json!("a,b"));
//! assert_eq!(convert_value("a, b"), json!(["a", "b"]));
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Number, Value};

static INTEGER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\A\d+\z").expect("valid integer regex"));
static FLOAT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\A\d+\.\d+\z").expect("valid float regex"));
static TRUE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\A(t|true)\z").expect("valid true regex"));
static FALSE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\A(f|false)\z").expect("valid false regex"));

// First and last characters must not be quotes, with a comma somewhere between.
static ARRAY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?s)\A[^'"].*,.*[^'"]\z"#).expect("valid array regex"));
static ARRAY_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*,\s*").expect("valid array separator regex"));

/// Convert a raw string into an inferred JSON value.
pub fn convert_value(raw: &str) -> Value {
    if INTEGER_PATTERN.is_match(raw) {
        // Too large for u64: keep the digits as written
        return raw
            .parse::<u64>()
            .map_or_else(|_| Value::String(raw.to_string()), Value::from);
    }

    if FLOAT_PATTERN.is_match(raw) {
        return raw
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map_or_else(|| Value::String(raw.to_string()), Value::Number);
    }

    if TRUE_PATTERN.is_match(raw) {
        return Value::Bool(true);
    }

    if FALSE_PATTERN.is_match(raw) {
        return Value::Bool(false);
    }

    if let Some(unquoted) = unquote(raw) {
        return Value::String(unquoted.to_string());
    }

    if ARRAY_PATTERN.is_match(raw) {
        let mut parts: Vec<&str> = ARRAY_SEPARATOR.split(raw).collect();
        // Trailing empty parts are dropped; leading and inner ones are kept
        while parts.last().is_some_and(|part| part.is_empty()) {
            parts.pop();
        }
        return Value::Array(parts.into_iter().map(convert_value).collect());
    }

    Value::String(raw.to_string())
}

/// Convert every value of a flat string mapping, leaving keys untouched.
pub fn convert_values<I, K, V>(pairs: I) -> Map<String, Value>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: AsRef<str>,
{
    pairs
        .into_iter()
        .map(|(key, value)| (key.into(), convert_value(value.as_ref())))
        .collect()
}

/// Strip exactly one pair of matching quotes, if the whole string is wrapped in them
fn unquote(raw: &str) -> Option<&str> {
    let first = raw.chars().next()?;
    if !(first == '\'' || first == '"') || raw.len() < 2 || !raw.ends_with(first) {
        return None;
    }
    Some(&raw[1..raw.len() - 1])
}
