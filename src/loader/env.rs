//! Environment variable loader
//!
//! Collects variables (optionally filtered by a prefix) into a flat mapping
//! and, unless disabled, infers a typed value for each with
//! [`convert_value`](crate::convert_value).

use crate::convert::convert_value;
use log::debug;
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

/// Source of environment-like key/value pairs
pub trait EnvSource: Send + Sync {
    /// All variables visible to this source
    fn vars(&self) -> Vec<(String, String)>;
}

/// The process environment. Variables that are not valid unicode are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultEnvSource;

impl EnvSource for DefaultEnvSource {
    fn vars(&self) -> Vec<(String, String)> {
        std::env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
            .collect()
    }
}

impl EnvSource for HashMap<String, String> {
    fn vars(&self) -> Vec<(String, String)> {
        self.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }
}

impl EnvSource for BTreeMap<String, String> {
    fn vars(&self) -> Vec<(String, String)> {
        self.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }
}

/// Which variables to take
#[derive(Debug, Clone)]
pub enum EnvPrefix {
    /// Names starting with this string
    Literal(String),
    /// Names matching this pattern anywhere
    Pattern(Regex),
}

impl EnvPrefix {
    fn matches(&self, name: &str) -> bool {
        match self {
            EnvPrefix::Literal(prefix) => name.starts_with(prefix.as_str()),
            EnvPrefix::Pattern(pattern) => pattern.is_match(name),
        }
    }

    /// Remove the first occurrence of the prefix from `name`
    fn trim<'n>(&self, name: &'n str) -> std::borrow::Cow<'n, str> {
        match self {
            EnvPrefix::Literal(prefix) => name.strip_prefix(prefix.as_str()).unwrap_or(name).into(),
            EnvPrefix::Pattern(pattern) => pattern.replace(name, ""),
        }
    }
}

impl fmt::Display for EnvPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvPrefix::Literal(prefix) => f.write_str(prefix),
            EnvPrefix::Pattern(pattern) => write!(f, "/{}/", pattern.as_str()),
        }
    }
}

/// Load settings from environment variables
///
/// # Example
///
/// ```rust
/// use settree::LoadInstruction;
/// use std::collections::BTreeMap;
/// use std::sync::Arc;
/// use serde_json::json;
///
/// let vars = BTreeMap::from([
///     ("APP_PORT".to_string(), "8080".to_string()),
///     ("APP_HOSTS".to_string(), "a, b".to_string()),
///     ("HOME".to_string(), "/root".to_string()),
/// ]);
///
/// let env = LoadInstruction::env()
///     .prefix("APP_")
///     .trim_prefix(true)
///     .source(Arc::new(vars));
///
/// let map = env.load();
/// assert_eq!(map.get("PORT"), Some(&json!(8080)));
/// assert_eq!(map.get("HOSTS"), Some(&json!(["a", "b"])));
/// assert!(map.get("HOME").is_none());
/// ```
#[derive(Clone)]
pub struct EnvLoad {
    prefix: Option<EnvPrefix>,
    trim_prefix: bool,
    convert_values: bool,
    source: Arc<dyn EnvSource>,
}

impl fmt::Debug for EnvLoad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvLoad")
            .field("prefix", &self.prefix)
            .field("trim_prefix", &self.trim_prefix)
            .field("convert_values", &self.convert_values)
            .field("source", &"Arc<dyn EnvSource>")
            .finish()
    }
}

impl Default for EnvLoad {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvLoad {
    /// Take every variable of the process environment, converting values
    pub fn new() -> Self {
        Self {
            prefix: None,
            trim_prefix: false,
            convert_values: true,
            source: Arc::new(DefaultEnvSource),
        }
    }

    /// Only take variables whose name starts with `prefix`
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(EnvPrefix::Literal(prefix.into()));
        self
    }

    /// Only take variables whose name matches `pattern`
    #[must_use]
    pub fn prefix_pattern(mut self, pattern: Regex) -> Self {
        self.prefix = Some(EnvPrefix::Pattern(pattern));
        self
    }

    /// Strip the prefix from the resulting keys
    #[must_use]
    pub fn trim_prefix(mut self, trim: bool) -> Self {
        self.trim_prefix = trim;
        self
    }

    /// Infer typed values (`true`, default) or keep raw strings (`false`)
    #[must_use]
    pub fn convert_values(mut self, convert: bool) -> Self {
        self.convert_values = convert;
        self
    }

    /// Read variables from `source` instead of the process environment
    #[must_use]
    pub fn source(mut self, source: Arc<dyn EnvSource>) -> Self {
        self.source = source;
        self
    }

    pub(crate) fn prefix_ref(&self) -> Option<&EnvPrefix> {
        self.prefix.as_ref()
    }

    /// Collect the matching variables into a flat mapping, sorted by name
    pub fn load(&self) -> Map<String, Value> {
        let mut vars: Vec<(String, String)> = self
            .source
            .vars()
            .into_iter()
            .filter(|(name, _)| self.prefix.as_ref().is_none_or(|p| p.matches(name)))
            .collect();
        vars.sort_by(|a, b| a.0.cmp(&b.0));

        let mut map = Map::new();
        for (name, raw) in vars {
            let key = match (&self.prefix, self.trim_prefix) {
                (Some(prefix), true) => prefix.trim(&name).into_owned(),
                _ => name,
            };
            if key.is_empty() {
                debug!("Skipping environment variable that is only a prefix");
                continue;
            }
            let value = if self.convert_values {
                convert_value(&raw)
            } else {
                Value::String(raw)
            };
            map.insert(key, value);
        }
        debug!("Collected {} environment variables", map.len());
        map
    }
}
