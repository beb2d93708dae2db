//! Access proxies over a settings tree
//!
//! [`Settings`] (read) and [`SettingsMut`] (read/write) wrap a borrowed
//! [`SettingNode`] and offer two interchangeable ways to reach a setting:
//!
//! - **Index-style**, one key per call: `settings.at("serializers")?.get("json")?`,
//!   `settings_mut.at("serializers")?.set("json", "oj")?`
//! - **Attribute-style**, a dotted path where every segment is one hop:
//!   `settings.fetch("serializers.json")?`, `settings_mut.assign("serializers.json", "oj")?`
//!
//! Both go through [`SettingNode::get`] / [`SettingNode::set`], so they raise the
//! same errors, and a rejected write leaves the tree untouched.
//!
//! ```
//! use settree::{Config, Schema};
//! use serde_json::json;
//!
//! # fn main() -> settree::Result<()> {
//! let schema = Schema::builder()
//!     .nested("serializers", |s| s.setting("json", "native"))?
//!     .build();
//! let mut config = Config::new(&schema)?;
//!
//! config.settings_mut().at("serializers")?.set("json", "oj")?;
//! assert_eq!(config.settings().fetch("serializers.json")?, json!("oj"));
//! # Ok(())
//! # }
//! ```

use crate::error::{Result, join_path};
use crate::tree::{Entry, SettingNode};
use serde_json::{Map, Value};

/// Path separator for attribute-style access
pub const PATH_SEPARATOR: char = '.';

// =============================================================================
// Setting View
// =============================================================================

/// What a key resolves to: a leaf value or a proxy over nested settings
#[derive(Debug, Clone)]
pub enum Setting<'a> {
    Value(&'a Value),
    Nested(Settings<'a>),
}

impl<'a> Setting<'a> {
    /// The leaf value, if this is not a nested setting
    pub fn as_value(&self) -> Option<&'a Value> {
        match self {
            Setting::Value(value) => Some(*value),
            Setting::Nested(_) => None,
        }
    }

    /// The nested proxy, if this is a nested setting
    pub fn as_nested(&self) -> Option<&Settings<'a>> {
        match self {
            Setting::Nested(settings) => Some(settings),
            Setting::Value(_) => None,
        }
    }

    /// Returns `true` for nested settings
    pub fn is_nested(&self) -> bool {
        matches!(self, Setting::Nested(_))
    }

    /// Export as a plain value (nested settings become a mapping)
    pub fn to_value(&self) -> Value {
        match self {
            Setting::Value(value) => (*value).clone(),
            Setting::Nested(settings) => Value::Object(settings.to_map()),
        }
    }
}

impl PartialEq<Value> for Setting<'_> {
    fn eq(&self, other: &Value) -> bool {
        match self {
            Setting::Value(value) => *value == other,
            Setting::Nested(settings) => {
                other.as_object().is_some_and(|map| settings.to_map() == *map)
            }
        }
    }
}

// =============================================================================
// Read Proxy
// =============================================================================

/// Read-only view over a settings node
#[derive(Debug, Clone)]
pub struct Settings<'a> {
    node: &'a SettingNode,
    path: String,
}

impl<'a> Settings<'a> {
    /// Wrap a root node
    pub fn new(node: &'a SettingNode) -> Self {
        Self::at_path(node, String::new())
    }

    fn at_path(node: &'a SettingNode, path: String) -> Self {
        Self { node, path }
    }

    /// Dotted path of this node from the root (empty for the root)
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The wrapped node
    pub fn node(&self) -> &'a SettingNode {
        self.node
    }

    /// Read a declared key
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownSetting`] if `key` is not declared at this level.
    pub fn get(&self, key: &str) -> Result<Setting<'a>> {
        let entry = self.node.get(key).map_err(|e| e.within(&self.path))?;
        Ok(match entry {
            Entry::Scalar(value) => Setting::Value(value),
            Entry::Nested(node) => {
                Setting::Nested(Settings::at_path(node, join_path(&self.path, key)))
            }
        })
    }

    /// Descend into a nested key
    ///
    /// # Errors
    ///
    /// [`Error::UnknownSetting`] for a missing key, [`Error::NotNested`] for a scalar.
    pub fn at(&self, key: &str) -> Result<Settings<'a>> {
        let node = self.node.child(key).map_err(|e| e.within(&self.path))?;
        Ok(Settings::at_path(node, join_path(&self.path, key)))
    }

    /// Read a setting by dotted path, e.g. `"mutations.action.query"`
    ///
    /// Every `.` starts a new segment, so a key that itself contains a dot
    /// (only possible for keys added by a loader, e.g. JSON `{"log.level": ..}`)
    /// cannot be reached this way; use [`get`](Self::get) for it.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownSetting`] if any segment is undeclared, [`Error::NotNested`]
    /// if a segment before the last holds a value.
    pub fn fetch(&self, path: &str) -> Result<Setting<'a>> {
        match path.rsplit_once(PATH_SEPARATOR) {
            None => self.get(path),
            Some((parents, last)) => {
                let mut settings = self.clone();
                for segment in parents.split(PATH_SEPARATOR) {
                    settings = settings.at(segment)?;
                }
                settings.get(last)
            }
        }
    }

    /// Returns `true` if `key` is declared at this level
    pub fn has_key(&self, key: &str) -> bool {
        self.node.has_key(key)
    }

    /// Declared keys at this level, in order
    pub fn keys(&self) -> impl Iterator<Item = &'a str> + use<'a> {
        self.node.keys()
    }

    /// Number of keys at this level
    pub fn len(&self) -> usize {
        self.node.len()
    }

    /// Returns `true` if nothing is declared at this level
    pub fn is_empty(&self) -> bool {
        self.node.is_empty()
    }

    /// Export this node as a plain ordered mapping
    pub fn to_map(&self) -> Map<String, Value> {
        self.node.to_map()
    }
}

// =============================================================================
// Write Proxy
// =============================================================================

/// Read/write view over a settings node
#[derive(Debug)]
pub struct SettingsMut<'a> {
    node: &'a mut SettingNode,
    path: String,
}

impl<'a> SettingsMut<'a> {
    /// Wrap a root node
    pub fn new(node: &'a mut SettingNode) -> Self {
        Self {
            node,
            path: String::new(),
        }
    }

    /// Dotted path of this node from the root (empty for the root)
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Borrow as a read-only proxy
    pub fn as_settings(&self) -> Settings<'_> {
        Settings::at_path(self.node, self.path.clone())
    }

    /// Read a declared key, same as [`Settings::get`]
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownSetting`] if `key` is not declared at this level.
    pub fn get(&self, key: &str) -> Result<Setting<'_>> {
        self.as_settings().get(key)
    }

    /// Read a setting by dotted path, same as [`Settings::fetch`]
    ///
    /// # Errors
    ///
    /// See [`Settings::fetch`].
    pub fn fetch(&self, path: &str) -> Result<Setting<'_>> {
        self.as_settings().fetch(path)
    }

    /// Assign a declared key
    ///
    /// # Errors
    ///
    /// * [`Error::UnknownSetting`] if `key` is not declared at this level
    /// * [`Error::AmbiguousSettingValue`] if `key` holds nested settings and `value` is not a mapping
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> Result<()> {
        self.node
            .set(key, value.into())
            .map_err(|e| e.within(&self.path))
    }

    /// Descend into a nested key for mutation
    ///
    /// # Errors
    ///
    /// [`Error::UnknownSetting`] for a missing key, [`Error::NotNested`] for a scalar.
    pub fn at(&mut self, key: &str) -> Result<SettingsMut<'_>> {
        let path = join_path(&self.path, key);
        let node = self.node.child_mut(key).map_err(|e| e.within(&self.path))?;
        Ok(SettingsMut { node, path })
    }

    /// Assign a setting by dotted path, e.g. `"serializers.json"`
    ///
    /// As with [`Settings::fetch`], keys containing a dot are only reachable
    /// through [`set`](Self::set).
    ///
    /// # Errors
    ///
    /// Same as [`set`](Self::set) for the last segment; intermediate segments
    /// fail with [`Error::UnknownSetting`] or [`Error::NotNested`].
    pub fn assign(&mut self, path: &str, value: impl Into<Value>) -> Result<()> {
        let Some((parents, last)) = path.rsplit_once(PATH_SEPARATOR) else {
            return self.set(path, value);
        };

        let mut node: &mut SettingNode = self.node;
        let mut walked = self.path.clone();
        for segment in parents.split(PATH_SEPARATOR) {
            node = node.child_mut(segment).map_err(|e| e.within(&walked))?;
            walked = join_path(&walked, segment);
        }
        node.set(last, value.into()).map_err(|e| e.within(&walked))
    }

    /// Returns `true` if `key` is declared at this level
    pub fn has_key(&self, key: &str) -> bool {
        self.node.has_key(key)
    }

    /// Export this node as a plain ordered mapping
    pub fn to_map(&self) -> Map<String, Value> {
        self.node.to_map()
    }
}
