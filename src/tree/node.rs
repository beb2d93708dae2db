//! The recursive settings node

use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

/// A single slot in a [`SettingNode`]: either a leaf value or a nested node.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    /// Leaf value (string, number, bool, null or array)
    Scalar(Value),
    /// Nested settings, exclusively owned by the parent node
    Nested(SettingNode),
}

impl Entry {
    /// Build an entry from a plain value: objects become nested nodes
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(map) => Entry::Nested(SettingNode::from_map(map)),
            other => Entry::Scalar(other.clone()),
        }
    }

    /// Returns `true` if this entry holds nested settings
    pub fn is_nested(&self) -> bool {
        matches!(self, Entry::Nested(_))
    }

    /// Nested settings of this entry, replacing a scalar with an empty node
    fn make_nested(&mut self) -> &mut SettingNode {
        match self {
            Entry::Nested(node) => node,
            Entry::Scalar(_) => {
                *self = Entry::Nested(SettingNode::new());
                self.make_nested()
            }
        }
    }

    /// Export this entry as a plain value
    pub fn to_value(&self) -> Value {
        match self {
            Entry::Scalar(value) => value.clone(),
            Entry::Nested(node) => Value::Object(node.to_map()),
        }
    }
}

/// Ordered mapping from setting key to [`Entry`].
///
/// Insertion order is kept and drives export order. Declaration
/// ([`declare`](Self::declare)) may swap a key between scalar and nested;
/// mutation ([`set`](Self::set)) never replaces a nested entry wholesale.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingNode {
    entries: IndexMap<String, Entry>,
}

impl SettingNode {
    /// Create an empty node
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a node from a plain mapping, nesting every object value
    pub fn from_map(map: &Map<String, Value>) -> Self {
        let entries = map
            .iter()
            .map(|(key, value)| (key.clone(), Entry::from_value(value)))
            .collect();
        Self { entries }
    }

    // =========================================================================
    // Declaration
    // =========================================================================

    /// Create or replace `key` with `entry`, whatever the previous entry was.
    ///
    /// A replaced key keeps its original position.
    pub fn declare(&mut self, key: impl Into<String>, entry: Entry) {
        self.entries.insert(key.into(), entry);
    }

    /// Create or replace `key` with a scalar default
    pub fn declare_value(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.declare(key, Entry::Scalar(value.into()));
    }

    /// Open the nested node under `key` for further declarations.
    ///
    /// An existing nested node is reopened and keeps its entries; a scalar or
    /// missing key is replaced by a fresh empty node.
    pub fn declare_nested(&mut self, key: impl Into<String>) -> &mut SettingNode {
        self.entries
            .entry(key.into())
            .or_insert_with(|| Entry::Nested(SettingNode::new()))
            .make_nested()
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// Returns `true` if `key` is declared at this level
    pub fn has_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Get the entry for `key`
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownSetting`] if `key` is not declared.
    pub fn get(&self, key: &str) -> Result<&Entry> {
        self.entries
            .get(key)
            .ok_or_else(|| Error::UnknownSetting(key.to_string()))
    }

    /// Get the nested node under `key`
    ///
    /// # Errors
    ///
    /// [`Error::UnknownSetting`] for a missing key, [`Error::NotNested`] for a scalar.
    pub fn child(&self, key: &str) -> Result<&SettingNode> {
        match self.get(key)? {
            Entry::Nested(node) => Ok(node),
            Entry::Scalar(_) => Err(Error::NotNested(key.to_string())),
        }
    }

    /// Get the nested node under `key` for mutation
    ///
    /// # Errors
    ///
    /// [`Error::UnknownSetting`] for a missing key, [`Error::NotNested`] for a scalar.
    pub fn child_mut(&mut self, key: &str) -> Result<&mut SettingNode> {
        match self.entries.get_mut(key) {
            Some(Entry::Nested(node)) => Ok(node),
            Some(Entry::Scalar(_)) => Err(Error::NotNested(key.to_string())),
            None => Err(Error::UnknownSetting(key.to_string())),
        }
    }

    /// Declared keys in order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterate over `(key, entry)` pairs in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.entries.iter().map(|(key, entry)| (key.as_str(), entry))
    }

    /// Number of keys at this level
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no key is declared at this level
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Assign a new value to a declared key.
    ///
    /// Scalars are replaced by any value. A nested entry only accepts an
    /// object, which is applied key by key; every key it names must already
    /// exist. Nothing is modified unless the whole assignment is valid.
    ///
    /// # Errors
    ///
    /// * [`Error::UnknownSetting`] if `key` (or a key inside an object value) is undeclared
    /// * [`Error::AmbiguousSettingValue`] if a nested entry would be overwritten by a non-object
    pub fn set(&mut self, key: &str, value: Value) -> Result<()> {
        check_assignment(self, key, &value)?;
        apply_assignment(self, key, value);
        Ok(())
    }

    pub(crate) fn entry_mut(&mut self, key: &str) -> Option<&mut Entry> {
        self.entries.get_mut(key)
    }

    // =========================================================================
    // Export
    // =========================================================================

    /// Export the tree as a plain ordered mapping
    pub fn to_map(&self) -> Map<String, Value> {
        self.entries
            .iter()
            .map(|(key, entry)| (key.clone(), entry.to_value()))
            .collect()
    }
}

impl Serialize for SettingNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, entry) in &self.entries {
            match entry {
                Entry::Scalar(value) => map.serialize_entry(key, value)?,
                Entry::Nested(node) => map.serialize_entry(key, node)?,
            }
        }
        map.end()
    }
}

/// Validate an assignment without touching the tree
fn check_assignment(node: &SettingNode, key: &str, value: &Value) -> Result<()> {
    match (node.get(key)?, value) {
        (Entry::Scalar(_), _) => Ok(()),
        (Entry::Nested(child), Value::Object(fields)) => {
            for (field, field_value) in fields {
                check_assignment(child, field, field_value).map_err(|e| e.within(key))?;
            }
            Ok(())
        }
        (Entry::Nested(_), _) => Err(Error::AmbiguousSettingValue(key.to_string())),
    }
}

/// Apply an assignment already accepted by [`check_assignment`]
fn apply_assignment(node: &mut SettingNode, key: &str, value: Value) {
    let Some(entry) = node.entry_mut(key) else {
        return;
    };
    match (entry, value) {
        (Entry::Nested(child), Value::Object(fields)) => {
            for (field, field_value) in fields {
                apply_assignment(child, &field, field_value);
            }
        }
        (slot, value) => {
            log::trace!("set {key} = {value}");
            *slot = Entry::Scalar(value);
        }
    }
}

/// Render a value's shape for log and error messages
pub(crate) fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "a mapping",
    }
}
