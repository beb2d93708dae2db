//! Config instances built from a schema
//!
//! [`Config`] owns one settings tree. It is created by replaying a
//! [`Schema`], then layered with further loads, merges and assignments.

use crate::access::{Setting, Settings, SettingsMut};
use crate::error::Result;
use crate::loader::LoadInstruction;
use crate::schema::Schema;
use crate::tree::SettingNode;
use log::debug;
use serde::de::DeserializeOwned;
use serde::ser::{Serialize, Serializer};
use serde_json::{Map, Value};

/// Trait for config types that declare a schema
///
/// Implement it by hand with [`Schema::builder`], or derive it with the
/// `derive` feature.
///
/// # Example
///
/// ```rust
/// use settree::{DataSet, Schema};
/// use serde_json::json;
///
/// struct ServerConfig;
///
/// impl DataSet for ServerConfig {
///     fn schema() -> settree::Result<Schema> {
///         Ok(Schema::builder()
///             .setting("host", "127.0.0.1")?
///             .setting("port", 8080)?
///             .build())
///     }
/// }
///
/// # fn main() -> settree::Result<()> {
/// let config = ServerConfig::build()?;
/// assert_eq!(config.get("port")?, json!(8080));
/// # Ok(())
/// # }
/// ```
pub trait DataSet {
    /// The declared schema for this config type
    fn schema() -> Result<Schema>;

    /// Build a fresh config instance from the schema
    fn build() -> Result<Config> {
        Config::new(&Self::schema()?)
    }
}

/// A config instance: one exclusively owned settings tree
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    root: SettingNode,
}

impl Config {
    /// Build a config by replaying `schema`
    ///
    /// # Errors
    ///
    /// Propagates loader errors from load directives in the schema.
    pub fn new(schema: &Schema) -> Result<Self> {
        let root = schema.instantiate()?;
        debug!("Built config with {} top-level settings", root.len());
        Ok(Self { root })
    }

    /// Build a config and run `configure` on it before returning
    ///
    /// # Errors
    ///
    /// Propagates errors from building or from `configure`.
    pub fn with<F>(schema: &Schema, configure: F) -> Result<Self>
    where
        F: FnOnce(&mut SettingsMut<'_>) -> Result<()>,
    {
        let mut config = Self::new(schema)?;
        config.configure(configure)?;
        Ok(config)
    }

    /// Wrap an existing tree
    pub fn from_node(root: SettingNode) -> Self {
        Self { root }
    }

    /// Read access to the settings
    pub fn settings(&self) -> Settings<'_> {
        Settings::new(&self.root)
    }

    /// Write access to the settings
    pub fn settings_mut(&mut self) -> SettingsMut<'_> {
        SettingsMut::new(&mut self.root)
    }

    /// Run a block of assignments against the settings
    ///
    /// Assignments made before a failing one are kept.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by `configure`.
    pub fn configure<F>(&mut self, configure: F) -> Result<()>
    where
        F: FnOnce(&mut SettingsMut<'_>) -> Result<()>,
    {
        configure(&mut self.settings_mut())
    }

    /// Read a setting by dotted path
    ///
    /// Keys containing a dot need [`Settings::get`] instead.
    ///
    /// # Errors
    ///
    /// See [`Settings::fetch`].
    pub fn get(&self, path: &str) -> Result<Setting<'_>> {
        self.settings().fetch(path)
    }

    /// Assign a setting by dotted path
    ///
    /// # Errors
    ///
    /// See [`SettingsMut::assign`].
    pub fn set(&mut self, path: &str, value: impl Into<Value>) -> Result<()> {
        self.settings_mut().assign(path, value)
    }

    /// Returns `true` if the dotted path resolves to a setting
    pub fn has(&self, path: &str) -> bool {
        self.get(path).is_ok()
    }

    /// Apply a loader to the root of the tree
    ///
    /// # Errors
    ///
    /// See [`LoadInstruction::load`]. The tree is unchanged on error.
    pub fn load(&mut self, instruction: &LoadInstruction) -> Result<()> {
        debug!("Loading {instruction} into <root>");
        let map = instruction.load()?;
        self.root.merge(&map);
        Ok(())
    }

    /// Deep merge a plain mapping into the tree
    pub fn merge(&mut self, incoming: &Map<String, Value>) {
        self.root.merge(incoming);
    }

    /// Export the settings as a plain ordered mapping
    pub fn to_map(&self) -> Map<String, Value> {
        self.root.to_map()
    }

    /// Export the settings as a JSON object
    pub fn to_value(&self) -> Value {
        Value::Object(self.to_map())
    }

    /// Deserialize the current settings into a typed struct
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialize`](crate::Error::Serialize) if the tree does not fit `T`.
    pub fn extract<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(self.to_value())?)
    }

    /// The underlying tree
    pub fn root(&self) -> &SettingNode {
        &self.root
    }

    /// Consume the config, returning its tree
    pub fn into_root(self) -> SettingNode {
        self.root
    }
}

impl Serialize for Config {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.root.serialize(serializer)
    }
}
