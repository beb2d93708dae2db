//! Fluent schema declaration

use super::{Directive, Schema, validate_key};
use crate::error::Result;
use crate::loader::LoadInstruction;
use serde_json::Value;

/// Builder for a [`Schema`].
///
/// Keys are validated as they are declared, so a bad key fails at the
/// declaration site rather than when a config is built.
///
/// # Example
///
/// ```rust
/// use settree::{LoadInstruction, Schema};
///
/// # fn main() -> settree::Result<()> {
/// let schema = Schema::builder()
///     .load(LoadInstruction::file("config/defaults.json").strict(false))
///     .nested("mutations", |m| {
///         m.nested("action", |a| a.setting("query", ()))
///     })?
///     .setting("steps", 22)?
///     .build();
///
/// assert_eq!(schema.keys(), ["mutations", "steps"]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct SchemaBuilder {
    directives: Vec<Directive>,
}

impl SchemaBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a scalar setting with a default value
    ///
    /// Use `()` for a `null` default.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKey`](crate::Error::InvalidKey) if `key` is not a valid setting name.
    pub fn setting(mut self, key: impl Into<String>, default: impl Into<Value>) -> Result<Self> {
        let key = key.into();
        validate_key(&key)?;
        self.directives.push(Directive::Setting {
            key,
            default: default.into(),
        });
        Ok(self)
    }

    /// Declare a nested block of settings
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKey`](crate::Error::InvalidKey) if `key` or any key declared
    /// inside `block` is not a valid setting name.
    pub fn nested<F>(self, key: impl Into<String>, block: F) -> Result<Self>
    where
        F: FnOnce(SchemaBuilder) -> Result<SchemaBuilder>,
    {
        let key = key.into();
        validate_key(&key)?;
        let schema = block(SchemaBuilder::new())?.build();
        self.nested_schema(key, schema)
    }

    /// Declare a nested block from an already built schema
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKey`](crate::Error::InvalidKey) if `key` is not a valid setting name.
    pub fn nested_schema(mut self, key: impl Into<String>, schema: Schema) -> Result<Self> {
        let key = key.into();
        validate_key(&key)?;
        self.directives.push(Directive::Nested { key, schema });
        Ok(self)
    }

    /// Merge a loader's output at this point of the declaration
    #[must_use]
    pub fn load(mut self, instruction: impl Into<LoadInstruction>) -> Self {
        self.directives.push(Directive::Load(instruction.into()));
        self
    }

    /// Finish the declaration
    pub fn build(self) -> Schema {
        Schema::from_directives(self.directives)
    }
}
