//! Declared settings schemas
//!
//! A [`Schema`] is the ordered log of declarations made for a config type:
//! scalar settings with defaults, nested blocks, and load instructions.
//! Building a [`Config`](crate::Config) replays the log into a fresh tree, so
//! two instances never share state and a key declared twice resolves to its
//! last declaration.
//!
//! ```
//! use settree::{Config, Schema};
//! use serde_json::json;
//!
//! # fn main() -> settree::Result<()> {
//! let schema = Schema::builder()
//!     .nested("serializers", |s| s.setting("json", "native"))?
//!     .setting("steps", 22)?
//!     .build();
//!
//! let config = Config::new(&schema)?;
//! assert_eq!(
//!     config.to_value(),
//!     json!({"serializers": {"json": "native"}, "steps": 22})
//! );
//! # Ok(())
//! # }
//! ```

mod builder;
mod key;

pub use builder::SchemaBuilder;
pub use key::validate_key;

use crate::error::{Result, join_path};
use crate::loader::LoadInstruction;
use crate::tree::{Entry, SettingNode};
use log::debug;
use serde_json::Value;

/// One declaration in a schema
#[derive(Debug, Clone)]
pub enum Directive {
    /// A scalar setting and its default value
    Setting { key: String, default: Value },
    /// A nested block; declaring an existing nested key reopens it
    Nested { key: String, schema: Schema },
    /// Merge the output of a loader into the node being built
    Load(LoadInstruction),
}

/// Ordered, immutable declaration log for a config type
#[derive(Debug, Clone, Default)]
pub struct Schema {
    directives: Vec<Directive>,
}

impl Schema {
    /// Start declaring a schema
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::new()
    }

    pub(crate) fn from_directives(directives: Vec<Directive>) -> Self {
        Self { directives }
    }

    /// All directives in declaration order, duplicates included
    pub fn directives(&self) -> &[Directive] {
        &self.directives
    }

    /// Distinct keys declared at the top level, in first-declaration order
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = Vec::new();
        for directive in &self.directives {
            let key = match directive {
                Directive::Setting { key, .. } | Directive::Nested { key, .. } => key.as_str(),
                Directive::Load(_) => continue,
            };
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        keys
    }

    /// Number of directives
    pub fn len(&self) -> usize {
        self.directives.len()
    }

    /// Returns `true` if nothing was declared
    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    /// Replay every directive into a fresh tree
    ///
    /// # Errors
    ///
    /// Propagates loader failures from `Load` directives.
    pub fn instantiate(&self) -> Result<SettingNode> {
        let mut root = SettingNode::new();
        self.apply(&mut root, "")?;
        Ok(root)
    }

    fn apply(&self, node: &mut SettingNode, path: &str) -> Result<()> {
        for directive in &self.directives {
            match directive {
                Directive::Setting { key, default } => {
                    node.declare(key.clone(), Entry::Scalar(default.clone()));
                }
                Directive::Nested { key, schema } => {
                    let child = node.declare_nested(key.clone());
                    schema.apply(child, &join_path(path, key))?;
                }
                Directive::Load(instruction) => {
                    let target = if path.is_empty() { "<root>" } else { path };
                    debug!("Loading {instruction} into {target}");
                    node.merge(&instruction.load()?);
                }
            }
        }
        Ok(())
    }
}
