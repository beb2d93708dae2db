//! Deep merge of plain mappings into a settings tree
//!
//! For every incoming `(key, value)` pair, in the mapping's order:
//!
//! | existing entry | incoming value | result |
//! |---|---|---|
//! | absent | mapping | new nested node |
//! | absent | anything else | new scalar |
//! | nested | mapping | merged recursively |
//! | nested | anything else | incoming value discarded, subtree kept |
//! | scalar | anything | replaced (a mapping turns the key nested) |
//!
//! Later sources override earlier scalars, but a plain value never erases
//! structure an earlier source or declaration created.

use super::node::{Entry, SettingNode, describe};
use crate::error::join_path;
use log::{trace, warn};
use serde_json::{Map, Value};

impl SettingNode {
    /// Deep merge a plain mapping into this node
    pub fn merge(&mut self, incoming: &Map<String, Value>) {
        merge_into(self, incoming, "");
    }
}

/// Merge `incoming` into `tree` and return the result
pub fn merge(mut tree: SettingNode, incoming: &Map<String, Value>) -> SettingNode {
    tree.merge(incoming);
    tree
}

/// Export a tree as a plain ordered mapping
pub fn export(tree: &SettingNode) -> Map<String, Value> {
    tree.to_map()
}

fn merge_into(node: &mut SettingNode, incoming: &Map<String, Value>, path: &str) {
    for (key, value) in incoming {
        let key_path = join_path(path, key);
        let Some(entry) = node.entry_mut(key) else {
            trace!("merge: insert {key_path}");
            node.declare(key.clone(), Entry::from_value(value));
            continue;
        };
        match (entry, value) {
            (Entry::Nested(child), Value::Object(fields)) => {
                merge_into(child, fields, &key_path);
            }
            (Entry::Nested(_), value) => {
                warn!(
                    "merge: ignoring {} for '{key_path}', it holds nested settings",
                    describe(value)
                );
            }
            (slot, value) => {
                trace!("merge: replace {key_path}");
                *slot = Entry::from_value(value);
            }
        }
    }
}
