//! Settings tree
//!
//! - [`SettingNode`] / [`Entry`] - the ordered, recursive tree of settings
//! - [`merge`] - deep merge of loader output into a tree, and export back out

mod merge;
mod node;

pub use merge::{export, merge};
pub use node::{Entry, SettingNode};

pub(crate) use node::describe;
