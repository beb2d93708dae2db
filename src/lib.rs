//! # settree - Hierarchical settings trees
//!
//! A library for declaring, loading, layering and mutating nested settings.
//!
//! ## Features
//!
//! - **Declared Schemas**: Ordered settings declarations with defaults and nested blocks
//! - **Layered Loading**: JSON (always), YAML and TOML files, environment variables, inline maps
//! - **Deep Merge**: Later sources override scalars but never collapse nested settings
//! - **Two Access Styles**: Per-key (`at("db")?.get("host")`) or dotted paths (`fetch("db.host")`)
//! - **Env Type Inference**: `"8080"` → `8080`, `"a, b"` → `["a", "b"]`, `"'x'"` → `"x"`
//! - **Typed Extraction**: Deserialize the current tree into your own structs
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use settree::{Config, LoadInstruction, Schema};
//!
//! # fn main() -> settree::Result<()> {
//! let schema = Schema::builder()
//!     .nested("database", |db| {
//!         db.setting("host", "localhost")?
//!             .setting("port", 5432)
//!     })?
//!     .setting("workers", 4)?
//!     .load(LoadInstruction::file("~/.config/my-app/settings.json").strict(false))
//!     .load(LoadInstruction::env().prefix("MYAPP_").trim_prefix(true))
//!     .build();
//!
//! let mut config = Config::new(&schema)?;
//! config.set("database.host", "db.internal")?;
//! println!("{}", config.get("database.port")?.to_value());
//! # Ok(())
//! # }
//! ```
//!
//! ## Mutation Rules
//!
//! - Reading or writing an undeclared key fails with [`Error::UnknownSetting`]
//! - Assigning a plain value over nested settings fails with [`Error::AmbiguousSettingValue`];
//!   nested settings change key by key
//! - Merging a plain value over nested settings (from a loader) keeps the nested settings
//!   and drops the incoming value

// Core modules
mod access;
mod convert;
mod dataset;
mod error;
pub mod loader;
pub mod schema;
pub mod tree;

// Re-exports from core
pub use access::{PATH_SEPARATOR, Setting, Settings, SettingsMut};
pub use convert::{convert_value, convert_values};
pub use dataset::{Config, DataSet};
pub use error::{Error, Result};
pub use loader::{EnvLoad, EnvSource, FileFormat, FileLoad, LoadInstruction};
pub use schema::{Directive, Schema, SchemaBuilder};
pub use tree::{Entry, SettingNode};

// Used by generated code
#[doc(hidden)]
pub use serde_json;

// Derive macro re-export (requires `derive` feature)
/// Derive macro for generating [`DataSet`] implementations.
///
/// # Example
///
/// ```rust,ignore
/// use settree::DeriveDataSet;
///
/// #[derive(DeriveDataSet)]
/// struct AppConfig {
///     #[setting(nested)]
///     serializers: Serializers,
///     #[setting(default = 22)]
///     steps: u32,
/// }
///
/// #[derive(DeriveDataSet)]
/// struct Serializers {
///     #[setting(default = "native")]
///     json: String,
/// }
/// ```
#[cfg(feature = "derive")]
pub use settree_derive::DataSet as DeriveDataSet;
