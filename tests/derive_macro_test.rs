//! Integration tests for settree-derive macro
//!
//! Tests the `#[derive(DeriveDataSet)]` macro with various attribute combinations.

mod common;

use common::{TestFixture, env_source};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use settree::{DataSet, DeriveDataSet, Directive, Error, LoadInstruction};

// =============================================================================
// Basic Derive Tests
// =============================================================================

#[derive(Debug, Default, Serialize, Deserialize, PartialEq, DeriveDataSet)]
struct BasicSettings {
    enabled: bool,
    name: String,
    count: u32,
}

#[test]
fn test_defaults_come_from_default_impl() {
    let config = BasicSettings::build().unwrap();
    assert_eq!(
        config.to_value(),
        json!({"enabled": false, "name": "", "count": 0})
    );
}

#[test]
fn test_extract_round_trip() {
    let mut config = BasicSettings::build().unwrap();
    config.set("name", "settree").unwrap();
    config.set("count", 3).unwrap();

    let typed: BasicSettings = config.extract().unwrap();
    assert_eq!(
        typed,
        BasicSettings {
            enabled: false,
            name: "settree".to_string(),
            count: 3,
        }
    );
}

// =============================================================================
// Nested Struct Tests
// =============================================================================

#[derive(DeriveDataSet)]
struct Serializers {
    #[setting(default = "native")]
    json: String,

    #[setting(default = "native")]
    xml: String,
}

#[derive(DeriveDataSet)]
struct Action {
    #[setting(default = ())]
    query: Option<String>,
}

#[derive(DeriveDataSet)]
struct Mutations {
    action: Action,
}

#[derive(DeriveDataSet)]
struct SimpleConfig {
    serializers: Serializers,
    mutations: Mutations,

    #[setting(default = 22)]
    steps: u32,
}

#[test]
fn test_nested_structs_become_nested_blocks() {
    let config = SimpleConfig::build().unwrap();
    assert_eq!(
        config.to_value(),
        json!({
            "serializers": {"json": "native", "xml": "native"},
            "mutations": {"action": {"query": null}},
            "steps": 22
        })
    );
    assert!(config.get("mutations.action").unwrap().is_nested());
}

#[test]
fn test_derived_schema_rejects_scalar_over_nested() {
    let mut config = SimpleConfig::build().unwrap();
    assert!(matches!(
        config.set("serializers", "oj"),
        Err(Error::AmbiguousSettingValue(_))
    ));
    config.set("serializers.json", "oj").unwrap();
    assert_eq!(config.get("serializers.json").unwrap(), json!("oj"));
}

#[test]
fn test_schema_declaration_order() {
    let schema = SimpleConfig::schema().unwrap();
    assert_eq!(schema.keys(), ["serializers", "mutations", "steps"]);
    assert!(matches!(schema.directives()[0], Directive::Nested { .. }));
    assert!(matches!(schema.directives()[2], Directive::Setting { .. }));
}

// =============================================================================
// Field Attribute Tests
// =============================================================================

#[derive(Default, Serialize, DeriveDataSet)]
struct Tagged {
    #[setting(rename = "maxAuthCount", default = 55)]
    max_auth_count: u32,

    #[setting(skip)]
    #[allow(dead_code)]
    cache: Vec<u8>,

    #[setting(value)]
    hosts: Vec<String>,

    #[setting(default = vec!["2.3", "2.4.2"])]
    allowed_versions: Vec<&'static str>,

    #[setting(nested)]
    extra: Extra,
}

#[derive(Default, Serialize, DeriveDataSet)]
struct Extra {
    #[setting(default = Value::Null)]
    git_link: Option<String>,
}

#[test]
fn test_field_attributes() {
    let config = Tagged::build().unwrap();
    assert_eq!(
        config.to_value(),
        json!({
            "maxAuthCount": 55,
            "hosts": [],
            "allowed_versions": ["2.3", "2.4.2"],
            "extra": {"git_link": null}
        })
    );
    assert!(!config.has("cache"));
    assert!(!config.has("max_auth_count"));
}

// =============================================================================
// Container Attribute Tests
// =============================================================================

#[derive(DeriveDataSet)]
#[dataset(optional_file = "/nonexistent/settree/derive_test.json")]
struct OptionalFileConfig {
    #[setting(default = 1)]
    level: u8,
}

#[derive(DeriveDataSet)]
#[dataset(file = "/nonexistent/settree/derive_test.json")]
struct RequiredFileConfig {
    #[setting(default = 1)]
    level: u8,
}

#[test]
fn test_file_attributes() {
    let config = OptionalFileConfig::build().unwrap();
    assert_eq!(config.get("level").unwrap(), json!(1));

    assert!(matches!(
        RequiredFileConfig::build(),
        Err(Error::FileNotFound(_))
    ));
}

#[derive(DeriveDataSet)]
#[dataset(env_prefix = "SETTREE_DERIVE_TEST_")]
struct EnvConfig {
    #[setting(default = 8080)]
    port: u16,
}

#[test]
fn test_env_prefix_attribute() {
    let schema = EnvConfig::schema().unwrap();
    let Some(Directive::Load(LoadInstruction::Env(env))) = schema.directives().last() else {
        panic!("expected the environment load to be the last directive");
    };

    let map = env
        .clone()
        .source(env_source(&[("SETTREE_DERIVE_TEST_port", "9090")]))
        .load();
    assert_eq!(map.get("port"), Some(&json!(9090)));
}

#[test]
fn test_loaded_file_overrides_derived_defaults() {
    let fixture = TestFixture::new();
    let path = fixture.write("override.json", r#"{"steps": 31}"#);

    let mut config = SimpleConfig::build().unwrap();
    config.load(&LoadInstruction::file(&path).into()).unwrap();
    assert_eq!(config.get("steps").unwrap(), json!(31));
}
