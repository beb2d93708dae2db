//! JSON loader integration tests
//!
//! Tests loading JSON files into a settings tree:
//! - Root and nested-block targets
//! - Empty objects becoming empty nested settings
//! - Non-mapping documents
//! - Strict and non-strict handling of missing files

mod common;

use common::{TestFixture, fixture_path};
use serde_json::{Value, json};
use settree::{Config, Error, FileFormat, LoadInstruction, Schema};

// =============================================================================
// Loading Into the Tree
// =============================================================================

#[test]
fn test_json_defines_root_and_nested_settings() {
    let sample = fixture_path("json_object_sample.json");
    let schema = Schema::builder()
        .load(LoadInstruction::file(&sample))
        .nested("nested", |n| Ok(n.load(LoadInstruction::file(&sample))))
        .unwrap()
        .nested("with_empty_objects", |n| {
            Ok(n.load(LoadInstruction::file(fixture_path("json_with_empty_object.json"))))
        })
        .unwrap()
        .build();

    let config = Config::new(&schema).unwrap();
    let conf = config.settings();

    for prefix in ["", "nested."] {
        let path = |key: &str| format!("{prefix}{key}");
        assert_eq!(conf.fetch(&path("user")).unwrap(), json!("D@iVeR"));
        assert_eq!(conf.fetch(&path("maxAuthCount")).unwrap(), json!(55));
        assert_eq!(
            conf.fetch(&path("rubySettings.allowedVersions")).unwrap(),
            json!(["2.3", "2.4.2", "1.9.8"])
        );
        assert_eq!(conf.fetch(&path("rubySettings.gitLink")).unwrap(), Value::Null);
        assert_eq!(conf.fetch(&path("rubySettings.withAdditionals")).unwrap(), json!(false));
    }

    let requirements = conf.fetch("with_empty_objects.requirements").unwrap();
    assert!(requirements.is_nested());
    assert_eq!(requirements, json!({}));
    assert_eq!(conf.fetch("with_empty_objects.credentials.excluded").unwrap(), json!({}));
}

#[test]
fn test_loaded_keys_are_mutable_like_declared_ones() {
    let schema = Schema::builder()
        .load(LoadInstruction::file(fixture_path("json_object_sample.json")))
        .build();
    let mut config = Config::new(&schema).unwrap();

    config.set("rubySettings.gitLink", "https://example.org/repo.git").unwrap();
    assert_eq!(
        config.get("rubySettings.gitLink").unwrap(),
        json!("https://example.org/repo.git")
    );
    assert!(matches!(
        config.set("rubySettings", "flat"),
        Err(Error::AmbiguousSettingValue(_))
    ));
    assert!(matches!(config.set("password", "x"), Err(Error::UnknownSetting(_))));
}

#[test]
fn test_file_overrides_earlier_defaults() {
    let fixture = TestFixture::new();
    let path = fixture.write("override.json", r#"{"steps": 31, "db": {"port": 6543}}"#);

    let schema = Schema::builder()
        .setting("steps", 22)
        .unwrap()
        .nested("db", |db| db.setting("host", "localhost")?.setting("port", 5432))
        .unwrap()
        .load(LoadInstruction::file(&path))
        .setting("late", true)
        .unwrap()
        .build();

    let config = Config::new(&schema).unwrap();
    assert_eq!(
        config.to_value(),
        json!({"steps": 31, "db": {"host": "localhost", "port": 6543}, "late": true})
    );
}

#[test]
fn test_runtime_load() {
    let fixture = TestFixture::new();
    let path = fixture.write("runtime.json", r#"{"steps": 0}"#);

    let mut config = Config::new(&Schema::builder().setting("steps", 22).unwrap().build()).unwrap();
    config.load(&LoadInstruction::file(&path).into()).unwrap();
    assert_eq!(config.get("steps").unwrap(), json!(0));
}

#[test]
fn test_forced_format_ignores_extension() {
    let fixture = TestFixture::new();
    let path = fixture.write("settings.conf", r#"{"answer": 42}"#);

    let map = LoadInstruction::file(&path)
        .format(FileFormat::Json)
        .load()
        .unwrap();
    assert_eq!(map.get("answer"), Some(&json!(42)));
}

// =============================================================================
// Malformed Input
// =============================================================================

#[test]
fn test_array_document_is_incompatible() {
    let schema = Schema::builder()
        .load(LoadInstruction::file(fixture_path("json_array_sample.json")))
        .build();

    let err = Config::new(&schema).unwrap_err();
    assert!(matches!(err, Error::IncompatibleStructure { ref format, .. } if format == "JSON"));
    assert!(err.is_structure_error());
}

#[test]
fn test_invalid_json_is_a_parse_error() {
    let fixture = TestFixture::new();
    let path = fixture.write("broken.json", r#"{"user": "#);

    let err = LoadInstruction::file(&path).load().unwrap_err();
    assert!(matches!(err, Error::Parse { ref format, .. } if format == "JSON"));
}

// =============================================================================
// Strict Mode
// =============================================================================

#[test]
fn test_missing_file_is_fatal_by_default() {
    let fixture = TestFixture::new();
    let missing = fixture.missing("no_file.json");

    let implicit = Schema::builder().load(LoadInstruction::file(&missing)).build();
    let err = Config::new(&implicit).unwrap_err();
    assert!(matches!(err, Error::FileNotFound(ref p) if *p == missing));

    let explicit = Schema::builder()
        .load(LoadInstruction::file(&missing).strict(true))
        .build();
    assert!(matches!(Config::new(&explicit), Err(Error::FileNotFound(_))));
}

#[test]
fn test_missing_file_is_empty_when_not_strict() {
    let fixture = TestFixture::new();
    let missing = fixture.missing("no_file.json");

    let schema = Schema::builder()
        .load(LoadInstruction::file(&missing).strict(false))
        .nested("nested", |n| Ok(n.load(LoadInstruction::file(&missing).strict(false))))
        .unwrap()
        .build();

    let config = Config::new(&schema).unwrap();
    assert_eq!(config.to_value(), json!({"nested": {}}));
}

#[test]
fn test_non_strict_still_reports_malformed_files() {
    let fixture = TestFixture::new();
    let path = fixture.write("broken.json", "not json");

    let err = LoadInstruction::file(&path).strict(false).load().unwrap_err();
    assert!(matches!(err, Error::Parse { .. }));
}
