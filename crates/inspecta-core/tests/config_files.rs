//! Loading engine configuration from disk

use inspecta_core::{ChecklistEngine, ConfigError, EngineConfig, EngineError};
use inspecta_schema::DerivedKeyCollision;
use inspecta_store::VersionFallback;
use inspecta_test_utils::record_with_versions;
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

fn file_with(suffix: &str, contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn toml_file() {
    let file = file_with(".toml", "max_depth = 5\nversion_fallback = \"strict\"\n");
    let config = EngineConfig::from_path(file.path()).unwrap();
    assert_eq!(config.max_depth, 5);
    assert_eq!(config.version_fallback, VersionFallback::Strict);
    assert_eq!(config.missing_preview, 3);
}

#[test]
fn yaml_file() {
    let file = file_with(".yml", "derived_key_collision: disambiguate\nmissing_preview: 5\n");
    let config = EngineConfig::from_path(file.path()).unwrap();
    assert_eq!(config.derived_key_collision, DerivedKeyCollision::Disambiguate);
    assert_eq!(config.missing_preview, 5);
}

#[test]
fn unknown_extension() {
    let file = file_with(".ini", "max_depth = 5");
    assert!(matches!(
        EngineConfig::from_path(file.path()),
        Err(ConfigError::UnsupportedFormat(_))
    ));
}

#[test]
fn missing_file() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        EngineConfig::from_path(dir.path().join("absent.toml")),
        Err(ConfigError::Io { .. })
    ));
}

#[tokio::test]
async fn strict_config_drives_resolution() {
    let file = file_with(".toml", "version_fallback = \"strict\"\n");
    let config = EngineConfig::from_path(file.path()).unwrap();

    let engine = ChecklistEngine::in_memory(config);
    let record = record_with_versions(3);
    let id = record.id;
    inspecta_store::ChecklistStore::insert(engine.store().as_ref(), record)
        .await
        .unwrap();

    assert_eq!(engine.resolve(id, true, Some(2)).await.unwrap().resolved_version, Some(2));
    assert!(matches!(
        engine.resolve(id, true, Some(4)).await,
        Err(EngineError::Resolve(_))
    ));

    let lenient = ChecklistEngine::new(Arc::clone(engine.store()), EngineConfig::default());
    assert_eq!(lenient.resolve(id, true, Some(4)).await.unwrap().resolved_version, Some(3));
}
