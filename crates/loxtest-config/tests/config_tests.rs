//! Configuration loading and precedence tests

use loxtest_config::{ConfigError, ConfigLoader, HarnessFile, CONFIG_FILE_NAME};
use rstest::rstest;
use serial_test::serial;
use std::env;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn create_config_file(dir: &Path, content: &str) -> std::path::PathBuf {
    let config_path = dir.join(CONFIG_FILE_NAME);
    fs::write(&config_path, content).unwrap();
    config_path
}

fn clear_env() {
    env::remove_var("LOXTEST_TESTS_DIR");
    env::remove_var("LOXTEST_SOURCE_EXTENSION");
    env::remove_var("LOXTEST_EXECUTABLE_NAME");
}

// ============================================================================
// Config Loading Tests
// ============================================================================

#[test]
#[serial]
fn test_nearest_config_wins() {
    clear_env();
    let temp_dir = TempDir::new().unwrap();
    create_config_file(
        temp_dir.path(),
        r#"
[executable]
name = "outer"
"#,
    );
    let inner = temp_dir.path().join("inner");
    fs::create_dir(&inner).unwrap();
    create_config_file(
        &inner,
        r#"
[executable]
name = "inner"
"#,
    );

    let config = ConfigLoader::new().load_from_directory(&inner).unwrap();
    assert_eq!(config.executable_name(), "inner");
    assert_eq!(config.project_root(), Some(inner.as_path()));
}

#[test]
#[serial]
fn test_explicit_search_patterns_replace_defaults() {
    clear_env();
    let temp_dir = TempDir::new().unwrap();
    create_config_file(
        temp_dir.path(),
        r#"
[executable]
name = "clox"
search = ["target/*/clox", "bin/clox"]
"#,
    );

    let config = ConfigLoader::new()
        .load_from_directory(temp_dir.path())
        .unwrap();
    assert_eq!(config.search_patterns(), vec!["target/*/clox", "bin/clox"]);
}

#[test]
#[serial]
fn test_env_executable_name_feeds_default_search() {
    clear_env();
    let temp_dir = TempDir::new().unwrap();
    env::set_var("LOXTEST_EXECUTABLE_NAME", "rlox");

    let config = ConfigLoader::new()
        .load_from_directory(temp_dir.path())
        .unwrap();
    assert_eq!(config.executable_name(), "rlox");
    assert_eq!(config.search_patterns()[1], "../build/**/rlox");

    clear_env();
}

// ============================================================================
// Error Tests
// ============================================================================

#[test]
#[serial]
fn test_invalid_toml_reports_file() {
    clear_env();
    let temp_dir = TempDir::new().unwrap();
    let path = create_config_file(temp_dir.path(), "[harness\n");

    let err = ConfigLoader::new().load_from_file(&path).unwrap_err();
    match err {
        ConfigError::TomlParseError { file, .. } => assert_eq!(file, path),
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_missing_file_is_not_found() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join(CONFIG_FILE_NAME);

    let err = HarnessFile::load_from_file(&path).unwrap_err();
    assert!(matches!(err, ConfigError::NotFound(_)));
}

#[rstest]
#[case("[harness]\nsource_extension = \"\"\n")]
#[case("[harness]\nsource_extension = \"a/b\"\n")]
#[case("[executable]\nname = \"  \"\n")]
#[case("[executable]\nsearch = [\"\"]\n")]
#[case("[executable]\nprefer = \"\"\n")]
#[serial]
fn test_invalid_values_rejected(#[case] content: &str) {
    clear_env();
    let temp_dir = TempDir::new().unwrap();
    let path = create_config_file(temp_dir.path(), content);

    let err = ConfigLoader::new().load_from_file(&path).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { .. }), "{}", err);
}
