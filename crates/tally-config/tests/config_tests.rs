//! Configuration loading and precedence tests

use pretty_assertions::assert_eq;
use rstest::rstest;
use serial_test::serial;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tally_config::{enabled, ConfigError, ConfigLoader, CONFIG_FILE_NAME};
use tempfile::TempDir;

fn create_config_file(dir: &Path, content: &str) -> PathBuf {
    let config_path = dir.join(CONFIG_FILE_NAME);
    fs::write(&config_path, content).unwrap();
    config_path
}

// ============================================================================
// Config Loading Tests
// ============================================================================

#[test]
fn test_load_full_config() {
    let temp_dir = TempDir::new().unwrap();
    let content = r#"
[run]
verbose = true
strict = false
throw = true
color = false
severity = ["notice", "deprecated"]

[coverage]
output = "build/coverage.txt"
sources = ["src"]
"#;
    create_config_file(temp_dir.path(), content);

    let mut loader = ConfigLoader::new().without_env();
    let config = loader.load_from_directory(temp_dir.path()).unwrap();

    assert!(config.verbose());
    assert!(!config.strict());
    assert!(config.throw());
    assert!(!config.color());
    assert_eq!(config.severity(), vec!["notice", "deprecated"]);
    assert!(config.coverage_enabled());
    assert_eq!(config.coverage_output(), Some(Path::new("build/coverage.txt")));
    assert_eq!(config.coverage_sources(), &[PathBuf::from("src")]);
}

#[test]
fn test_empty_config_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    create_config_file(temp_dir.path(), "");

    let mut loader = ConfigLoader::new().without_env();
    let config = loader.load_from_directory(temp_dir.path()).unwrap();

    assert_eq!(config.project_root(), Some(temp_dir.path()));
    assert!(!config.verbose());
    assert!(config.strict());
    assert!(config.color());
}

#[test]
fn test_load_from_nested_subdirectory() {
    let temp_dir = TempDir::new().unwrap();
    create_config_file(temp_dir.path(), "[run]\nthrow = true\n");

    let nested = temp_dir.path().join("tests").join("unit");
    fs::create_dir_all(&nested).unwrap();

    let mut loader = ConfigLoader::new().without_env();
    let config = loader.load_from_directory(&nested).unwrap();

    assert!(config.throw());
}

// ============================================================================
// Error Tests
// ============================================================================

#[test]
fn test_missing_explicit_file() {
    let temp_dir = TempDir::new().unwrap();

    let mut loader = ConfigLoader::new().without_env();
    let result = loader.load_from_file(&temp_dir.path().join(CONFIG_FILE_NAME));

    assert!(matches!(result, Err(ConfigError::NotFound(_))));
}

#[test]
fn test_invalid_toml_names_the_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = create_config_file(temp_dir.path(), "[run\nverbose = ");

    let mut loader = ConfigLoader::new().without_env();
    let err = loader.load_from_file(&path).unwrap_err();

    match err {
        ConfigError::TomlParseError { file, .. } => assert_eq!(file, path),
        other => panic!("unexpected error: {}", other),
    }
}

#[rstest]
#[case::unknown_table("[report]\nverbose = true\n")]
#[case::unknown_key("[run]\nloud = true\n")]
#[case::wrong_type("[run]\nverbose = \"yes\"\n")]
fn test_rejected_configs(#[case] content: &str) {
    let temp_dir = TempDir::new().unwrap();
    let path = create_config_file(temp_dir.path(), content);

    let mut loader = ConfigLoader::new().without_env();
    assert!(matches!(
        loader.load_from_file(&path),
        Err(ConfigError::TomlParseError { .. })
    ));
}

#[test]
fn test_unknown_severity_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = create_config_file(temp_dir.path(), "[run]\nseverity = [\"fatal\"]\n");

    let mut loader = ConfigLoader::new().without_env();
    let err = loader.load_from_file(&path).unwrap_err();

    assert!(err.to_string().contains("run.severity"));
}

// ============================================================================
// Precedence Tests
// ============================================================================

#[test]
#[serial]
fn test_no_color_env_overrides_file() {
    let temp_dir = TempDir::new().unwrap();
    create_config_file(temp_dir.path(), "[run]\ncolor = true\n");

    env::set_var("NO_COLOR", "1");

    let mut loader = ConfigLoader::new();
    let config = loader.load_from_directory(temp_dir.path());

    env::remove_var("NO_COLOR");

    assert!(!config.unwrap().color());
}

#[test]
#[serial]
fn test_env_strict_and_flags() {
    let temp_dir = TempDir::new().unwrap();

    env::set_var("TALLY_STRICT", "false");

    let mut loader = ConfigLoader::new();
    let config = loader.load_from_directory(temp_dir.path());

    env::remove_var("TALLY_STRICT");

    let mut config = config.unwrap();
    assert!(!config.strict());

    config.apply_flags(&["prog", "--quiet", "--no-color"]);
    assert!(!config.verbose());
    assert!(!config.color());
}

#[test]
#[serial]
fn test_without_env_ignores_environment() {
    let temp_dir = TempDir::new().unwrap();

    env::set_var("TALLY_VERBOSE", "true");

    let mut loader = ConfigLoader::new().without_env();
    let config = loader.load_from_directory(temp_dir.path());

    env::remove_var("TALLY_VERBOSE");

    assert!(!config.unwrap().verbose());
}

// ============================================================================
// Flag Tests
// ============================================================================

#[rstest]
#[case(&["prog", "--skip-slow"], true)]
#[case(&["prog", "-s"], true)]
#[case(&["prog", "--skip"], false)]
#[case(&["prog"], false)]
fn test_enabled(#[case] args: &[&str], #[case] expected: bool) {
    assert_eq!(enabled(args, "skip-slow", Some('s')), expected);
}
