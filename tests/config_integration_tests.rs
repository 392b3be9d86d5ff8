//! Integration tests for ConfigManager and configuration layering
//!
//! These tests verify:
//! - Defaults when no file or environment is present
//! - YAML file values over defaults
//! - DEVPROBES__ environment overrides over the file
//! - MONGODB_URI as the database connection string
//! - Environment strings are not reinterpreted as numbers
//! - build.env names keep their case and file order
//! - Saving a configuration and loading it back

use camino::Utf8PathBuf;
use devprobes::models::{MONGODB_URI_VAR, ToolConfig};
use devprobes::{ConfigManager, config::CONFIG_FILE_NAME};
use std::fs;
use tempfile::TempDir;

fn create_test_config_dir() -> (TempDir, Utf8PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let config_path = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
    (temp_dir, config_path)
}

fn env(pairs: &[(&str, &str)]) -> config::Map<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_defaults_without_file() {
    let (_temp_dir, config_dir) = create_test_config_dir();
    let manager = ConfigManager::new(&config_dir);

    let config = manager.load_with_env(env(&[])).unwrap();

    assert_eq!(config.api.local_url, "http://localhost:5000");
    assert_eq!(config.paths.cleanup_targets.len(), 4);
    assert!(config.database.uri.is_none());
}

#[test]
fn test_yaml_file_overrides_defaults() {
    let (_temp_dir, config_dir) = create_test_config_dir();
    fs::write(
        config_dir.join(CONFIG_FILE_NAME),
        "api:\n  local_url: http://127.0.0.1:8080\npaths:\n  uploads_dir: server/uploads\nstrict_exit: true\n",
    )
    .unwrap();

    let config = ConfigManager::new(&config_dir)
        .load_with_env(env(&[]))
        .unwrap();

    assert_eq!(config.api.local_url, "http://127.0.0.1:8080");
    assert_eq!(config.paths.uploads_dir, Utf8PathBuf::from("server/uploads"));
    assert!(config.strict_exit);
    // Untouched sections keep their defaults
    assert_eq!(config.credentials.email, "test@example.com");
}

#[test]
fn test_environment_overrides_file() {
    let (_temp_dir, config_dir) = create_test_config_dir();
    fs::write(
        config_dir.join(CONFIG_FILE_NAME),
        "api:\n  local_url: http://127.0.0.1:8080\n",
    )
    .unwrap();

    let config = ConfigManager::new(&config_dir)
        .load_with_env(env(&[
            ("DEVPROBES__API__LOCAL_URL", "http://10.0.0.5:5000"),
            ("DEVPROBES__API__REQUEST_TIMEOUT_SECS", "15"),
            ("UNRELATED", "ignored"),
        ]))
        .unwrap();

    assert_eq!(config.api.local_url, "http://10.0.0.5:5000");
    assert_eq!(config.api.request_timeout_secs, Some(15));
}

#[test]
fn test_environment_strings_keep_leading_zeros() {
    let (_temp_dir, config_dir) = create_test_config_dir();

    let config = ConfigManager::new(&config_dir)
        .load_with_env(env(&[
            ("DEVPROBES__CREDENTIALS__PASSWORD", "0123"),
            ("DEVPROBES__REGISTRATION__PASSWORD", "007"),
            ("DEVPROBES__STRICT_EXIT", "true"),
        ]))
        .unwrap();

    assert_eq!(config.credentials.password, "0123");
    assert_eq!(config.registration.password, "007");
    assert!(config.strict_exit);
}

#[test]
fn test_build_env_names_keep_case() {
    let (_temp_dir, config_dir) = create_test_config_dir();

    let config = ConfigManager::new(&config_dir)
        .load_with_env(env(&[(
            "DEVPROBES__BUILD__ENV__REACT_APP_API_URL",
            "https://api.example.com",
        )]))
        .unwrap();

    assert_eq!(
        config.build.env.get("REACT_APP_API_URL").map(String::as_str),
        Some("https://api.example.com")
    );
    assert!(!config.build.env.contains_key("react_app_api_url"));
}

#[test]
fn test_build_env_keeps_file_order_then_environment() {
    let (_temp_dir, config_dir) = create_test_config_dir();
    fs::write(
        config_dir.join(CONFIG_FILE_NAME),
        "build:\n  interpreter: nodejs\n  env:\n    REACT_APP_API_URL: http://localhost:5000\n    GENERATE_SOURCEMAP: \"false\"\n",
    )
    .unwrap();

    let config = ConfigManager::new(&config_dir)
        .load_with_env(env(&[
            ("DEVPROBES__BUILD__ENV__REACT_APP_API_URL", "https://api.example.com"),
            ("DEVPROBES__BUILD__ENV__CI", "1"),
        ]))
        .unwrap();

    assert_eq!(config.build.interpreter, "nodejs");
    let entries: Vec<(&str, &str)> = config
        .build
        .env
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    assert_eq!(
        entries,
        vec![
            ("REACT_APP_API_URL", "https://api.example.com"),
            ("GENERATE_SOURCEMAP", "false"),
            ("CI", "1"),
        ]
    );
}

#[test]
fn test_mongodb_uri_wins_over_prefixed_variable() {
    let (_temp_dir, config_dir) = create_test_config_dir();

    let config = ConfigManager::new(&config_dir)
        .load_with_env(env(&[
            ("DEVPROBES__DATABASE__URI", "mongodb://prefixed:27017"),
            (MONGODB_URI_VAR, "mongodb://plain:27017/app"),
        ]))
        .unwrap();

    assert_eq!(
        config.database.uri.as_deref(),
        Some("mongodb://plain:27017/app")
    );
}

#[test]
fn test_save_and_load_config() {
    let (_temp_dir, config_dir) = create_test_config_dir();
    let manager = ConfigManager::new(config_dir.join("nested"));

    let mut config = ToolConfig::default();
    config.api.deployed_url = "https://staging.example.com".to_string();
    config.registration.username_prefix = "smoke".to_string();
    config.logging.debug = true;

    manager.save(&config).unwrap();
    assert!(manager.config_path().exists());

    let loaded = manager.load_with_env(env(&[])).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_invalid_yaml_is_an_error() {
    let (_temp_dir, config_dir) = create_test_config_dir();
    fs::write(config_dir.join(CONFIG_FILE_NAME), "api: [unclosed").unwrap();

    let result = ConfigManager::new(&config_dir).load_with_env(env(&[]));
    assert!(result.is_err());
}
