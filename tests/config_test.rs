//! Configuration layering: defaults, JSON file, environment

use hdkey_rs::utils::logging::LogLevel;
use hdkey_rs::{ConfigLoader, HdConfig, HdError, InvalidIndexPolicy, Network};
use std::env;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_file_overrides_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("hdkey.json");
    fs::write(
        &path,
        r#"{"network": "test", "log_level": "debug", "invalid_index_policy": {"mode": "skip_to_next", "max_attempts": 4}}"#,
    )
    .unwrap();

    let config = ConfigLoader::new()
        .with_env_prefix("HDKEY_TEST_FILE")
        .with_file(&path)
        .load()
        .unwrap();

    assert_eq!(config.network, Network::Testnet);
    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(
        config.invalid_index_policy,
        InvalidIndexPolicy::SkipToNext { max_attempts: 4 }
    );
    assert!(!config.log_timestamps);
}

#[test]
fn test_environment_overrides_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("hdkey.json");
    fs::write(&path, r#"{"network": "mainnet", "log_level": "error"}"#).unwrap();

    env::set_var("HDKEY_TEST_ENV_NETWORK", "testnet");
    env::set_var("HDKEY_TEST_ENV_MAX_INDEX_RETRIES", "3");

    let config = ConfigLoader::new()
        .with_env_prefix("HDKEY_TEST_ENV")
        .with_file(&path)
        .load()
        .unwrap();

    assert_eq!(config.network, Network::Testnet);
    assert_eq!(config.log_level, LogLevel::Error);
    assert_eq!(
        config.invalid_index_policy,
        InvalidIndexPolicy::SkipToNext { max_attempts: 3 }
    );

    env::remove_var("HDKEY_TEST_ENV_NETWORK");
    env::remove_var("HDKEY_TEST_ENV_MAX_INDEX_RETRIES");
}

#[test]
fn test_zero_retries_means_fail_closed() {
    env::set_var("HDKEY_TEST_ZERO_MAX_INDEX_RETRIES", "0");
    let config = ConfigLoader::new()
        .with_env_prefix("HDKEY_TEST_ZERO")
        .load()
        .unwrap();
    assert_eq!(config.invalid_index_policy, InvalidIndexPolicy::FailClosed);
    env::remove_var("HDKEY_TEST_ZERO_MAX_INDEX_RETRIES");
}

#[test]
fn test_invalid_environment_values() {
    env::set_var("HDKEY_TEST_BAD_LOG_LEVEL", "loud");
    let err = ConfigLoader::new()
        .with_env_prefix("HDKEY_TEST_BAD")
        .load()
        .unwrap_err();
    assert!(matches!(err, HdError::Config(_)));
    env::remove_var("HDKEY_TEST_BAD_LOG_LEVEL");

    env::set_var("HDKEY_TEST_RETRIES_MAX_INDEX_RETRIES", "64");
    let err = ConfigLoader::new()
        .with_env_prefix("HDKEY_TEST_RETRIES")
        .load()
        .unwrap_err();
    assert!(matches!(err, HdError::Config(_)));
    env::remove_var("HDKEY_TEST_RETRIES_MAX_INDEX_RETRIES");
}

#[test]
fn test_missing_and_malformed_files() {
    let temp_dir = TempDir::new().unwrap();

    let missing = ConfigLoader::new()
        .with_env_prefix("HDKEY_TEST_MISSING")
        .with_file(temp_dir.path().join("absent.json"))
        .load();
    assert!(matches!(missing, Err(HdError::Io(_))));

    let path = temp_dir.path().join("broken.json");
    fs::write(&path, "{ not json").unwrap();
    let broken = ConfigLoader::new()
        .with_env_prefix("HDKEY_TEST_MISSING")
        .with_file(&path)
        .load();
    assert!(matches!(broken, Err(HdError::Config(_))));
}

#[test]
fn test_save_then_load() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("hdkey.json");

    let config = HdConfig {
        network: Network::Testnet,
        invalid_index_policy: InvalidIndexPolicy::SkipToNext { max_attempts: 16 },
        log_level: LogLevel::Trace,
        log_timestamps: true,
    };
    ConfigLoader::save(&config, &path).unwrap();

    let loaded = ConfigLoader::new()
        .with_env_prefix("HDKEY_TEST_SAVE")
        .with_file(&path)
        .load()
        .unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_init_validates_config() {
    let config = HdConfig {
        invalid_index_policy: InvalidIndexPolicy::SkipToNext { max_attempts: 0 },
        ..HdConfig::default()
    };
    assert!(hdkey_rs::init(&config).is_err());
    assert!(hdkey_rs::init(&HdConfig::default()).is_ok());
}
