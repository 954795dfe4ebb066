//! Configuration management.
//!
//! Sources are layered in increasing priority:
//! - built-in defaults
//! - an optional JSON file
//! - environment variables `<PREFIX>_NETWORK`, `<PREFIX>_LOG_LEVEL` and
//!   `<PREFIX>_MAX_INDEX_RETRIES`
//!
//! The merged result is validated before it is returned.

use crate::derivation::InvalidIndexPolicy;
use crate::network::Network;
use crate::utils::logging::{LogLevel, LoggingConfig};
use crate::{HdError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable prefix used when none is given
pub const DEFAULT_ENV_PREFIX: &str = "HDKEY";

/// Library and CLI configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HdConfig {
    /// Network used for newly generated master keys
    pub network: Network,
    pub invalid_index_policy: InvalidIndexPolicy,
    pub log_level: LogLevel,
    pub log_timestamps: bool,
}

impl HdConfig {
    pub fn validate(&self) -> Result<()> {
        self.invalid_index_policy.validate()
    }

    pub fn logging(&self) -> LoggingConfig {
        LoggingConfig {
            level: self.log_level,
            include_timestamp: self.log_timestamps,
            ..LoggingConfig::default()
        }
    }
}

/// Loads [`HdConfig`] from layered sources
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    file: Option<PathBuf>,
    environment_prefix: String,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            file: None,
            environment_prefix: DEFAULT_ENV_PREFIX.to_string(),
        }
    }

    /// Read `path` as a JSON layer. A missing file is an error.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.file = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.environment_prefix = prefix.to_string();
        self
    }

    /// Merge all sources and validate the result.
    pub fn load(&self) -> Result<HdConfig> {
        let mut config_value = serde_json::to_value(HdConfig::default())?;

        if let Some(path) = &self.file {
            let file_config = Self::load_from_file(path)?;
            merge_config_values(&mut config_value, file_config);
            log::debug!("Loaded configuration file {:?}", path);
        }

        let env_config = self.load_from_environment()?;
        merge_config_values(&mut config_value, env_config);

        let config: HdConfig = serde_json::from_value(config_value)
            .map_err(|e| HdError::Config(format!("Failed to deserialize config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Write `config` as pretty JSON.
    pub fn save<P: AsRef<Path>>(config: &HdConfig, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, serde_json::to_string_pretty(config)?)?;
        log::info!("Configuration saved to {:?}", path);
        Ok(())
    }

    fn load_from_file(path: &Path) -> Result<serde_json::Value> {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| HdError::Config(format!("Failed to parse config file {:?}: {}", path, e)))
    }

    fn env_var(&self, name: &str) -> Option<String> {
        env::var(format!("{}_{}", self.environment_prefix, name))
            .ok()
            .filter(|value| !value.trim().is_empty())
    }

    fn load_from_environment(&self) -> Result<serde_json::Value> {
        let mut env_config = serde_json::Map::new();

        if let Some(value) = self.env_var("NETWORK") {
            let network: Network = value.parse()?;
            env_config.insert("network".to_string(), serde_json::to_value(network)?);
        }

        if let Some(value) = self.env_var("LOG_LEVEL") {
            let level: LogLevel = value.parse()?;
            env_config.insert("log_level".to_string(), serde_json::to_value(level)?);
        }

        if let Some(value) = self.env_var("MAX_INDEX_RETRIES") {
            let retries: u32 = value.trim().parse().map_err(|_| {
                HdError::Config(format!("Invalid {}_MAX_INDEX_RETRIES: {}", self.environment_prefix, value))
            })?;
            let policy = if retries == 0 {
                InvalidIndexPolicy::FailClosed
            } else {
                InvalidIndexPolicy::SkipToNext {
                    max_attempts: retries,
                }
            };
            env_config.insert(
                "invalid_index_policy".to_string(),
                serde_json::to_value(policy)?,
            );
        }

        Ok(serde_json::Value::Object(env_config))
    }
}

/// Overlay top-level keys of `overlay` onto `base`.
fn merge_config_values(base: &mut serde_json::Value, overlay: serde_json::Value) {
    match (base, overlay) {
        (serde_json::Value::Object(base_map), serde_json::Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                base_map.insert(key, value);
            }
        }
        (base, overlay) => {
            *base = overlay;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_merge_replaces_top_level_keys() {
        let mut base = json!({"network": "mainnet", "log_level": "warn"});
        merge_config_values(&mut base, json!({"log_level": "debug"}));
        assert_eq!(base, json!({"network": "mainnet", "log_level": "debug"}));
    }

    #[test]
    fn test_defaults_without_sources() {
        let config = ConfigLoader::new()
            .with_env_prefix("HDKEY_UNIT_DEFAULTS")
            .load()
            .unwrap();
        assert_eq!(config, HdConfig::default());
        assert_eq!(config.network, Network::Mainnet);
        assert_eq!(config.invalid_index_policy, InvalidIndexPolicy::FailClosed);
    }

    #[test]
    fn test_logging_config_from_hd_config() {
        let config = HdConfig {
            log_level: LogLevel::Debug,
            log_timestamps: true,
            ..HdConfig::default()
        };
        let logging = config.logging();
        assert_eq!(logging.level, LogLevel::Debug);
        assert!(logging.include_timestamp);
    }
}
