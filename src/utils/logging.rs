//! Logging setup.
//!
//! Library code logs through the `log` facade. This module maps the
//! configured [`LogLevel`] onto an `env_logger` backend; `RUST_LOG`, when
//! set, still takes precedence for individual modules.

use crate::{HdError, Result};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Log level configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Off => write!(f, "OFF"),
            LogLevel::Error => write!(f, "ERROR"),
            LogLevel::Warn => write!(f, "WARN"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Trace => write!(f, "TRACE"),
        }
    }
}

impl FromStr for LogLevel {
    type Err = HdError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" | "none" => Ok(LogLevel::Off),
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(HdError::Config(format!("Unknown log level: {}", other))),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Log level
    pub level: LogLevel,
    /// Include timestamps in logs
    pub include_timestamp: bool,
    /// Include module path in logs
    pub include_module_path: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Warn,
            include_timestamp: false,
            include_module_path: true,
        }
    }
}

/// Install the global logger. Returns `false` when a logger was already
/// installed, in which case only the maximum level is updated.
pub fn init_logging(config: &LoggingConfig) -> bool {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(config.level.into())
        .parse_default_env()
        .format_module_path(config.include_module_path)
        .format_target(false);
    if config.include_timestamp {
        builder.format_timestamp_secs();
    } else {
        builder.format_timestamp(None);
    }

    match builder.try_init() {
        Ok(()) => {
            log::debug!("Logging initialized at level {}", config.level);
            true
        }
        Err(_) => {
            // It's ok if this fails, it just means logging was already initialized.
            log::set_max_level(config.level.into());
            false
        }
    }
}
