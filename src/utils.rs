//! Ambient utilities: seeds, logging and configuration.

pub mod config;
pub mod crypto;
pub mod logging;

pub use config::{ConfigLoader, HdConfig};
pub use crypto::{parse_seed_hex, random_seed, SecureRng};
pub use logging::{init_logging, LogLevel, LoggingConfig};
