//! # hdkey-rs
//!
//! BIP32 hierarchical deterministic key derivation and extended key
//! serialization.
//!
//! One seed yields a master extended key; child keys are derived from it
//! deterministically. Hardened children require the parent's private key,
//! normal children can also be derived from the parent's public key alone.
//!
//! ## Quick Start
//!
//! ```rust
//! use hdkey_rs::{api, Network};
//!
//! let seed = hex::decode("000102030405060708090a0b0c0d0e0f").unwrap();
//! let master = api::generate_master(&seed, Network::Mainnet).unwrap();
//! let child = api::derive_path(&master, "m/0'/1").unwrap();
//!
//! let xprv = api::encode_key(&child, Network::Mainnet);
//! assert!(xprv.starts_with("xprv"));
//!
//! let decoded = api::decode_key(&xprv).unwrap();
//! assert_eq!(decoded.key, child);
//! ```
//!
//! ## Architecture Overview
//!
//! - [`network`]: version tags for each network and key kind
//! - [`primitives`]: data model, curve and hash backends, Base58Check and
//!   the extended key serializer
//! - [`derivation`]: master key generation and CKDpriv/CKDpub
//! - [`api`]: the operations callers use, over default or injected backends
//! - [`utils`]: seeds, logging and configuration
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T, HdError>`](error::HdError).
//! Nothing in the library panics on malformed input or exits the process.
//!
//! ## Thread Safety
//!
//! Keys are immutable values and derivation keeps no shared state, so
//! independent derivations can run on separate threads.

pub mod api;
pub mod derivation;
pub mod error;
pub mod network;
pub mod primitives;
pub mod utils;

pub use api::{Bip32, DecodedKey, KeyReport};
pub use derivation::{InvalidIndexPolicy, KeyDerivationEngine};
pub use error::{HdError, Result};
pub use network::{KeyKind, Network};
pub use primitives::bip32::{
    parse_path, ChainCode, ChildNumber, DerivationPath, ExtendedKey, Fingerprint, KeyIdentifier,
    KeyMaterial, PublicPoint, SecretScalar,
};
pub use primitives::curve::{Curve, Secp256k1Curve};
pub use primitives::encode::ExtendedKeySerializer;
pub use primitives::hash::{Hashes, Sha2Hashes};
pub use utils::config::{ConfigLoader, HdConfig};

/// Initializes logging from `config`. Safe to call more than once.
///
/// # Examples
///
/// ```rust
/// use hdkey_rs::{init, HdConfig};
///
/// init(&HdConfig::default()).expect("Failed to initialize");
/// ```
pub fn init(config: &HdConfig) -> Result<()> {
    config.validate()?;
    utils::logging::init_logging(&config.logging());
    log::debug!("hdkey initialized with config: {:?}", config);
    Ok(())
}
