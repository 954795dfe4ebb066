//! High-level API.
//!
//! The free functions use the default secp256k1 and SHA-2 backends with the
//! fail-closed invalid-index policy. Use [`Bip32`] to inject other
//! primitives or a retry policy.

pub mod keys;

pub use keys::{Bip32, KeyReport};
pub use crate::primitives::encode::DecodedKey;

use crate::network::Network;
use crate::primitives::bip32::{ExtendedKey, Fingerprint, KeyIdentifier};
use crate::Result;

fn backend() -> Bip32 {
    Bip32::default()
}

/// Build the master key for `seed`.
pub fn generate_master(seed: &[u8], network: Network) -> Result<ExtendedKey> {
    backend().generate_master(seed, network)
}

/// Derive the key at `path` below `parent`.
pub fn derive_path(parent: &ExtendedKey, path: &str) -> Result<ExtendedKey> {
    backend().derive_path(parent, path)
}

pub fn encode_key(key: &ExtendedKey, network: Network) -> String {
    backend().encode_key(key, network)
}

pub fn decode_key(text: &str) -> Result<DecodedKey> {
    backend().decode_key(text)
}

pub fn neuter(key: &ExtendedKey) -> Result<ExtendedKey> {
    backend().neuter(key)
}

pub fn fingerprint(key: &ExtendedKey) -> Result<Fingerprint> {
    backend().fingerprint(key)
}

pub fn identifier(key: &ExtendedKey) -> Result<KeyIdentifier> {
    backend().identifier(key)
}

pub fn report(key: &ExtendedKey) -> Result<KeyReport> {
    backend().report(key)
}
