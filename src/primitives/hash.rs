//! Bitcoin hashing utilities.
//!
//! Derivation and serialization never call a hash function directly; they go
//! through [`Hashes`] so a different implementation can be swapped in.

use crate::{HdError, Result};
use hmac::{Hmac, Mac};
use ripemd::Ripemd160;
use sha2::{Digest, Sha256, Sha512};
use zeroize::Zeroizing;

/// Hash primitives consumed by key derivation and serialization.
pub trait Hashes {
    fn sha256(&self, data: &[u8]) -> [u8; 32];

    fn ripemd160(&self, data: &[u8]) -> [u8; 20];

    /// HMAC-SHA512. The output may hold secret key material, so it is
    /// returned in a buffer that is wiped on drop.
    fn hmac_sha512(&self, key: &[u8], data: &[u8]) -> Result<Zeroizing<[u8; 64]>>;

    /// A standard Double-SHA256 is SHA256(SHA256(data)).
    fn sha256d(&self, data: &[u8]) -> [u8; 32] {
        let first = self.sha256(data);
        self.sha256(&first)
    }

    /// A standard Hash160 is RIPEMD160(SHA256(data)).
    fn hash160(&self, data: &[u8]) -> [u8; 20] {
        let first = self.sha256(data);
        self.ripemd160(&first)
    }
}

/// [`Hashes`] backed by the RustCrypto `sha2`, `ripemd` and `hmac` crates.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha2Hashes;

impl Hashes for Sha2Hashes {
    fn sha256(&self, data: &[u8]) -> [u8; 32] {
        Sha256::digest(data).into()
    }

    fn ripemd160(&self, data: &[u8]) -> [u8; 20] {
        let mut hasher = Ripemd160::new();
        hasher.update(data);
        hasher.finalize().into()
    }

    fn hmac_sha512(&self, key: &[u8], data: &[u8]) -> Result<Zeroizing<[u8; 64]>> {
        let mut mac = Hmac::<Sha512>::new_from_slice(key)
            .map_err(|e| HdError::Crypto(format!("HMAC key error: {}", e)))?;
        mac.update(data);
        let mut output = Zeroizing::new([0u8; 64]);
        output.copy_from_slice(&mac.finalize().into_bytes());
        Ok(output)
    }
}
