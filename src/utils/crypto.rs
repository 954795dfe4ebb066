//! Seed handling utilities.
//!
//! Random seed generation and hex seed parsing. Seed buffers are returned
//! in [`Zeroizing`] wrappers so they are wiped when dropped.

use crate::{HdError, Result};
use rand::{CryptoRng, RngCore};
use zeroize::Zeroizing;

/// Seed length used when none is given
pub const DEFAULT_SEED_LENGTH: usize = 32;

/// Shortest seed BIP32 recommends
pub const MIN_SEED_LENGTH: usize = 16;

/// Longest seed BIP32 recommends
pub const MAX_SEED_LENGTH: usize = 64;

/// Secure random number generator wrapper
pub struct SecureRng {
    rng: rand::rngs::ThreadRng,
}

impl SecureRng {
    /// Create a new secure random number generator
    pub fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
        }
    }

    /// Generate a random seed of `len` bytes.
    pub fn random_seed(&mut self, len: usize) -> Result<Zeroizing<Vec<u8>>> {
        if !(MIN_SEED_LENGTH..=MAX_SEED_LENGTH).contains(&len) {
            return Err(HdError::InvalidSeed(format!(
                "random seed length must be between {} and {} bytes, got {}",
                MIN_SEED_LENGTH, MAX_SEED_LENGTH, len
            )));
        }
        let mut seed = Zeroizing::new(vec![0u8; len]);
        self.rng
            .try_fill_bytes(&mut seed)
            .map_err(|e| HdError::Crypto(format!("Random number generator failed: {}", e)))?;
        Ok(seed)
    }
}

impl Default for SecureRng {
    fn default() -> Self {
        Self::new()
    }
}

impl RngCore for SecureRng {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.rng.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
        self.rng.try_fill_bytes(dest)
    }
}

impl CryptoRng for SecureRng {}

/// Generate a [`DEFAULT_SEED_LENGTH`]-byte random seed.
pub fn random_seed() -> Result<Zeroizing<Vec<u8>>> {
    SecureRng::new().random_seed(DEFAULT_SEED_LENGTH)
}

/// Decode a hex seed. An optional `0x` prefix and surrounding whitespace are
/// ignored.
pub fn parse_seed_hex(text: &str) -> Result<Zeroizing<Vec<u8>>> {
    let trimmed = text.trim();
    let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    if digits.is_empty() {
        return Err(HdError::InvalidSeed("seed must not be empty".to_string()));
    }
    Ok(Zeroizing::new(hex::decode(digits)?))
}
