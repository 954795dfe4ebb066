//! Master key generation and child key derivation (CKDpriv / CKDpub).
//!
//! [`KeyDerivationEngine`] is stateless apart from its injected primitives
//! and policy, so one engine can be shared freely across threads when its
//! curve and hash backends allow it.

use crate::network::Network;
use crate::primitives::bip32::{
    parse_path, ChainCode, ChildNumber, DerivationPath, ExtendedKey, Fingerprint, KeyIdentifier,
    KeyMaterial, PublicPoint, SecretScalar, BIP32_HARDENED_KEY_LIMIT,
};
use crate::primitives::curve::{Curve, Secp256k1Curve};
use crate::primitives::hash::{Hashes, Sha2Hashes};
use crate::{HdError, Result};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

/// HMAC key used to turn a seed into the master key.
pub const MASTER_SEED_KEY: &[u8] = b"Bitcoin seed";

/// Upper bound for [`InvalidIndexPolicy::SkipToNext`] attempts.
pub const MAX_RETRY_ATTEMPTS: u32 = 16;

/// What to do when a derived child scalar or point is invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum InvalidIndexPolicy {
    /// Report `DerivationInvalidScalar` immediately.
    #[default]
    FailClosed,
    /// Try `index + 1`, `index + 2`, ... up to `max_attempts` derivations in
    /// total. Never crosses the hardened boundary and never wraps.
    SkipToNext { max_attempts: u32 },
}

impl InvalidIndexPolicy {
    pub fn max_attempts(&self) -> u32 {
        match *self {
            InvalidIndexPolicy::FailClosed => 1,
            InvalidIndexPolicy::SkipToNext { max_attempts } => max_attempts,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let InvalidIndexPolicy::SkipToNext { max_attempts } = *self {
            if !(1..=MAX_RETRY_ATTEMPTS).contains(&max_attempts) {
                return Err(HdError::Config(format!(
                    "max_attempts must be between 1 and {}, got {}",
                    MAX_RETRY_ATTEMPTS, max_attempts
                )));
            }
        }
        Ok(())
    }
}

/// Derives master and child extended keys over an injected primitive set.
#[derive(Debug, Clone, Default)]
pub struct KeyDerivationEngine<C = Secp256k1Curve, H = Sha2Hashes> {
    curve: C,
    hashes: H,
    policy: InvalidIndexPolicy,
}

impl<C: Curve, H: Hashes> KeyDerivationEngine<C, H> {
    pub fn new(curve: C, hashes: H) -> Self {
        Self {
            curve,
            hashes,
            policy: InvalidIndexPolicy::FailClosed,
        }
    }

    /// Replace the invalid-index policy after validating it.
    pub fn with_policy(mut self, policy: InvalidIndexPolicy) -> Result<Self> {
        policy.validate()?;
        self.policy = policy;
        Ok(self)
    }

    pub fn policy(&self) -> InvalidIndexPolicy {
        self.policy
    }

    pub fn curve(&self) -> &C {
        &self.curve
    }

    pub fn hashes(&self) -> &H {
        &self.hashes
    }

    /// Build the root key from a seed.
    pub fn master_from_seed(&self, seed: &[u8], network: Network) -> Result<ExtendedKey> {
        if seed.is_empty() {
            return Err(HdError::InvalidSeed("seed must not be empty".to_string()));
        }
        if !(16..=64).contains(&seed.len()) {
            log::warn!(
                "Seed length {} bytes is outside the conventional 16-64 byte range",
                seed.len()
            );
        }

        let output = self.hashes.hmac_sha512(MASTER_SEED_KEY, seed)?;
        let (il, ir) = split_output(&output);
        if !self.curve.scalar_is_valid(&il) {
            return Err(HdError::InvalidSeed(
                "seed produces an out-of-range master key".to_string(),
            ));
        }

        log::debug!("Generated {} master key", network);
        Ok(ExtendedKey::new(
            network,
            0,
            Fingerprint::ZERO,
            ChildNumber::from_index(0),
            ChainCode(*ir),
            KeyMaterial::Private(SecretScalar::from_bytes(&il)),
        ))
    }

    /// Compressed public key of `key`.
    pub fn public_key(&self, key: &ExtendedKey) -> Result<PublicPoint> {
        match key.material() {
            KeyMaterial::Public(point) => Ok(*point),
            KeyMaterial::Private(secret) => self
                .curve
                .public_from_secret(secret.expose_secret())
                .map(PublicPoint::from_bytes)
                .ok_or(HdError::InvalidScalarRange),
        }
    }

    /// HASH160 of the compressed public key.
    pub fn identifier(&self, key: &ExtendedKey) -> Result<KeyIdentifier> {
        let public = self.public_key(key)?;
        Ok(KeyIdentifier(self.hashes.hash160(public.as_bytes())))
    }

    pub fn fingerprint(&self, key: &ExtendedKey) -> Result<Fingerprint> {
        Ok(self.identifier(key)?.fingerprint())
    }

    /// Public-only counterpart of `key`; metadata is unchanged.
    pub fn neuter(&self, key: &ExtendedKey) -> Result<ExtendedKey> {
        match key.material() {
            KeyMaterial::Public(_) => Ok(key.clone()),
            KeyMaterial::Private(_) => {
                let public = self.public_key(key)?;
                Ok(key.with_material(KeyMaterial::Public(public)))
            }
        }
    }

    /// Derive the child at raw index `index` (hardened when >= 2^31).
    pub fn derive_child(&self, parent: &ExtendedKey, index: u32) -> Result<ExtendedKey> {
        if parent.depth() == u8::MAX {
            return Err(HdError::DepthOverflow);
        }
        let hardened = index >= BIP32_HARDENED_KEY_LIMIT;
        if hardened && !parent.is_private() {
            return Err(HdError::HardenedDerivationRequiresPrivateKey { index });
        }

        let parent_public = self.public_key(parent)?;
        let parent_fingerprint =
            KeyIdentifier(self.hashes.hash160(parent_public.as_bytes())).fingerprint();

        let mut attempts = 0;
        let mut current = index;
        loop {
            attempts += 1;
            if let Some((chain_code, material)) = self.derive_material(parent, &parent_public, current)? {
                log::debug!(
                    "Derived child {} at depth {}",
                    ChildNumber::from_index(current),
                    parent.depth() + 1
                );
                return Ok(ExtendedKey::new(
                    parent.network(),
                    parent.depth() + 1,
                    parent_fingerprint,
                    ChildNumber::from_index(current),
                    chain_code,
                    material,
                ));
            }

            log::warn!("Child index {} produced an invalid key", current);
            if attempts >= self.policy.max_attempts() {
                break;
            }
            match current.checked_add(1) {
                Some(next) if (next >= BIP32_HARDENED_KEY_LIMIT) == hardened => current = next,
                _ => break,
            }
        }

        Err(HdError::DerivationInvalidScalar { index, attempts })
    }

    /// One CKD step at exactly `index`. `Ok(None)` means the index is invalid.
    fn derive_material(
        &self,
        parent: &ExtendedKey,
        parent_public: &PublicPoint,
        index: u32,
    ) -> Result<Option<(ChainCode, KeyMaterial)>> {
        let mut message = Zeroizing::new(Vec::with_capacity(37));
        if index >= BIP32_HARDENED_KEY_LIMIT {
            let secret = match parent.material() {
                KeyMaterial::Private(secret) => secret,
                KeyMaterial::Public(_) => {
                    return Err(HdError::HardenedDerivationRequiresPrivateKey { index })
                }
            };
            message.push(0x00);
            message.extend_from_slice(secret.expose_secret());
        } else {
            message.extend_from_slice(parent_public.as_bytes());
        }
        message.extend_from_slice(&index.to_be_bytes());

        let output = self
            .hashes
            .hmac_sha512(parent.chain_code().as_bytes(), &message)?;
        let (il, ir) = split_output(&output);

        let material = match parent.material() {
            KeyMaterial::Private(secret) => self
                .curve
                .add_scalars(secret.expose_secret(), &il)
                .map(|child| KeyMaterial::Private(SecretScalar::from_bytes(&child))),
            KeyMaterial::Public(point) => self
                .curve
                .add_tweak_to_point(point.as_bytes(), &il)
                .map(|child| KeyMaterial::Public(PublicPoint::from_bytes(child))),
        };

        Ok(material.map(|material| (ChainCode(*ir), material)))
    }

    /// Fold [`derive_child`](Self::derive_child) over `path`, stopping at the
    /// first failing step.
    pub fn derive_path(&self, parent: &ExtendedKey, path: &DerivationPath) -> Result<ExtendedKey> {
        let mut key = parent.clone();
        for (step, child) in path.steps().iter().enumerate() {
            key = self
                .derive_child(&key, child.to_index())
                .map_err(|e| HdError::at_step(step, *child, e))?;
        }
        Ok(key)
    }

    pub fn derive_path_str(&self, parent: &ExtendedKey, path: &str) -> Result<ExtendedKey> {
        let path = parse_path(path)?;
        self.derive_path(parent, &path)
    }
}

fn split_output(output: &[u8; 64]) -> (Zeroizing<[u8; 32]>, Zeroizing<[u8; 32]>) {
    let mut il = Zeroizing::new([0u8; 32]);
    let mut ir = Zeroizing::new([0u8; 32]);
    il.copy_from_slice(&output[..32]);
    ir.copy_from_slice(&output[32..]);
    (il, ir)
}
