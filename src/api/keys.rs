//! Key operations exposed to callers and the CLI.

use crate::derivation::{InvalidIndexPolicy, KeyDerivationEngine};
use crate::network::{KeyKind, Network};
use crate::primitives::bip32::{ExtendedKey, Fingerprint, KeyIdentifier, KeyMaterial};
use crate::primitives::curve::{Curve, Secp256k1Curve};
use crate::primitives::encode::{DecodedKey, ExtendedKeySerializer};
use crate::primitives::hash::{Hashes, Sha2Hashes};
use crate::Result;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

/// Derivation engine and serializer sharing one primitive set.
#[derive(Debug, Clone)]
pub struct Bip32<C = Secp256k1Curve, H = Sha2Hashes> {
    engine: KeyDerivationEngine<C, H>,
    serializer: ExtendedKeySerializer<C, H>,
}

impl Default for Bip32<Secp256k1Curve, Sha2Hashes> {
    fn default() -> Self {
        Self::new(Secp256k1Curve::new(), Sha2Hashes)
    }
}

impl<C: Curve + Clone, H: Hashes + Clone> Bip32<C, H> {
    pub fn new(curve: C, hashes: H) -> Self {
        Self {
            engine: KeyDerivationEngine::new(curve.clone(), hashes.clone()),
            serializer: ExtendedKeySerializer::new(curve, hashes),
        }
    }
}

impl<C: Curve, H: Hashes> Bip32<C, H> {
    pub fn with_policy(mut self, policy: InvalidIndexPolicy) -> Result<Self> {
        self.engine = self.engine.with_policy(policy)?;
        Ok(self)
    }

    pub fn engine(&self) -> &KeyDerivationEngine<C, H> {
        &self.engine
    }

    pub fn serializer(&self) -> &ExtendedKeySerializer<C, H> {
        &self.serializer
    }

    pub fn generate_master(&self, seed: &[u8], network: Network) -> Result<ExtendedKey> {
        self.engine.master_from_seed(seed, network)
    }

    /// Derive `path` (e.g. `m/0'/1`) starting at `parent`.
    pub fn derive_path(&self, parent: &ExtendedKey, path: &str) -> Result<ExtendedKey> {
        self.engine.derive_path_str(parent, path)
    }

    pub fn encode_key(&self, key: &ExtendedKey, network: Network) -> String {
        self.serializer.encode(key, network)
    }

    pub fn decode_key(&self, text: &str) -> Result<DecodedKey> {
        self.serializer.decode(text)
    }

    pub fn neuter(&self, key: &ExtendedKey) -> Result<ExtendedKey> {
        self.engine.neuter(key)
    }

    pub fn fingerprint(&self, key: &ExtendedKey) -> Result<Fingerprint> {
        self.engine.fingerprint(key)
    }

    pub fn identifier(&self, key: &ExtendedKey) -> Result<KeyIdentifier> {
        self.engine.identifier(key)
    }

    /// Field-by-field description of `key`.
    pub fn report(&self, key: &ExtendedKey) -> Result<KeyReport> {
        let identifier = self.engine.identifier(key)?;
        let public_key = self.engine.public_key(key)?;
        let private_key = match key.material() {
            KeyMaterial::Private(secret) => Some(Zeroizing::new(hex::encode(secret.expose_secret()))),
            KeyMaterial::Public(_) => None,
        };

        Ok(KeyReport {
            version: hex::encode(key.version()),
            network: key.network(),
            key_type: key.kind(),
            depth: format!("{:02x}", key.depth()),
            parent_fingerprint: key.parent_fingerprint().to_string(),
            index: format!("{:08x}", key.child_index()),
            fingerprint: identifier.fingerprint().to_string(),
            chain_code: hex::encode(key.chain_code().as_bytes()),
            public_key: public_key.to_string(),
            hash160: identifier.to_string(),
            private_key,
        })
    }
}

/// Human-readable breakdown of an extended key, all byte fields in hex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyReport {
    pub version: String,
    pub network: Network,
    #[serde(rename = "type")]
    pub key_type: KeyKind,
    pub depth: String,
    pub parent_fingerprint: String,
    pub index: String,
    pub fingerprint: String,
    pub chain_code: String,
    pub public_key: String,
    pub hash160: String,
    /// Hex scalar of a private key, wiped when the report is dropped.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub private_key: Option<Zeroizing<String>>,
}
