//! Extended key serialization.
//!
//! The 78-byte payload is laid out as
//!
//! ```text
//! version(4) | depth(1) | parent fingerprint(4) | child index(4, BE) | chain code(32) | key data(33)
//! ```
//!
//! and wrapped in Base58Check. Private key data is `0x00 || scalar`, public
//! key data is the compressed point.

use crate::network::{lookup_version, KeyKind, Network};
use crate::primitives::base58::{check_decode, check_encode};
use crate::primitives::bip32::{
    ChainCode, ChildNumber, ExtendedKey, Fingerprint, KeyMaterial, PublicPoint, SecretScalar,
};
use crate::primitives::curve::{Curve, Secp256k1Curve};
use crate::primitives::hash::{Hashes, Sha2Hashes};
use crate::{HdError, Result};
use std::fmt;
use std::io::{Cursor, Read};
use std::str::FromStr;
use zeroize::Zeroizing;

/// Length of the serialized payload before checksum framing.
pub const PAYLOAD_LEN: usize = 78;

/// Reads a header field of the payload.
pub trait Decodable: Sized {
    fn consensus_decode<R: Read>(reader: &mut R) -> Result<Self>;
}

impl Decodable for ChildNumber {
    fn consensus_decode<R: Read>(reader: &mut R) -> Result<Self> {
        let mut buf = [0u8; 4];
        reader.read_exact(&mut buf)?;
        Ok(ChildNumber::from_index(u32::from_be_bytes(buf)))
    }
}

impl Decodable for Fingerprint {
    fn consensus_decode<R: Read>(reader: &mut R) -> Result<Self> {
        let mut buf = [0u8; 4];
        reader.read_exact(&mut buf)?;
        Ok(Fingerprint(buf))
    }
}

impl Decodable for ChainCode {
    fn consensus_decode<R: Read>(reader: &mut R) -> Result<Self> {
        let mut buf = [0u8; 32];
        reader.read_exact(&mut buf)?;
        Ok(ChainCode(buf))
    }
}

/// Result of decoding an extended key string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedKey {
    pub key: ExtendedKey,
    pub network: Network,
    pub is_private: bool,
}

/// Encodes and decodes extended keys using an injected curve and hash set.
#[derive(Debug, Clone, Default)]
pub struct ExtendedKeySerializer<C = Secp256k1Curve, H = Sha2Hashes> {
    curve: C,
    hashes: H,
}

impl<C: Curve, H: Hashes> ExtendedKeySerializer<C, H> {
    pub fn new(curve: C, hashes: H) -> Self {
        Self { curve, hashes }
    }

    /// Serialize `key` under `network`'s version tags.
    pub fn encode(&self, key: &ExtendedKey, network: Network) -> String {
        let payload = self.encode_payload(key, network);
        check_encode(&self.hashes, payload.as_slice())
    }

    /// Build the raw 78-byte payload.
    pub fn encode_payload(&self, key: &ExtendedKey, network: Network) -> Zeroizing<[u8; PAYLOAD_LEN]> {
        assemble_payload(key, network)
    }

    /// Parse and validate an extended key string.
    pub fn decode(&self, text: &str) -> Result<DecodedKey> {
        let payload = check_decode(&self.hashes, text)?;
        self.decode_payload(payload.as_slice())
    }

    /// Parse and validate a raw payload (without checksum).
    pub fn decode_payload(&self, payload: &[u8]) -> Result<DecodedKey> {
        if payload.len() != PAYLOAD_LEN {
            return Err(HdError::InvalidLength {
                expected: PAYLOAD_LEN,
                actual: payload.len(),
            });
        }

        let mut version = [0u8; 4];
        version.copy_from_slice(&payload[0..4]);
        let (network, kind) = lookup_version(version).ok_or(HdError::UnknownVersion(version))?;

        let mut reader = Cursor::new(&payload[4..45]);
        let mut depth = [0u8; 1];
        reader.read_exact(&mut depth)?;
        let depth = depth[0];
        let parent_fingerprint = Fingerprint::consensus_decode(&mut reader)?;
        let child_number = ChildNumber::consensus_decode(&mut reader)?;
        let chain_code = ChainCode::consensus_decode(&mut reader)?;

        if depth == 0 && (!parent_fingerprint.is_zero() || child_number.to_index() != 0) {
            return Err(HdError::InvalidRootMetadata);
        }

        let key_data = &payload[45..78];
        let material = match kind {
            KeyKind::Private => {
                if key_data[0] != 0x00 {
                    return Err(HdError::KeyTypeMismatch);
                }
                let mut scalar = Zeroizing::new([0u8; 32]);
                scalar.copy_from_slice(&key_data[1..]);
                if !self.curve.scalar_is_valid(&scalar) {
                    return Err(HdError::InvalidScalarRange);
                }
                KeyMaterial::Private(SecretScalar::from_bytes(&scalar))
            }
            KeyKind::Public => {
                if key_data[0] == 0x00 {
                    return Err(HdError::KeyTypeMismatch);
                }
                let mut point = [0u8; 33];
                point.copy_from_slice(key_data);
                if !self.curve.point_is_valid(&point) {
                    return Err(HdError::InvalidPoint);
                }
                KeyMaterial::Public(PublicPoint::from_bytes(point))
            }
        };

        let key = ExtendedKey::new(
            network,
            depth,
            parent_fingerprint,
            child_number,
            chain_code,
            material,
        );
        Ok(DecodedKey {
            key,
            network,
            is_private: kind == KeyKind::Private,
        })
    }
}

fn assemble_payload(key: &ExtendedKey, network: Network) -> Zeroizing<[u8; PAYLOAD_LEN]> {
    let mut payload = Zeroizing::new([0u8; PAYLOAD_LEN]);
    payload[0..4].copy_from_slice(&network.version(key.kind()));
    payload[4] = key.depth();
    payload[5..9].copy_from_slice(key.parent_fingerprint().as_bytes());
    payload[9..13].copy_from_slice(&key.child_index().to_be_bytes());
    payload[13..45].copy_from_slice(key.chain_code().as_bytes());
    match key.material() {
        KeyMaterial::Private(secret) => {
            payload[45] = 0x00;
            payload[46..78].copy_from_slice(secret.expose_secret());
        }
        KeyMaterial::Public(point) => {
            payload[45..78].copy_from_slice(point.as_bytes());
        }
    }
    log::trace!(
        "Assembled {} payload at depth {}",
        network.key_prefix(key.kind()),
        key.depth()
    );
    payload
}

/// Encodes under the key's own network.
impl fmt::Display for ExtendedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let payload = assemble_payload(self, self.network());
        f.write_str(&check_encode(&Sha2Hashes, payload.as_slice()))
    }
}

impl FromStr for ExtendedKey {
    type Err = HdError;

    fn from_str(s: &str) -> Result<Self> {
        ExtendedKeySerializer::<Secp256k1Curve, Sha2Hashes>::default()
            .decode(s)
            .map(|decoded| decoded.key)
    }
}
