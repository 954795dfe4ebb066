//! BIP32 Hierarchical Deterministic Keys.
//!
//! Value types only: extended keys, their metadata, and derivation paths.
//! The arithmetic that produces them lives in [`crate::derivation`].

use crate::network::{KeyKind, Network};
use crate::{HdError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

pub const BIP32_HARDENED_KEY_LIMIT: u32 = 0x80000000;

/// Chain code for BIP32 key derivation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainCode(pub [u8; 32]);

impl ChainCode {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

/// Key fingerprint (first 4 bytes of HASH160 of public key)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Fingerprint(pub [u8; 4]);

impl Fingerprint {
    /// Parent fingerprint of a master key.
    pub const ZERO: Fingerprint = Fingerprint([0; 4]);

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0; 4]
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// Key identifier, HASH160 of the compressed public key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyIdentifier(pub [u8; 20]);

impl KeyIdentifier {
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint([self.0[0], self.0[1], self.0[2], self.0[3]])
    }
}

impl fmt::Display for KeyIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// A 32-byte private scalar.
///
/// Wiped on drop, compared in constant time and never printed.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretScalar([u8; 32]);

impl SecretScalar {
    /// Copies the scalar out of `bytes`. Range checking is the caller's job.
    pub(crate) fn from_bytes(bytes: &[u8; 32]) -> Self {
        SecretScalar(*bytes)
    }

    pub fn expose_secret(&self) -> &[u8; 32] {
        &self.0
    }
}

impl PartialEq for SecretScalar {
    fn eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

impl Eq for SecretScalar {}

impl fmt::Debug for SecretScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretScalar([REDACTED])")
    }
}

/// A curve point in 33-byte compressed form
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicPoint([u8; 33]);

impl PublicPoint {
    /// Wraps bytes already checked by a [`Curve`](crate::primitives::curve::Curve).
    pub(crate) fn from_bytes(bytes: [u8; 33]) -> Self {
        PublicPoint(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 33] {
        &self.0
    }
}

impl fmt::Debug for PublicPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicPoint({})", hex::encode(self.0))
    }
}

impl fmt::Display for PublicPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// Key material of an extended key: exactly one of a private scalar or a
/// public point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyMaterial {
    Private(SecretScalar),
    Public(PublicPoint),
}

impl KeyMaterial {
    pub fn kind(&self) -> KeyKind {
        match self {
            KeyMaterial::Private(_) => KeyKind::Private,
            KeyMaterial::Public(_) => KeyKind::Public,
        }
    }
}

/// A child number for a derived key.
///
/// Stores the raw 32-bit index, so every value is a valid child. Build one
/// with [`ChildNumber::normal`], [`ChildNumber::hardened`] or
/// [`ChildNumber::from_index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChildNumber(u32);

impl ChildNumber {
    /// Interpret a raw 32-bit index; values at or above 2^31 are hardened.
    pub fn from_index(index: u32) -> Self {
        ChildNumber(index)
    }

    /// Non-hardened child `index`, which must be below 2^31.
    pub fn normal(index: u32) -> Result<Self> {
        Self::checked(index).map(ChildNumber)
    }

    /// Hardened child `index'`, which must be below 2^31.
    pub fn hardened(index: u32) -> Result<Self> {
        Self::checked(index).map(|i| ChildNumber(i | BIP32_HARDENED_KEY_LIMIT))
    }

    fn checked(index: u32) -> Result<u32> {
        if index >= BIP32_HARDENED_KEY_LIMIT {
            return Err(HdError::InvalidPathSyntax {
                path: index.to_string(),
                reason: format!("index must be below {}", BIP32_HARDENED_KEY_LIMIT),
            });
        }
        Ok(index)
    }

    /// The raw 32-bit index as it appears in serialization.
    pub fn to_index(&self) -> u32 {
        self.0
    }

    /// The index with the hardened bit cleared, as written in a path.
    pub fn index(&self) -> u32 {
        self.0 & !BIP32_HARDENED_KEY_LIMIT
    }

    pub fn is_hardened(&self) -> bool {
        self.0 & BIP32_HARDENED_KEY_LIMIT != 0
    }
}

impl From<u32> for ChildNumber {
    fn from(index: u32) -> Self {
        ChildNumber::from_index(index)
    }
}

impl fmt::Display for ChildNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_hardened() {
            write!(f, "{}'", self.index())
        } else {
            write!(f, "{}", self.index())
        }
    }
}

impl Serialize for ChildNumber {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_index().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ChildNumber {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        u32::deserialize(deserializer).map(ChildNumber::from_index)
    }
}

/// Derivation path for BIP32 key derivation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct DerivationPath {
    path: Vec<ChildNumber>,
}

impl DerivationPath {
    pub fn new(path: Vec<ChildNumber>) -> Self {
        DerivationPath { path }
    }

    /// The empty path `m`
    pub fn master() -> Self {
        DerivationPath { path: Vec::new() }
    }

    pub fn steps(&self) -> &[ChildNumber] {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    pub fn parent(&self) -> Option<DerivationPath> {
        let (_, init) = self.path.split_last()?;
        Some(DerivationPath::new(init.to_vec()))
    }

    pub fn child(&self, child: ChildNumber) -> DerivationPath {
        let mut path = self.path.clone();
        path.push(child);
        DerivationPath::new(path)
    }
}

/// Parse `m/0'/1/2h`-style text into a [`DerivationPath`].
///
/// The first segment must be `m` or `M`. Every other segment is a decimal
/// index below 2^31, optionally followed by `'` or `h` for hardened.
pub fn parse_path(text: &str) -> Result<DerivationPath> {
    let syntax_error = |reason: String| HdError::InvalidPathSyntax {
        path: text.to_string(),
        reason,
    };

    let mut segments = text.split('/');
    match segments.next() {
        Some("m") | Some("M") => {}
        _ => return Err(syntax_error("path must start with 'm' or 'M'".to_string())),
    }

    let mut path = Vec::new();
    for segment in segments {
        let (digits, hardened) = match segment.strip_suffix('\'').or_else(|| segment.strip_suffix('h')) {
            Some(digits) => (digits, true),
            None => (segment, false),
        };

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(syntax_error(format!("invalid path component '{}'", segment)));
        }

        let index: u32 = digits
            .parse()
            .map_err(|_| syntax_error(format!("path component '{}' is out of range", segment)))?;
        if index >= BIP32_HARDENED_KEY_LIMIT {
            return Err(syntax_error(format!(
                "path component index too large: {}",
                index
            )));
        }

        path.push(if hardened {
            ChildNumber::hardened(index)?
        } else {
            ChildNumber::normal(index)?
        });
    }

    Ok(DerivationPath::new(path))
}

impl FromStr for DerivationPath {
    type Err = HdError;

    fn from_str(s: &str) -> Result<Self> {
        parse_path(s)
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m")?;
        for child in &self.path {
            write!(f, "/{}", child)?;
        }
        Ok(())
    }
}

impl From<Vec<ChildNumber>> for DerivationPath {
    fn from(path: Vec<ChildNumber>) -> Self {
        DerivationPath::new(path)
    }
}

/// Extended key: key material plus chain code and tree metadata.
///
/// Values are immutable; derivation and neutering build new keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendedKey {
    network: Network,
    depth: u8,
    parent_fingerprint: Fingerprint,
    child_number: ChildNumber,
    chain_code: ChainCode,
    material: KeyMaterial,
}

impl ExtendedKey {
    pub(crate) fn new(
        network: Network,
        depth: u8,
        parent_fingerprint: Fingerprint,
        child_number: ChildNumber,
        chain_code: ChainCode,
        material: KeyMaterial,
    ) -> Self {
        ExtendedKey {
            network,
            depth,
            parent_fingerprint,
            child_number,
            chain_code,
            material,
        }
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    pub fn parent_fingerprint(&self) -> Fingerprint {
        self.parent_fingerprint
    }

    pub fn child_number(&self) -> ChildNumber {
        self.child_number
    }

    pub fn child_index(&self) -> u32 {
        self.child_number.to_index()
    }

    pub fn chain_code(&self) -> &ChainCode {
        &self.chain_code
    }

    pub fn material(&self) -> &KeyMaterial {
        &self.material
    }

    pub fn kind(&self) -> KeyKind {
        self.material.kind()
    }

    pub fn is_private(&self) -> bool {
        matches!(self.material, KeyMaterial::Private(_))
    }

    /// Version tag for this key on its own network.
    pub fn version(&self) -> [u8; 4] {
        self.network.version(self.kind())
    }

    /// A true master: depth 0, zero parent fingerprint and index 0.
    pub fn is_master(&self) -> bool {
        self.depth == 0 && self.parent_fingerprint.is_zero() && self.child_index() == 0
    }

    /// Same metadata with the key material replaced.
    pub(crate) fn with_material(&self, material: KeyMaterial) -> Self {
        ExtendedKey {
            material,
            ..self.clone()
        }
    }
}
