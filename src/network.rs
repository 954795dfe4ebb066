//! Network registry for extended key version tags.
//!
//! Every serialized extended key starts with a 4-byte version that encodes
//! both the network it belongs to and whether it carries private or public
//! key material. This module holds the static table and the lookups in
//! both directions.

use crate::{HdError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const MAINNET_PRIVATE_VERSION: [u8; 4] = [0x04, 0x88, 0xAD, 0xE4]; // xprv
const MAINNET_PUBLIC_VERSION: [u8; 4] = [0x04, 0x88, 0xB2, 0x1E]; // xpub
const TESTNET_PRIVATE_VERSION: [u8; 4] = [0x04, 0x35, 0x83, 0x94]; // tprv
const TESTNET_PUBLIC_VERSION: [u8; 4] = [0x04, 0x35, 0x87, 0xCF]; // tpub

/// Network selector for version tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    #[serde(alias = "main", alias = "bitcoin")]
    Mainnet,
    #[serde(alias = "test")]
    Testnet,
}

/// Whether an extended key carries a private scalar or only a public point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyKind {
    Private,
    Public,
}

const VERSION_TABLE: [(Network, KeyKind, [u8; 4]); 4] = [
    (Network::Mainnet, KeyKind::Private, MAINNET_PRIVATE_VERSION),
    (Network::Mainnet, KeyKind::Public, MAINNET_PUBLIC_VERSION),
    (Network::Testnet, KeyKind::Private, TESTNET_PRIVATE_VERSION),
    (Network::Testnet, KeyKind::Public, TESTNET_PUBLIC_VERSION),
];

impl Network {
    pub fn version(&self, kind: KeyKind) -> [u8; 4] {
        match (self, kind) {
            (Network::Mainnet, KeyKind::Private) => MAINNET_PRIVATE_VERSION,
            (Network::Mainnet, KeyKind::Public) => MAINNET_PUBLIC_VERSION,
            (Network::Testnet, KeyKind::Private) => TESTNET_PRIVATE_VERSION,
            (Network::Testnet, KeyKind::Public) => TESTNET_PUBLIC_VERSION,
        }
    }

    pub fn private_version_bytes(&self) -> [u8; 4] {
        self.version(KeyKind::Private)
    }

    pub fn public_version_bytes(&self) -> [u8; 4] {
        self.version(KeyKind::Public)
    }

    /// Four-character prefix the encoded form starts with (`xprv`, `tpub`, ...)
    pub fn key_prefix(&self, kind: KeyKind) -> &'static str {
        match (self, kind) {
            (Network::Mainnet, KeyKind::Private) => "xprv",
            (Network::Mainnet, KeyKind::Public) => "xpub",
            (Network::Testnet, KeyKind::Private) => "tprv",
            (Network::Testnet, KeyKind::Public) => "tpub",
        }
    }

    pub fn from_testnet_flag(testnet: bool) -> Self {
        if testnet {
            Network::Testnet
        } else {
            Network::Mainnet
        }
    }
}

/// Resolve a version tag back to its network and key kind.
pub fn lookup_version(version: [u8; 4]) -> Option<(Network, KeyKind)> {
    VERSION_TABLE
        .iter()
        .find(|(_, _, tag)| *tag == version)
        .map(|(network, kind, _)| (*network, *kind))
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Mainnet => write!(f, "mainnet"),
            Network::Testnet => write!(f, "testnet"),
        }
    }
}

impl FromStr for Network {
    type Err = HdError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "main" | "mainnet" | "bitcoin" => Ok(Network::Mainnet),
            "test" | "testnet" => Ok(Network::Testnet),
            other => Err(HdError::Config(format!("Unknown network: {}", other))),
        }
    }
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyKind::Private => write!(f, "Private"),
            KeyKind::Public => write!(f, "Public"),
        }
    }
}
