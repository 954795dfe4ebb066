//! Building blocks for hierarchical deterministic keys.

pub mod base58;
pub mod bip32;
pub mod curve;
pub mod encode;
pub mod hash;
