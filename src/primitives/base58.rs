//! Base58Check framing.
//!
//! Raw base58 uses Bitcoin's alphabet through the `bs58` crate; the 4-byte
//! checksum (first bytes of SHA-256d) is computed with the injected
//! [`Hashes`] implementation.

use crate::primitives::hash::Hashes;
use crate::{HdError, Result};
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

pub const CHECKSUM_LEN: usize = 4;

/// Append a checksum to `data` and encode the result as base58.
pub fn check_encode<H: Hashes + ?Sized>(hashes: &H, data: &[u8]) -> String {
    let checksum = hashes.sha256d(data);
    let mut framed = Zeroizing::new(Vec::with_capacity(data.len() + CHECKSUM_LEN));
    framed.extend_from_slice(data);
    framed.extend_from_slice(&checksum[..CHECKSUM_LEN]);
    bs58::encode(framed.as_slice())
        .with_alphabet(bs58::Alphabet::BITCOIN)
        .into_string()
}

/// Decode a base58 string and verify its trailing checksum, returning the
/// payload without the checksum.
pub fn check_decode<H: Hashes + ?Sized>(hashes: &H, text: &str) -> Result<Zeroizing<Vec<u8>>> {
    let mut framed = Zeroizing::new(
        bs58::decode(text)
            .with_alphabet(bs58::Alphabet::BITCOIN)
            .into_vec()
            .map_err(|e| HdError::InvalidBase58(e.to_string()))?,
    );

    if framed.len() < CHECKSUM_LEN {
        return Err(HdError::InvalidLength {
            expected: CHECKSUM_LEN,
            actual: framed.len(),
        });
    }

    let split = framed.len() - CHECKSUM_LEN;
    let expected = hashes.sha256d(&framed[..split]);
    if !bool::from(framed[split..].ct_eq(&expected[..CHECKSUM_LEN])) {
        return Err(HdError::ChecksumMismatch);
    }

    framed.truncate(split);
    Ok(framed)
}
