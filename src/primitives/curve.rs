//! Elliptic curve operations needed by BIP32.
//!
//! All values cross this boundary as fixed-size big-endian byte arrays:
//! 32-byte scalars and 33-byte compressed points. The default backend is
//! libsecp256k1 through the `secp256k1` crate.

use secp256k1::{All, PublicKey, Scalar, Secp256k1, SecretKey};
use std::fmt;
use zeroize::Zeroizing;

/// Curve arithmetic consumed by key derivation and serialization.
pub trait Curve {
    /// True when `scalar` lies in `[1, n-1]`.
    fn scalar_is_valid(&self, scalar: &[u8; 32]) -> bool;

    /// True when `tweak` lies in `[0, n-1]`.
    fn tweak_is_valid(&self, tweak: &[u8; 32]) -> bool;

    /// `G * scalar` in compressed form, or `None` for an invalid scalar.
    fn public_from_secret(&self, scalar: &[u8; 32]) -> Option<[u8; 33]>;

    /// `(scalar + tweak) mod n`. `None` when the tweak is not below `n`
    /// or the sum is zero.
    fn add_scalars(&self, scalar: &[u8; 32], tweak: &[u8; 32]) -> Option<Zeroizing<[u8; 32]>>;

    /// `G * tweak + point`. `None` when the tweak is not below `n`, the
    /// point is invalid, or the sum is the point at infinity.
    fn add_tweak_to_point(&self, point: &[u8; 33], tweak: &[u8; 32]) -> Option<[u8; 33]>;

    /// True for a 33-byte compressed encoding (prefix 0x02/0x03) of a
    /// point on the curve.
    fn point_is_valid(&self, point: &[u8; 33]) -> bool;
}

/// [`Curve`] backed by libsecp256k1.
#[derive(Clone)]
pub struct Secp256k1Curve {
    secp: Secp256k1<All>,
}

impl Secp256k1Curve {
    pub fn new() -> Self {
        Self {
            secp: Secp256k1::new(),
        }
    }
}

impl Default for Secp256k1Curve {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Secp256k1Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secp256k1Curve")
    }
}

impl Curve for Secp256k1Curve {
    fn scalar_is_valid(&self, scalar: &[u8; 32]) -> bool {
        match SecretKey::from_slice(scalar) {
            Ok(mut secret) => {
                secret.non_secure_erase();
                true
            }
            Err(_) => false,
        }
    }

    fn tweak_is_valid(&self, tweak: &[u8; 32]) -> bool {
        Scalar::from_be_bytes(*tweak).is_ok()
    }

    fn public_from_secret(&self, scalar: &[u8; 32]) -> Option<[u8; 33]> {
        let mut secret = SecretKey::from_slice(scalar).ok()?;
        let public = PublicKey::from_secret_key(&self.secp, &secret);
        secret.non_secure_erase();
        Some(public.serialize())
    }

    fn add_scalars(&self, scalar: &[u8; 32], tweak: &[u8; 32]) -> Option<Zeroizing<[u8; 32]>> {
        let tweak = Scalar::from_be_bytes(*tweak).ok()?;
        let mut secret = SecretKey::from_slice(scalar).ok()?;
        // add_tweak rejects a zero result
        let child = secret.add_tweak(&tweak);
        secret.non_secure_erase();
        let mut child = child.ok()?;
        let bytes = Zeroizing::new(child.secret_bytes());
        child.non_secure_erase();
        Some(bytes)
    }

    fn add_tweak_to_point(&self, point: &[u8; 33], tweak: &[u8; 32]) -> Option<[u8; 33]> {
        let tweak = Scalar::from_be_bytes(*tweak).ok()?;
        let public = PublicKey::from_slice(point).ok()?;
        public
            .add_exp_tweak(&self.secp, &tweak)
            .ok()
            .map(|child| child.serialize())
    }

    fn point_is_valid(&self, point: &[u8; 33]) -> bool {
        matches!(point[0], 0x02 | 0x03) && PublicKey::from_slice(point).is_ok()
    }
}
