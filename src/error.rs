use crate::primitives::bip32::ChildNumber;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HdError {
    #[error("Invalid seed: {0}")]
    InvalidSeed(String),

    #[error("Invalid derivation path '{path}': {reason}")]
    InvalidPathSyntax { path: String, reason: String },

    #[error("Cannot derive hardened child {index} from a public-only key")]
    HardenedDerivationRequiresPrivateKey { index: u32 },

    #[error("Cannot derive a child beyond depth 255")]
    DepthOverflow,

    #[error("Derived key for index {index} is invalid ({attempts} attempt(s))")]
    DerivationInvalidScalar { index: u32, attempts: u32 },

    #[error("Derivation failed at step {step} ({child}): {source}")]
    PathStep {
        step: usize,
        child: ChildNumber,
        #[source]
        source: Box<HdError>,
    },

    #[error("Unknown extended key version: {}", hex::encode(.0))]
    UnknownVersion([u8; 4]),

    #[error("Extended key checksum mismatch")]
    ChecksumMismatch,

    #[error("Invalid extended key length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Private key scalar is outside [1, n-1]")]
    InvalidScalarRange,

    #[error("Invalid compressed public key point")]
    InvalidPoint,

    #[error("Version kind does not match the key data")]
    KeyTypeMismatch,

    #[error("Zero-depth key with non-zero parent fingerprint or child index")]
    InvalidRootMetadata,

    #[error("Invalid base58 encoding: {0}")]
    InvalidBase58(String),

    #[error("Cryptographic primitive failed: {0}")]
    Crypto(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Hex decoding error: {0}")]
    Hex(#[from] hex::FromHexError),
}

impl HdError {
    /// Wraps a failure that happened while folding over a derivation path.
    pub fn at_step(step: usize, child: ChildNumber, source: HdError) -> Self {
        HdError::PathStep {
            step,
            child,
            source: Box::new(source),
        }
    }

    /// The innermost error, looking through any `PathStep` wrappers.
    pub fn root_cause(&self) -> &HdError {
        let mut current = self;
        while let HdError::PathStep { source, .. } = current {
            current = source;
        }
        current
    }
}

pub type Result<T> = std::result::Result<T, HdError>;
