// Error types
// One typed error per failure class; none of them carries key or message bytes

use thiserror::Error;

/// Errors produced by the codec, digest, padding and cipher layers.
///
/// `op` names the public operation that failed. Reasons are static strings
/// so that no plaintext, ciphertext or key material can leak through `Display`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Bad combination of mode, padding, digest or IV.
    #[error("{op}: invalid configuration: {reason}")]
    InvalidConfig { op: &'static str, reason: &'static str },

    /// Key material that does not parse or has an unusable size.
    #[error("{op}: invalid key: {reason}")]
    InvalidKey { op: &'static str, reason: &'static str },

    /// Unsupported modulus size, exponent, or generator failure.
    #[error("{op}: key generation failed: {reason}")]
    KeyGeneration { op: &'static str, reason: &'static str },

    /// Message exceeds what the padding scheme can carry in one block.
    #[error("{op}: plaintext too long: at most {max} bytes, got {actual}")]
    PlaintextTooLong {
        op: &'static str,
        max: usize,
        actual: usize,
    },

    /// Structural padding validation failure.
    #[error("{op}: invalid padding")]
    Padding { op: &'static str },

    /// Decryption failed. Deliberately says nothing about the cause.
    #[error("{op}: decryption failed")]
    Decryption { op: &'static str },

    /// Textual codec failure (Base64, hex, DER framing).
    #[error("{op}: malformed encoding: {reason}")]
    MalformedEncoding { op: &'static str, reason: &'static str },

    /// Unknown digest or mask-generation identifier.
    #[error("{op}: unsupported algorithm `{name}`")]
    UnsupportedAlgorithm { op: &'static str, name: String },
}

impl CryptoError {
    /// The operation that reported this error.
    pub fn op(&self) -> &'static str {
        match self {
            CryptoError::InvalidConfig { op, .. }
            | CryptoError::InvalidKey { op, .. }
            | CryptoError::KeyGeneration { op, .. }
            | CryptoError::PlaintextTooLong { op, .. }
            | CryptoError::Padding { op }
            | CryptoError::Decryption { op }
            | CryptoError::MalformedEncoding { op, .. }
            | CryptoError::UnsupportedAlgorithm { op, .. } => op,
        }
    }

    /// Collapse any error into an opaque decryption failure for `op`.
    pub(crate) fn into_decryption(self, op: &'static str) -> CryptoError {
        CryptoError::Decryption { op }
    }
}

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, CryptoError>;
