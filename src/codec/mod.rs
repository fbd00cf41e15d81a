// Codec Layer
// Textual transport encodings for ciphertext and key material

pub mod key;

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::{CryptoError, Result};

pub use key::{
    decode_private_key, decode_public_key, encode_private_key, encode_public_key, KeyFormat,
    KeyKind, KeyMaterial,
};

/// Encode ciphertext bytes as standard, padded Base64
pub fn encode_ciphertext(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode Base64 ciphertext text back to bytes.
///
/// Surrounding whitespace is ignored; anything else outside the standard
/// alphabet, or non-canonical padding, is rejected.
pub fn decode_ciphertext(text: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(text.trim())
        .map_err(|_| CryptoError::MalformedEncoding {
            op: "decode_ciphertext",
            reason: "invalid base64",
        })
}

/// Lowercase hex encoding
pub fn encode_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Decode hex text (either case)
pub fn decode_hex(text: &str) -> Result<Vec<u8>> {
    hex::decode(text.trim()).map_err(|_| CryptoError::MalformedEncoding {
        op: "decode_hex",
        reason: "invalid hex",
    })
}

/// Strip PEM armor lines and all whitespace, leaving the Base64 body
pub(crate) fn strip_armor(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.starts_with("-----"))
        .flat_map(|line| line.chars().filter(|c| !c.is_whitespace()))
        .collect()
}
