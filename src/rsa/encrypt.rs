// RSA Encryption Implementation
// Public-key encryption (PKCS#1 v1.5 type 2 or OAEP) and private-key encryption (type 1)

use tracing::debug;
use zeroize::Zeroize;

use super::bigint::{from_bytes, mod_pow, to_bytes_padded, RsaBigInt};
use super::config::{RsaConfig, RsaPadding};
use super::decrypt::private_op;
use super::keygen::{RsaPrivateKey, RsaPublicKey};
use crate::codec::{encode_ciphertext, KeyMaterial};
use crate::error::{CryptoError, Result};
use crate::padding::{pad_oaep, pad_pkcs1_v15, pad_pkcs1_v15_type1};

/// c = m^e mod n
pub(crate) fn public_op(m: &RsaBigInt, key: &RsaPublicKey) -> RsaBigInt {
    mod_pow(m, &key.e, &key.n)
}

/// Split plaintext into blocks of at most `capacity` bytes.
///
/// Without segmentation the whole message must fit in one block. Empty input
/// still produces one (empty) block.
fn segments<'a>(
    op: &'static str,
    plaintext: &'a [u8],
    capacity: usize,
    segmented: bool,
) -> Result<Vec<&'a [u8]>> {
    if plaintext.len() <= capacity {
        return Ok(vec![plaintext]);
    }
    if !segmented || capacity == 0 {
        return Err(CryptoError::PlaintextTooLong {
            op,
            max: capacity,
            actual: plaintext.len(),
        });
    }
    Ok(plaintext.chunks(capacity).collect())
}

/// Encrypt bytes using RSA public key
/// Returns the concatenated modulus-sized ciphertext blocks
pub fn encrypt_bytes(
    plaintext: &[u8],
    public_key: &RsaPublicKey,
    config: &RsaConfig,
) -> Result<Vec<u8>> {
    const OP: &str = "public_encrypt";

    let key_bytes = public_key.size();
    let capacity = config.capacity(key_bytes)?;
    let blocks = segments(OP, plaintext, capacity, config.is_segmented())?;

    let mut ciphertext = Vec::with_capacity(blocks.len() * key_bytes);
    for block in blocks {
        // Apply padding
        let mut padded = match config.oaep_params() {
            Some(params) => pad_oaep(block, key_bytes, &params)?,
            None => pad_pkcs1_v15(block, key_bytes)?,
        };

        // Compute c = m^e mod n
        let m = from_bytes(&padded);
        padded.zeroize();
        let c = public_op(&m, public_key);

        // Pad with leading zeros to match key size
        let encrypted = to_bytes_padded(&c, key_bytes).ok_or(CryptoError::InvalidKey {
            op: OP,
            reason: "ciphertext exceeds modulus size",
        })?;
        ciphertext.extend_from_slice(&encrypted);
    }

    Ok(ciphertext)
}

/// Encrypt with a public key and return Base64 ciphertext
pub fn public_encrypt(
    plaintext: &[u8],
    public_key: &KeyMaterial,
    config: &RsaConfig,
) -> Result<String> {
    let key = public_key.to_public_key()?;
    debug!(
        bits = key.bit_length(),
        padding = %config.padding(),
        len = plaintext.len(),
        "RSA public encrypt"
    );
    let ciphertext = encrypt_bytes(plaintext, &key, config)?;
    Ok(encode_ciphertext(&ciphertext))
}

/// Encrypt a UTF-8 string using RSA public key
pub fn public_encrypt_str(
    plaintext: &str,
    public_key: &KeyMaterial,
    config: &RsaConfig,
) -> Result<String> {
    public_encrypt(plaintext.as_bytes(), public_key, config)
}

/// Encrypt with the private key using PKCS#1 v1.5 block type 1.
///
/// Anyone holding the public key can recover the plaintext with
/// [`public_decrypt`](super::decrypt::public_decrypt).
pub fn private_encrypt_bytes(
    plaintext: &[u8],
    private_key: &RsaPrivateKey,
    config: &RsaConfig,
) -> Result<Vec<u8>> {
    const OP: &str = "private_encrypt";

    if config.padding() == RsaPadding::Oaep {
        return Err(CryptoError::InvalidConfig {
            op: OP,
            reason: "OAEP cannot be used for private-key encryption",
        });
    }

    let key_bytes = private_key.size();
    let capacity = config.capacity(key_bytes)?;
    let blocks = segments(OP, plaintext, capacity, config.is_segmented())?;

    let mut ciphertext = Vec::with_capacity(blocks.len() * key_bytes);
    for block in blocks {
        let mut padded = pad_pkcs1_v15_type1(block, key_bytes)?;
        let m = from_bytes(&padded);
        padded.zeroize();

        let c = private_op(&m, private_key);
        let encrypted = to_bytes_padded(&c, key_bytes).ok_or(CryptoError::InvalidKey {
            op: OP,
            reason: "ciphertext exceeds modulus size",
        })?;
        ciphertext.extend_from_slice(&encrypted);
    }

    Ok(ciphertext)
}

/// Encrypt with a private key and return Base64 ciphertext
pub fn private_encrypt(
    plaintext: &[u8],
    private_key: &KeyMaterial,
    config: &RsaConfig,
) -> Result<String> {
    let key = private_key.to_private_key()?;
    debug!(
        bits = key.bit_length(),
        len = plaintext.len(),
        "RSA private encrypt"
    );
    let ciphertext = private_encrypt_bytes(plaintext, &key, config)?;
    Ok(encode_ciphertext(&ciphertext))
}
