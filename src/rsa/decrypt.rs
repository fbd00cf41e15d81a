// RSA Decryption Implementation
// Implements RSA decryption with Chinese Remainder Theorem (CRT) optimization

use num_traits::Zero;
use tracing::debug;
use zeroize::Zeroize;

use super::bigint::{from_bytes, mod_inverse, mod_pow, random_biguint, to_bytes_padded, RsaBigInt};
use super::config::{RsaConfig, RsaPadding};
use super::encrypt::public_op;
use super::keygen::{RsaPrivateKey, RsaPublicKey};
use crate::codec::{decode_ciphertext, KeyMaterial};
use crate::error::{CryptoError, Result};
use crate::padding::{unpad_oaep, unpad_pkcs1_v15, unpad_pkcs1_v15_type1};

/// Decrypt using Chinese Remainder Theorem (CRT)
/// This is faster than regular decryption because we work with smaller numbers
fn decrypt_crt(c: &RsaBigInt, key: &RsaPrivateKey) -> RsaBigInt {
    // m1 = c^d_p mod p
    let m1 = mod_pow(c, &key.d_p, &key.p);

    // m2 = c^d_q mod q
    let m2 = mod_pow(c, &key.d_q, &key.q);

    // h = (m1 - m2) * q_inv mod p
    let m2_mod_p = &m2 % &key.p;
    let diff = if m1 >= m2_mod_p {
        m1 - m2_mod_p
    } else {
        m1 + &key.p - m2_mod_p
    };
    let h = (diff * &key.q_inv) % &key.p;

    // m = m2 + q * h
    m2 + &key.q * h
}

/// Random r in [1, n) with an inverse mod n
fn blinding_factor(n: &RsaBigInt) -> (RsaBigInt, RsaBigInt) {
    loop {
        let r = random_biguint(n);
        if r.is_zero() {
            continue;
        }
        if let Some(r_inv) = mod_inverse(&r, n) {
            return (r, r_inv);
        }
    }
}

/// m = c^d mod n, computed on a blinded input so timing does not depend on `c`
pub(crate) fn private_op(c: &RsaBigInt, key: &RsaPrivateKey) -> RsaBigInt {
    let (r, r_inv) = blinding_factor(&key.n);
    let blinded = (c * mod_pow(&r, &key.e, &key.n)) % &key.n;
    let m = decrypt_crt(&blinded, key);
    (m * r_inv) % &key.n
}

/// Split ciphertext into modulus-sized blocks, rejecting lengths that cannot be valid
fn ciphertext_blocks<'a>(
    op: &'static str,
    ciphertext: &'a [u8],
    key_bytes: usize,
    segmented: bool,
) -> Result<std::slice::ChunksExact<'a, u8>> {
    let aligned = !ciphertext.is_empty() && ciphertext.len() % key_bytes == 0;
    if !aligned || (!segmented && ciphertext.len() != key_bytes) {
        return Err(CryptoError::Decryption { op });
    }
    Ok(ciphertext.chunks_exact(key_bytes))
}

/// Decrypt ciphertext bytes using RSA private key
/// Returns plaintext as bytes
///
/// Every failure after the configuration check is reported as the same
/// opaque [`CryptoError::Decryption`].
pub fn decrypt_bytes(
    ciphertext: &[u8],
    private_key: &RsaPrivateKey,
    config: &RsaConfig,
) -> Result<Vec<u8>> {
    const OP: &str = "private_decrypt";

    let key_bytes = private_key.size();
    config.capacity(key_bytes)?;

    let mut plaintext = Vec::new();
    for block in ciphertext_blocks(OP, ciphertext, key_bytes, config.is_segmented())? {
        let c = from_bytes(block);
        if c >= private_key.n {
            plaintext.zeroize();
            return Err(CryptoError::Decryption { op: OP });
        }

        let m = private_op(&c, private_key);
        let Some(mut padded) = to_bytes_padded(&m, key_bytes) else {
            plaintext.zeroize();
            return Err(CryptoError::Decryption { op: OP });
        };

        let unpadded = match config.oaep_params() {
            Some(params) => unpad_oaep(&padded, &params),
            None => unpad_pkcs1_v15(&padded),
        };
        padded.zeroize();

        match unpadded {
            Ok(mut message) => {
                plaintext.extend_from_slice(&message);
                message.zeroize();
            }
            Err(err) => {
                plaintext.zeroize();
                return Err(err.into_decryption(OP));
            }
        }
    }

    Ok(plaintext)
}

/// Decrypt Base64 ciphertext with a private key
pub fn private_decrypt(
    ciphertext: &str,
    private_key: &KeyMaterial,
    config: &RsaConfig,
) -> Result<Vec<u8>> {
    let key = private_key.to_private_key()?;
    config.capacity(key.size())?;
    debug!(
        bits = key.bit_length(),
        padding = %config.padding(),
        "RSA private decrypt"
    );

    let bytes = decode_ciphertext(ciphertext).map_err(|e| e.into_decryption("private_decrypt"))?;
    decrypt_bytes(&bytes, &key, config)
}

/// Decrypt ciphertext to a string
pub fn private_decrypt_to_string(
    ciphertext: &str,
    private_key: &KeyMaterial,
    config: &RsaConfig,
) -> Result<String> {
    let plaintext = private_decrypt(ciphertext, private_key, config)?;
    String::from_utf8(plaintext).map_err(|e| {
        e.into_bytes().zeroize();
        CryptoError::Decryption {
            op: "private_decrypt",
        }
    })
}

/// Recover data produced by private-key encryption (PKCS#1 v1.5 block type 1)
pub fn public_decrypt_bytes(
    ciphertext: &[u8],
    public_key: &RsaPublicKey,
    config: &RsaConfig,
) -> Result<Vec<u8>> {
    const OP: &str = "public_decrypt";

    if config.padding() == RsaPadding::Oaep {
        return Err(CryptoError::InvalidConfig {
            op: OP,
            reason: "OAEP cannot be used for private-key encryption",
        });
    }

    let key_bytes = public_key.size();
    config.capacity(key_bytes)?;

    let mut plaintext = Vec::new();
    for block in ciphertext_blocks(OP, ciphertext, key_bytes, config.is_segmented())? {
        let c = from_bytes(block);
        if c >= public_key.n {
            return Err(CryptoError::Decryption { op: OP });
        }

        let m = public_op(&c, public_key);
        let padded = to_bytes_padded(&m, key_bytes).ok_or(CryptoError::Decryption { op: OP })?;
        let message = unpad_pkcs1_v15_type1(&padded).map_err(|e| e.into_decryption(OP))?;
        plaintext.extend_from_slice(&message);
    }

    Ok(plaintext)
}

/// Decrypt Base64 ciphertext with a public key
pub fn public_decrypt(
    ciphertext: &str,
    public_key: &KeyMaterial,
    config: &RsaConfig,
) -> Result<Vec<u8>> {
    let key = public_key.to_public_key()?;
    debug!(bits = key.bit_length(), "RSA public decrypt");

    let bytes = decode_ciphertext(ciphertext).map_err(|e| e.into_decryption("public_decrypt"))?;
    public_decrypt_bytes(&bytes, &key, config)
}
