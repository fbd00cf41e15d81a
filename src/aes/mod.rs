// AES Module - Main module file
// Symmetric encryption in ECB or CBC mode with PKCS#7 padding

pub mod block;
pub mod config;
pub mod modes;

use std::fmt;

use tracing::{debug, warn};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::codec::{decode_ciphertext, decode_hex, encode_ciphertext};
use crate::error::{CryptoError, Result};
use crate::padding::{pad_pkcs7, unpad_pkcs7};

pub use block::{AesBlockCipher, AES_BLOCK_SIZE};
pub use config::{AesConfig, AesMode, AesPadding};

/// AES key of 16, 24 or 32 bytes, wiped on drop
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct AesKey {
    bytes: Vec<u8>,
}

impl AesKey {
    pub fn new(bytes: &[u8]) -> Result<Self> {
        match bytes.len() {
            16 | 24 | 32 => Ok(Self {
                bytes: bytes.to_vec(),
            }),
            _ => Err(CryptoError::InvalidKey {
                op: "aes_key",
                reason: "AES key must be 16, 24 or 32 bytes",
            }),
        }
    }

    /// Parse a key given as hex text
    pub fn from_hex(text: &str) -> Result<Self> {
        let mut bytes = decode_hex(text)?;
        let key = Self::new(&bytes);
        bytes.zeroize();
        key
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Key length in bits
    pub fn bits(&self) -> usize {
        self.bytes.len() * 8
    }
}

impl AsRef<[u8]> for AesKey {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for AesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AesKey")
            .field("bits", &self.bits())
            .finish_non_exhaustive()
    }
}

/// CBC needs a block-sized IV; ECB ignores whatever it is given
fn resolve_iv(op: &'static str, mode: AesMode, iv: Option<&[u8]>) -> Result<Option<[u8; 16]>> {
    if !mode.requires_iv() {
        if iv.is_some() {
            debug!(%mode, "IV ignored");
        }
        return Ok(None);
    }
    let iv = iv.ok_or(CryptoError::InvalidConfig {
        op,
        reason: "CBC mode requires an IV",
    })?;
    let iv: [u8; AES_BLOCK_SIZE] = iv.try_into().map_err(|_| CryptoError::InvalidConfig {
        op,
        reason: "IV must be 16 bytes",
    })?;
    Ok(Some(iv))
}

/// Encrypt bytes; returns raw ciphertext
///
/// `key` is anything that views as key bytes, such as an [`AesKey`] or a byte slice.
pub fn encrypt_bytes(
    plaintext: &[u8],
    config: &AesConfig,
    key: impl AsRef<[u8]>,
    iv: Option<&[u8]>,
) -> Result<Vec<u8>> {
    const OP: &str = "aes_encrypt";

    let cipher = AesBlockCipher::new(key.as_ref())?;
    let iv = resolve_iv(OP, config.mode(), iv)?;

    let mut padded = if config.padding().is_padded() {
        pad_pkcs7(plaintext, AES_BLOCK_SIZE)?
    } else if plaintext.len() % AES_BLOCK_SIZE == 0 {
        plaintext.to_vec()
    } else {
        return Err(CryptoError::Padding { op: OP });
    };

    let blocks = padded.len() / AES_BLOCK_SIZE;
    debug!(key_bits = cipher.key_bits(), %config, blocks, "AES encrypt");
    if config.mode() == AesMode::Ecb && blocks > 1 {
        warn!(blocks, "ECB mode reveals repeated plaintext blocks");
    }

    let ciphertext = match iv {
        Some(iv) => modes::cbc_encrypt(&cipher, &iv, &padded),
        None => modes::ecb_encrypt(&cipher, &padded),
    };
    padded.zeroize();
    ciphertext
}

/// Decrypt raw ciphertext bytes
///
/// Ciphertext that is not a whole number of blocks fails with
/// [`CryptoError::Decryption`]; bad PKCS#7 bytes fail with [`CryptoError::Padding`].
pub fn decrypt_bytes(
    ciphertext: &[u8],
    config: &AesConfig,
    key: impl AsRef<[u8]>,
    iv: Option<&[u8]>,
) -> Result<Vec<u8>> {
    const OP: &str = "aes_decrypt";

    let cipher = AesBlockCipher::new(key.as_ref())?;
    let iv = resolve_iv(OP, config.mode(), iv)?;

    let padded = config.padding().is_padded();
    if ciphertext.len() % AES_BLOCK_SIZE != 0 || (padded && ciphertext.is_empty()) {
        return Err(CryptoError::Decryption { op: OP });
    }
    debug!(
        key_bits = cipher.key_bits(),
        %config,
        len = ciphertext.len(),
        "AES decrypt"
    );

    let mut decrypted = match iv {
        Some(iv) => modes::cbc_decrypt(&cipher, &iv, ciphertext)?,
        None => modes::ecb_decrypt(&cipher, ciphertext)?,
    };
    if !padded {
        return Ok(decrypted);
    }

    let plaintext =
        unpad_pkcs7(&decrypted, AES_BLOCK_SIZE).map_err(|_| CryptoError::Padding { op: OP });
    decrypted.zeroize();
    plaintext
}

/// Encrypt and return Base64 ciphertext
pub fn encrypt(
    plaintext: &[u8],
    config: &AesConfig,
    key: impl AsRef<[u8]>,
    iv: Option<&[u8]>,
) -> Result<String> {
    let ciphertext = encrypt_bytes(plaintext, config, key, iv)?;
    Ok(encode_ciphertext(&ciphertext))
}

/// Decrypt Base64 ciphertext
pub fn decrypt(
    ciphertext: &str,
    config: &AesConfig,
    key: impl AsRef<[u8]>,
    iv: Option<&[u8]>,
) -> Result<Vec<u8>> {
    let bytes = decode_ciphertext(ciphertext)?;
    decrypt_bytes(&bytes, config, key, iv)
}

/// Encrypt a UTF-8 string
pub fn encrypt_str(
    plaintext: &str,
    config: &AesConfig,
    key: impl AsRef<[u8]>,
    iv: Option<&[u8]>,
) -> Result<String> {
    encrypt(plaintext.as_bytes(), config, key, iv)
}

/// Decrypt to a UTF-8 string
pub fn decrypt_to_string(
    ciphertext: &str,
    config: &AesConfig,
    key: impl AsRef<[u8]>,
    iv: Option<&[u8]>,
) -> Result<String> {
    let plaintext = decrypt(ciphertext, config, key, iv)?;
    String::from_utf8(plaintext).map_err(|e| {
        e.into_bytes().zeroize();
        CryptoError::Decryption { op: "aes_decrypt" }
    })
}
