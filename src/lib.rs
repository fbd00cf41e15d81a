// RSA / AES encryption library
// Key generation, public/private-key encryption and symmetric block encryption

//! RSA and AES primitives with explicit, per-call configuration.
//!
//! Every operation takes its mode, padding and (for OAEP) digests as a
//! validated config value; there is no global state. Ciphertext crosses the
//! API boundary as standard Base64, keys as Base64 DER in PKCS#1 or PKCS#8
//! form.
//!
//! ```no_run
//! use rsa_aes_core::{aes, generate_keypair, rsa, AesConfig, AesKey, KeyFormat, RsaConfig};
//!
//! # fn main() -> rsa_aes_core::Result<()> {
//! let pair = generate_keypair(KeyFormat::Pkcs8, 2048)?;
//! let config = RsaConfig::pkcs1();
//! let ciphertext = rsa::public_encrypt_str("Hello World!", pair.public_key(), &config)?;
//! let plaintext = rsa::private_decrypt_to_string(&ciphertext, pair.private_key(), &config)?;
//! assert_eq!(plaintext, "Hello World!");
//!
//! let key = AesKey::new(b"1234567812345678")?;
//! let iv: &[u8] = b"8765432187654321";
//! let sealed = aes::encrypt_str("Hello World!", &AesConfig::cbc(), &key, Some(iv))?;
//! assert_eq!(aes::decrypt_to_string(&sealed, &AesConfig::cbc(), &key, Some(iv))?, "Hello World!");
//! # Ok(())
//! # }
//! ```

pub mod aes;
pub mod codec;
pub mod digest;
pub mod error;
pub mod padding;
pub mod rsa;

pub use aes::{AesConfig, AesKey, AesMode, AesPadding, AES_BLOCK_SIZE};
pub use codec::{
    decode_ciphertext, decode_private_key, decode_public_key, encode_ciphertext,
    encode_private_key, encode_public_key, KeyFormat, KeyKind, KeyMaterial,
};
pub use digest::{digest, mask_generate, md5_hex, DigestAlgorithm};
pub use error::{CryptoError, Result};
pub use rsa::{
    generate_keypair, generate_keypair_with_exponent, KeyPair, RsaConfig, RsaMode, RsaPadding,
    RsaPrivateKey, RsaPublicKey, DEFAULT_MODULUS_BITS, DEFAULT_PUBLIC_EXPONENT, MAX_MODULUS_BITS,
    MIN_MODULUS_BITS,
};
