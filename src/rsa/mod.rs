// RSA Module - Main module file
// Exports all RSA-related functionality

pub mod bigint;
pub mod config;
pub mod decrypt;
pub mod encrypt;
pub mod keygen;

pub use config::{RsaConfig, RsaMode, RsaPadding};
pub use decrypt::{
    decrypt_bytes, private_decrypt, private_decrypt_to_string, public_decrypt,
    public_decrypt_bytes,
};
pub use encrypt::{
    encrypt_bytes, private_encrypt, private_encrypt_bytes, public_encrypt, public_encrypt_str,
};
pub use keygen::{
    generate_default_keypair, generate_keypair, generate_keypair_with_exponent,
    generate_rsa_keys, KeyPair, RsaPrivateKey, RsaPublicKey, DEFAULT_MODULUS_BITS,
    DEFAULT_PUBLIC_EXPONENT, MAX_MODULUS_BITS, MIN_MODULUS_BITS,
};
