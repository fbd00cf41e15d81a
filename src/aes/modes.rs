// Block Cipher Modes
// ECB and CBC over whole blocks; padding is applied by the caller

use zeroize::Zeroize;

use super::block::{AesBlockCipher, AES_BLOCK_SIZE};
use crate::error::{CryptoError, Result};

fn check_aligned(op: &'static str, data: &[u8]) -> Result<()> {
    if data.len() % AES_BLOCK_SIZE != 0 {
        return Err(CryptoError::InvalidConfig {
            op,
            reason: "input is not a multiple of the block size",
        });
    }
    Ok(())
}

fn to_block(chunk: &[u8]) -> [u8; AES_BLOCK_SIZE] {
    let mut block = [0u8; AES_BLOCK_SIZE];
    block.copy_from_slice(chunk);
    block
}

fn xor_block(block: &mut [u8; AES_BLOCK_SIZE], other: &[u8; AES_BLOCK_SIZE]) {
    for (b, o) in block.iter_mut().zip(other) {
        *b ^= o;
    }
}

/// Electronic codebook: every block is transformed on its own, so equal
/// plaintext blocks give equal ciphertext blocks.
pub fn ecb_encrypt(cipher: &AesBlockCipher, plaintext: &[u8]) -> Result<Vec<u8>> {
    check_aligned("ecb_encrypt", plaintext)?;

    let mut ciphertext = Vec::with_capacity(plaintext.len());
    for chunk in plaintext.chunks_exact(AES_BLOCK_SIZE) {
        let mut block = to_block(chunk);
        cipher.encrypt_block(&mut block);
        ciphertext.extend_from_slice(&block);
    }
    Ok(ciphertext)
}

pub fn ecb_decrypt(cipher: &AesBlockCipher, ciphertext: &[u8]) -> Result<Vec<u8>> {
    check_aligned("ecb_decrypt", ciphertext)?;

    let mut plaintext = Vec::with_capacity(ciphertext.len());
    for chunk in ciphertext.chunks_exact(AES_BLOCK_SIZE) {
        let mut block = to_block(chunk);
        cipher.decrypt_block(&mut block);
        plaintext.extend_from_slice(&block);
        block.zeroize();
    }
    Ok(plaintext)
}

/// Cipher block chaining (NIST SP 800-38A 6.2)
pub fn cbc_encrypt(
    cipher: &AesBlockCipher,
    iv: &[u8; AES_BLOCK_SIZE],
    plaintext: &[u8],
) -> Result<Vec<u8>> {
    check_aligned("cbc_encrypt", plaintext)?;

    let mut ciphertext = Vec::with_capacity(plaintext.len());
    let mut prev_block = *iv;
    for chunk in plaintext.chunks_exact(AES_BLOCK_SIZE) {
        // XOR with previous ciphertext block (or IV for the first block)
        let mut block = to_block(chunk);
        xor_block(&mut block, &prev_block);
        cipher.encrypt_block(&mut block);

        ciphertext.extend_from_slice(&block);
        prev_block = block;
    }
    Ok(ciphertext)
}

pub fn cbc_decrypt(
    cipher: &AesBlockCipher,
    iv: &[u8; AES_BLOCK_SIZE],
    ciphertext: &[u8],
) -> Result<Vec<u8>> {
    check_aligned("cbc_decrypt", ciphertext)?;

    let mut plaintext = Vec::with_capacity(ciphertext.len());
    let mut prev_block = *iv;
    for chunk in ciphertext.chunks_exact(AES_BLOCK_SIZE) {
        let current = to_block(chunk);
        let mut block = current;
        cipher.decrypt_block(&mut block);
        xor_block(&mut block, &prev_block);

        plaintext.extend_from_slice(&block);
        block.zeroize();
        prev_block = current;
    }
    Ok(plaintext)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sp800_38a_cipher() -> AesBlockCipher {
        AesBlockCipher::new(&hex::decode("2b7e151628aed2a6abf7158809cf4f3c").unwrap()).unwrap()
    }

    fn sequential_iv() -> [u8; 16] {
        core::array::from_fn(|i| i as u8)
    }

    #[test]
    fn test_cbc_sp800_38a_vectors() {
        let cipher = sp800_38a_cipher();
        let plaintext = hex::decode(concat!(
            "6bc1bee22e409f96e93d7e117393172a",
            "ae2d8a571e03ac9c9eb76fac45af8e51"
        ))
        .unwrap();
        let expected = hex::decode(concat!(
            "7649abac8119b246cee98e9b12e9197d",
            "5086cb9b507219ee95db113a917678b2"
        ))
        .unwrap();

        let ciphertext = cbc_encrypt(&cipher, &sequential_iv(), &plaintext).unwrap();
        assert_eq!(ciphertext, expected);
        assert_eq!(
            cbc_decrypt(&cipher, &sequential_iv(), &ciphertext).unwrap(),
            plaintext
        );
    }

    #[test]
    fn test_ecb_sp800_38a_vector() {
        let cipher = sp800_38a_cipher();
        let plaintext = hex::decode("6bc1bee22e409f96e93d7e117393172a").unwrap();
        let ciphertext = ecb_encrypt(&cipher, &plaintext).unwrap();
        assert_eq!(hex::encode(&ciphertext), "3ad77bb40d7a3660a89ecaf32466ef97");
        assert_eq!(ecb_decrypt(&cipher, &ciphertext).unwrap(), plaintext);
    }

    #[test]
    fn test_ecb_repeats_equal_blocks() {
        let cipher = sp800_38a_cipher();
        let ciphertext = ecb_encrypt(&cipher, &[0x41; 32]).unwrap();
        assert_eq!(ciphertext[..16], ciphertext[16..]);

        let chained = cbc_encrypt(&cipher, &sequential_iv(), &[0x41; 32]).unwrap();
        assert_ne!(chained[..16], chained[16..]);
    }

    #[test]
    fn test_misaligned_input_rejected() {
        let cipher = sp800_38a_cipher();
        assert!(ecb_encrypt(&cipher, &[0u8; 15]).is_err());
        assert!(ecb_decrypt(&cipher, &[0u8; 17]).is_err());
        assert!(cbc_encrypt(&cipher, &sequential_iv(), &[0u8; 1]).is_err());
        assert!(cbc_decrypt(&cipher, &sequential_iv(), &[0u8; 31]).is_err());
    }

    #[test]
    fn test_empty_input() {
        let cipher = sp800_38a_cipher();
        assert!(ecb_encrypt(&cipher, &[]).unwrap().is_empty());
        assert!(cbc_decrypt(&cipher, &sequential_iv(), &[]).unwrap().is_empty());
    }
}
