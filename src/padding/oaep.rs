// OAEP Padding (PKCS#1 v2.2, section 7.1)
// EM = 0x00 || maskedSeed || maskedDB, DB = lHash || PS || 0x01 || M

use rand::{CryptoRng, RngCore};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

use crate::digest::{digest, mask_generate, DigestAlgorithm};
use crate::error::{CryptoError, Result};

/// Digest pair and label shared by both directions
#[derive(Debug, Clone, Copy)]
pub struct OaepParams<'a> {
    pub digest: DigestAlgorithm,
    pub mask_digest: DigestAlgorithm,
    pub label: &'a [u8],
}

/// Largest message for `block_size`, or `None` if the block cannot hold OAEP at all
pub fn max_message_len(block_size: usize, digest: DigestAlgorithm) -> Option<usize> {
    block_size.checked_sub(2 * digest.output_len() + 2)
}

fn xor_in_place(target: &mut [u8], mask: &[u8]) {
    for (t, m) in target.iter_mut().zip(mask) {
        *t ^= m;
    }
}

pub fn pad_oaep(message: &[u8], block_size: usize, params: &OaepParams<'_>) -> Result<Vec<u8>> {
    pad_oaep_with_rng(message, block_size, params, &mut rand::thread_rng())
}

pub fn pad_oaep_with_rng<R: RngCore + CryptoRng>(
    message: &[u8],
    block_size: usize,
    params: &OaepParams<'_>,
    rng: &mut R,
) -> Result<Vec<u8>> {
    let h_len = params.digest.output_len();
    let max = max_message_len(block_size, params.digest).ok_or(CryptoError::InvalidConfig {
        op: "oaep_pad",
        reason: "modulus too small for the OAEP digest",
    })?;
    if message.len() > max {
        return Err(CryptoError::PlaintextTooLong {
            op: "oaep_pad",
            max,
            actual: message.len(),
        });
    }

    let db_len = block_size - h_len - 1;
    let mut db = Vec::with_capacity(db_len);
    db.extend_from_slice(&digest(params.label, params.digest));
    db.resize(db_len - message.len() - 1, 0x00);
    db.push(0x01);
    db.extend_from_slice(message);

    let mut seed = vec![0u8; h_len];
    rng.fill_bytes(&mut seed);

    let db_mask = mask_generate(&seed, db_len, params.mask_digest)?;
    xor_in_place(&mut db, &db_mask);

    let seed_mask = mask_generate(&db, h_len, params.mask_digest)?;
    xor_in_place(&mut seed, &seed_mask);

    let mut block = Vec::with_capacity(block_size);
    block.push(0x00);
    block.extend_from_slice(&seed);
    block.extend_from_slice(&db);
    Ok(block)
}

/// Remove OAEP padding.
///
/// All checks are folded into a single `Choice` so a failure reveals neither
/// which check failed nor where.
pub fn unpad_oaep(block: &[u8], params: &OaepParams<'_>) -> Result<Vec<u8>> {
    let h_len = params.digest.output_len();
    if block.len() < 2 * h_len + 2 {
        return Err(CryptoError::Padding { op: "oaep_unpad" });
    }

    let (masked_seed, masked_db) = block[1..].split_at(h_len);

    let mut seed = masked_seed.to_vec();
    xor_in_place(&mut seed, &mask_generate(masked_db, h_len, params.mask_digest)?);

    let db_len = masked_db.len();
    let db_mask = mask_generate(&seed, db_len, params.mask_digest)?;
    let mut db = masked_db.to_vec();
    xor_in_place(&mut db, &db_mask);

    let expected_hash = digest(params.label, params.digest);
    let hash_matches = db[..h_len].ct_eq(&expected_hash);
    let first_is_zero = block[0].ct_eq(&0x00);

    // Find the 0x01 that ends PS; anything other than 0x00 before it is invalid
    let mut looking_for_one = Choice::from(1);
    let mut one_index = 0u32;
    let mut invalid = Choice::from(0);
    for (i, byte) in db.iter().enumerate().skip(h_len) {
        let is_one = byte.ct_eq(&0x01);
        let is_zero = byte.ct_eq(&0x00);
        one_index.conditional_assign(&(i as u32), looking_for_one & is_one);
        looking_for_one &= !is_one;
        invalid |= looking_for_one & !is_zero;
    }

    let valid = first_is_zero & hash_matches & !looking_for_one & !invalid;
    if bool::from(valid) {
        Ok(db[one_index as usize + 1..].to_vec())
    } else {
        Err(CryptoError::Padding { op: "oaep_unpad" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::padding::FixedRng;

    const BLOCK: usize = 128; // 1024-bit modulus

    fn sha256_sha1() -> OaepParams<'static> {
        OaepParams {
            digest: DigestAlgorithm::Sha256,
            mask_digest: DigestAlgorithm::Sha1,
            label: b"",
        }
    }

    #[test]
    fn test_roundtrip() {
        let params = sha256_sha1();
        for len in [0, 1, 16, 62] {
            let message = vec![0x5a; len];
            let block = pad_oaep(&message, BLOCK, &params).unwrap();
            assert_eq!(block.len(), BLOCK);
            assert_eq!(block[0], 0x00);
            assert_eq!(unpad_oaep(&block, &params).unwrap(), message);
        }
    }

    #[test]
    fn test_fixed_seed_known_answer() {
        // seed = 00 01 .. 1f, M = "Hello World!", empty label
        let expected = hex::decode(concat!(
            "0024b39da52b0e44f6ace2fee1a887d62d56039fde83882b130ca2cbed141955",
            "df9cec1878240f6388c86f6d3cf7d042e352fda9ffcd1468300a66244af7e504",
            "4e6cc89dbdef59cde6e6b6e6b5e405eb5e6ffb080c390c2cd82363d25a79fcf5",
            "67c36336e9d8ae4b1e3c10455f7ed25bd90330819e0341e25229046a8e77f82b",
        ))
        .unwrap();
        let seed: Vec<u8> = (0u8..32).collect();
        let mut rng = FixedRng::new(&seed);

        let block = pad_oaep_with_rng(b"Hello World!", BLOCK, &sha256_sha1(), &mut rng).unwrap();
        assert_eq!(block, expected);
        assert_eq!(unpad_oaep(&expected, &sha256_sha1()).unwrap(), b"Hello World!");
    }

    #[test]
    fn test_capacity() {
        let params = sha256_sha1();
        // 128 - 2*32 - 2 = 62
        assert_eq!(max_message_len(BLOCK, DigestAlgorithm::Sha256), Some(62));
        let err = pad_oaep(&[0u8; 63], BLOCK, &params).unwrap_err();
        assert_eq!(
            err,
            CryptoError::PlaintextTooLong {
                op: "oaep_pad",
                max: 62,
                actual: 63
            }
        );
    }

    #[test]
    fn test_block_too_small_for_digest() {
        let params = OaepParams {
            digest: DigestAlgorithm::Sha512,
            mask_digest: DigestAlgorithm::Sha512,
            label: b"",
        };
        let err = pad_oaep(b"", 64, &params).unwrap_err();
        assert!(matches!(err, CryptoError::InvalidConfig { .. }));
    }

    #[test]
    fn test_padding_is_randomized() {
        let params = sha256_sha1();
        let a = pad_oaep(b"same", BLOCK, &params).unwrap();
        let b = pad_oaep(b"same", BLOCK, &params).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_label_must_match() {
        let with_label = OaepParams {
            label: b"context",
            ..sha256_sha1()
        };
        let block = pad_oaep(b"msg", BLOCK, &with_label).unwrap();
        assert_eq!(unpad_oaep(&block, &with_label).unwrap(), b"msg");
        assert_eq!(
            unpad_oaep(&block, &sha256_sha1()),
            Err(CryptoError::Padding { op: "oaep_unpad" })
        );
    }

    #[test]
    fn test_tampering_gives_uniform_error() {
        let params = sha256_sha1();
        let block = pad_oaep(b"msg", BLOCK, &params).unwrap();

        for index in [0, 1, 40, BLOCK - 1] {
            let mut tampered = block.clone();
            tampered[index] ^= 0x01;
            assert_eq!(
                unpad_oaep(&tampered, &params),
                Err(CryptoError::Padding { op: "oaep_unpad" }),
                "index {index}"
            );
        }
    }

    #[test]
    fn test_digest_mismatch() {
        let params = sha256_sha1();
        let block = pad_oaep(b"msg", BLOCK, &params).unwrap();
        let other = OaepParams {
            mask_digest: DigestAlgorithm::Sha256,
            ..params
        };
        assert!(unpad_oaep(&block, &other).is_err());
    }
}
