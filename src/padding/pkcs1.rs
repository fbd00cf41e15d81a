// PKCS#1 v1.5 Padding
// Block type 2 (public-key encryption) and block type 1 (private-key encryption)

use rand::{CryptoRng, Rng, RngCore};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, ConstantTimeLess};

use crate::error::{CryptoError, Result};

/// 0x00 || BT || PS (at least 8 bytes) || 0x00
pub const PKCS1_OVERHEAD: usize = 11;

const MIN_PS_LEN: usize = 8;

/// Largest message that fits in a block of `block_size` bytes
pub fn max_message_len(block_size: usize) -> usize {
    block_size.saturating_sub(PKCS1_OVERHEAD)
}

fn check_capacity(op: &'static str, message: &[u8], block_size: usize) -> Result<()> {
    if block_size < PKCS1_OVERHEAD || message.len() > block_size - PKCS1_OVERHEAD {
        return Err(CryptoError::PlaintextTooLong {
            op,
            max: max_message_len(block_size),
            actual: message.len(),
        });
    }
    Ok(())
}

/// Encryption padding: `0x00 || 0x02 || PS || 0x00 || M`, PS non-zero random bytes
pub fn pad_pkcs1_v15(message: &[u8], block_size: usize) -> Result<Vec<u8>> {
    pad_pkcs1_v15_with_rng(message, block_size, &mut rand::thread_rng())
}

pub fn pad_pkcs1_v15_with_rng<R: RngCore + CryptoRng>(
    message: &[u8],
    block_size: usize,
    rng: &mut R,
) -> Result<Vec<u8>> {
    check_capacity("pkcs1_pad", message, block_size)?;

    let ps_len = block_size - message.len() - 3;
    let mut block = Vec::with_capacity(block_size);
    block.push(0x00);
    block.push(0x02);
    // Draw each pad byte uniformly from 1..=255
    block.extend((0..ps_len).map(|_| rng.gen_range(1..=255u8)));
    block.push(0x00);
    block.extend_from_slice(message);

    Ok(block)
}

/// Private-key padding: `0x00 || 0x01 || 0xFF.. || 0x00 || M`
pub fn pad_pkcs1_v15_type1(message: &[u8], block_size: usize) -> Result<Vec<u8>> {
    check_capacity("pkcs1_pad", message, block_size)?;

    let ps_len = block_size - message.len() - 3;
    let mut block = Vec::with_capacity(block_size);
    block.push(0x00);
    block.push(0x01);
    block.extend(std::iter::repeat(0xFF).take(ps_len));
    block.push(0x00);
    block.extend_from_slice(message);

    Ok(block)
}

/// Remove type 2 padding.
///
/// Every byte of the block is examined whatever its content; the only
/// data-dependent branch is the final accept/reject.
pub fn unpad_pkcs1_v15(block: &[u8]) -> Result<Vec<u8>> {
    unpad(block, 0x02)
}

/// Remove type 1 padding
pub fn unpad_pkcs1_v15_type1(block: &[u8]) -> Result<Vec<u8>> {
    unpad(block, 0x01)
}

fn unpad(block: &[u8], block_type: u8) -> Result<Vec<u8>> {
    if block.len() < PKCS1_OVERHEAD {
        return Err(CryptoError::Padding { op: "pkcs1_unpad" });
    }

    let first_is_zero = block[0].ct_eq(&0x00);
    let type_matches = block[1].ct_eq(&block_type);

    let mut looking_for_separator = Choice::from(1);
    let mut separator = 0u32;
    let mut ps_invalid = Choice::from(0);

    for (i, byte) in block.iter().enumerate().skip(2) {
        let is_zero = byte.ct_eq(&0x00);
        separator.conditional_assign(&(i as u32), looking_for_separator & is_zero);
        looking_for_separator &= !is_zero;
        if block_type == 0x01 {
            // Type 1 PS bytes must all be 0xFF
            ps_invalid |= looking_for_separator & !byte.ct_eq(&0xFF);
        }
    }

    let ps_long_enough = !separator.ct_lt(&((MIN_PS_LEN + 2) as u32));
    let valid = first_is_zero
        & type_matches
        & !looking_for_separator
        & ps_long_enough
        & !ps_invalid;

    if bool::from(valid) {
        Ok(block[separator as usize + 1..].to_vec())
    } else {
        Err(CryptoError::Padding { op: "pkcs1_unpad" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::padding::FixedRng;

    const BLOCK: usize = 64; // 512-bit modulus

    #[test]
    fn test_pad_pkcs1_v15() {
        let data = b"Hello";

        let padded = pad_pkcs1_v15(data, BLOCK).unwrap();
        assert_eq!(padded.len(), BLOCK);

        // Check structure
        assert_eq!(padded[0], 0x00);
        assert_eq!(padded[1], 0x02);
        assert_eq!(padded[padded.len() - data.len() - 1], 0x00);

        // Check that padding bytes are non-zero
        for &byte in &padded[2..padded.len() - data.len() - 1] {
            assert_ne!(byte, 0x00);
        }
    }

    #[test]
    fn test_pad_with_rng_is_reproducible() {
        let pattern = [0x9e, 0x37, 0x79, 0xb9];
        let a = pad_pkcs1_v15_with_rng(b"Hello", BLOCK, &mut FixedRng::new(&pattern)).unwrap();
        let b = pad_pkcs1_v15_with_rng(b"Hello", BLOCK, &mut FixedRng::new(&pattern)).unwrap();
        assert_eq!(a, b);
        assert_eq!(unpad_pkcs1_v15(&a).unwrap(), b"Hello");
    }

    #[test]
    fn test_all_zero_rng_still_gives_nonzero_ps() {
        let padded = pad_pkcs1_v15_with_rng(b"Hello", BLOCK, &mut FixedRng::new(&[0])).unwrap();
        assert_eq!(padded[0], 0x00);
        assert_eq!(padded[1], 0x02);
        let ps = &padded[2..BLOCK - 6];
        assert_eq!(ps.len(), BLOCK - 8);
        assert!(ps.iter().all(|&byte| byte != 0x00));
        assert_eq!(padded[BLOCK - 6], 0x00);
        assert_eq!(unpad_pkcs1_v15(&padded).unwrap(), b"Hello");
    }

    #[test]
    fn test_pad_max_size() {
        // Maximum data size for 512-bit key: 64 - 11 = 53 bytes
        let data = vec![0u8; 53];

        let padded = pad_pkcs1_v15(&data, BLOCK).unwrap();
        assert_eq!(padded.len(), BLOCK);
        assert_eq!(unpad_pkcs1_v15(&padded).unwrap(), data);
    }

    #[test]
    fn test_pad_too_large() {
        // 54 bytes is too large for 512-bit key
        let data = vec![0u8; 54];

        let err = pad_pkcs1_v15(&data, BLOCK).unwrap_err();
        assert_eq!(
            err,
            CryptoError::PlaintextTooLong {
                op: "pkcs1_pad",
                max: 53,
                actual: 54
            }
        );
    }

    #[test]
    fn test_roundtrip() {
        let test_data: [&[u8]; 6] = [
            b"",
            b"A",
            b"AB",
            b"Hello",
            b"Hello, World!",
            b"Longer test data with more content",
        ];

        for data in test_data {
            let padded = pad_pkcs1_v15(data, BLOCK).unwrap();
            let unpadded = unpad_pkcs1_v15(&padded).unwrap();
            assert_eq!(data, unpadded.as_slice());
        }
    }

    #[test]
    fn test_type1_roundtrip() {
        let padded = pad_pkcs1_v15_type1(b"sig", BLOCK).unwrap();
        assert_eq!(&padded[..2], &[0x00, 0x01]);
        assert!(padded[2..BLOCK - 4].iter().all(|&b| b == 0xFF));
        assert_eq!(unpad_pkcs1_v15_type1(&padded).unwrap(), b"sig");

        // Block types are not interchangeable
        assert!(unpad_pkcs1_v15(&padded).is_err());
    }

    #[test]
    fn test_invalid_padding() {
        let mut padded = pad_pkcs1_v15(b"data", BLOCK).unwrap();
        padded[1] = 0x03; // Wrong 2nd byte

        let result = unpad_pkcs1_v15(&padded);
        assert_eq!(result, Err(CryptoError::Padding { op: "pkcs1_unpad" }));
    }

    #[test]
    fn test_invalid_separator() {
        let block = vec![0x00, 0x02, 0xFF, 0xFF, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];

        assert!(unpad_pkcs1_v15(&block).is_err());
    }

    #[test]
    fn test_short_padding_string() {
        // Separator after only 7 pad bytes
        let mut block = vec![0x00, 0x02];
        block.extend_from_slice(&[0xAA; 7]);
        block.push(0x00);
        block.extend_from_slice(b"message");

        assert!(unpad_pkcs1_v15(&block).is_err());
    }

    #[test]
    fn test_type1_rejects_non_ff_pad() {
        let mut padded = pad_pkcs1_v15_type1(b"sig", BLOCK).unwrap();
        padded[5] = 0xFE;
        assert!(unpad_pkcs1_v15_type1(&padded).is_err());
    }
}
