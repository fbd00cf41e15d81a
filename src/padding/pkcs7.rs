// PKCS#7 Padding
// Appends n bytes of value n; a full block is added when the input is already aligned

use subtle::{Choice, ConstantTimeEq, ConstantTimeGreater, ConstantTimeLess};

use crate::error::{CryptoError, Result};

fn check_block_size(op: &'static str, block_size: usize) -> Result<()> {
    if block_size == 0 || block_size > 255 {
        return Err(CryptoError::InvalidConfig {
            op,
            reason: "PKCS#7 block size must be between 1 and 255",
        });
    }
    Ok(())
}

pub fn pad_pkcs7(data: &[u8], block_size: usize) -> Result<Vec<u8>> {
    check_block_size("pkcs7_pad", block_size)?;

    let n = block_size - data.len() % block_size;
    let mut padded = Vec::with_capacity(data.len() + n);
    padded.extend_from_slice(data);
    padded.resize(data.len() + n, n as u8);
    Ok(padded)
}

/// Validate and strip PKCS#7 padding.
///
/// The last `block_size` bytes are always scanned in full.
pub fn unpad_pkcs7(data: &[u8], block_size: usize) -> Result<Vec<u8>> {
    check_block_size("pkcs7_unpad", block_size)?;
    if data.is_empty() || data.len() % block_size != 0 {
        return Err(CryptoError::Padding { op: "pkcs7_unpad" });
    }

    let n = data[data.len() - 1];
    let in_range = n.ct_gt(&0) & !n.ct_gt(&(block_size as u8));

    let mut mismatch = Choice::from(0);
    for (i, byte) in data.iter().rev().take(block_size).enumerate() {
        let in_pad = (i as u8).ct_lt(&n);
        mismatch |= in_pad & !byte.ct_eq(&n);
    }

    if bool::from(in_range & !mismatch) {
        Ok(data[..data.len() - n as usize].to_vec())
    } else {
        Err(CryptoError::Padding { op: "pkcs7_unpad" })
    }
}
