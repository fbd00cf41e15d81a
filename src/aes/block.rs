// AES Block Cipher (FIPS-197)
// 128/192/256-bit keys; S-box computed arithmetically instead of by table lookup

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{CryptoError, Result};

/// AES block size in bytes
pub const AES_BLOCK_SIZE: usize = 16;

/// Round constants for key expansion
const RCON: [u32; 11] = [
    0x00000000, 0x01000000, 0x02000000, 0x04000000, 0x08000000, 0x10000000, 0x20000000,
    0x40000000, 0x80000000, 0x1b000000, 0x36000000,
];

/// Multiply two bytes in GF(2^8) modulo x^8 + x^4 + x^3 + x + 1
#[inline(always)]
fn gf_mul(mut a: u8, mut b: u8) -> u8 {
    let mut product = 0u8;
    for _ in 0..8 {
        product ^= a & (b & 1).wrapping_neg();
        let carry = a >> 7;
        a = (a << 1) ^ (carry * 0x1b);
        b >>= 1;
    }
    product
}

/// x^254, the multiplicative inverse (0 maps to 0)
#[inline(always)]
fn gf_inv(x: u8) -> u8 {
    let x2 = gf_mul(x, x);
    let x4 = gf_mul(x2, x2);
    let x8 = gf_mul(x4, x4);
    let x16 = gf_mul(x8, x8);
    let x32 = gf_mul(x16, x16);
    let x64 = gf_mul(x32, x32);
    let x128 = gf_mul(x64, x64);

    let mut y = gf_mul(x128, x64);
    y = gf_mul(y, x32);
    y = gf_mul(y, x16);
    y = gf_mul(y, x8);
    y = gf_mul(y, x4);
    gf_mul(y, x2)
}

#[inline(always)]
fn sbox(x: u8) -> u8 {
    let i = gf_inv(x);
    i ^ i.rotate_left(1) ^ i.rotate_left(2) ^ i.rotate_left(3) ^ i.rotate_left(4) ^ 0x63
}

#[inline(always)]
fn inv_sbox(x: u8) -> u8 {
    let y = x ^ 0x63;
    gf_inv(y.rotate_left(1) ^ y.rotate_left(3) ^ y.rotate_left(6))
}

#[inline(always)]
fn sub_word(word: u32) -> u32 {
    u32::from_be_bytes(word.to_be_bytes().map(sbox))
}

#[inline(always)]
fn mul2(byte: u8) -> u8 {
    (byte << 1) ^ ((byte >> 7) * 0x1b)
}

#[inline(always)]
fn mul9(byte: u8) -> u8 {
    mul2(mul2(mul2(byte))) ^ byte
}

#[inline(always)]
fn mul11(byte: u8) -> u8 {
    mul2(mul2(mul2(byte))) ^ mul2(byte) ^ byte
}

#[inline(always)]
fn mul13(byte: u8) -> u8 {
    mul2(mul2(mul2(byte))) ^ mul2(mul2(byte)) ^ byte
}

#[inline(always)]
fn mul14(byte: u8) -> u8 {
    mul2(mul2(mul2(byte))) ^ mul2(mul2(byte)) ^ mul2(byte)
}

// State is column-major: byte (row r, column c) lives at index 4c + r

fn sub_bytes(state: &mut [u8; 16]) {
    for byte in state.iter_mut() {
        *byte = sbox(*byte);
    }
}

fn inv_sub_bytes(state: &mut [u8; 16]) {
    for byte in state.iter_mut() {
        *byte = inv_sbox(*byte);
    }
}

/// Row r rotates left by r columns
fn shift_rows(state: &mut [u8; 16]) {
    let t = *state;
    for c in 0..4 {
        for r in 1..4 {
            state[4 * c + r] = t[4 * ((c + r) % 4) + r];
        }
    }
}

fn inv_shift_rows(state: &mut [u8; 16]) {
    let t = *state;
    for c in 0..4 {
        for r in 1..4 {
            state[4 * ((c + r) % 4) + r] = t[4 * c + r];
        }
    }
}

fn mix_columns(state: &mut [u8; 16]) {
    for column in state.chunks_exact_mut(4) {
        let [s0, s1, s2, s3] = [column[0], column[1], column[2], column[3]];
        column[0] = mul2(s0) ^ mul2(s1) ^ s1 ^ s2 ^ s3;
        column[1] = s0 ^ mul2(s1) ^ mul2(s2) ^ s2 ^ s3;
        column[2] = s0 ^ s1 ^ mul2(s2) ^ mul2(s3) ^ s3;
        column[3] = mul2(s0) ^ s0 ^ s1 ^ s2 ^ mul2(s3);
    }
}

fn inv_mix_columns(state: &mut [u8; 16]) {
    for column in state.chunks_exact_mut(4) {
        let [s0, s1, s2, s3] = [column[0], column[1], column[2], column[3]];
        column[0] = mul14(s0) ^ mul11(s1) ^ mul13(s2) ^ mul9(s3);
        column[1] = mul9(s0) ^ mul14(s1) ^ mul11(s2) ^ mul13(s3);
        column[2] = mul13(s0) ^ mul9(s1) ^ mul14(s2) ^ mul11(s3);
        column[3] = mul11(s0) ^ mul13(s1) ^ mul9(s2) ^ mul14(s3);
    }
}

fn add_round_key(state: &mut [u8; 16], round_key: &[u8; 16]) {
    for (s, k) in state.iter_mut().zip(round_key) {
        *s ^= k;
    }
}

/// Expanded AES key. Round keys are wiped on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct AesBlockCipher {
    round_keys: Vec<[u8; 16]>,
}

impl AesBlockCipher {
    /// Expand a 16, 24 or 32 byte key
    pub fn new(key: &[u8]) -> Result<Self> {
        let nk = match key.len() {
            16 | 24 | 32 => key.len() / 4,
            _ => {
                return Err(CryptoError::InvalidKey {
                    op: "aes_key",
                    reason: "AES key must be 16, 24 or 32 bytes",
                })
            }
        };
        let rounds = nk + 6;
        let total_words = 4 * (rounds + 1);

        let mut words = vec![0u32; total_words];
        for (word, chunk) in words.iter_mut().zip(key.chunks_exact(4)) {
            *word = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        for i in nk..total_words {
            let mut temp = words[i - 1];
            if i % nk == 0 {
                temp = sub_word(temp.rotate_left(8)) ^ RCON[i / nk];
            } else if nk > 6 && i % nk == 4 {
                temp = sub_word(temp);
            }
            words[i] = words[i - nk] ^ temp;
        }

        let round_keys = words
            .chunks_exact(4)
            .map(|chunk| {
                let mut round_key = [0u8; 16];
                for (dst, word) in round_key.chunks_exact_mut(4).zip(chunk) {
                    dst.copy_from_slice(&word.to_be_bytes());
                }
                round_key
            })
            .collect();
        words.zeroize();

        Ok(Self { round_keys })
    }

    /// Number of rounds: 10, 12 or 14
    pub fn rounds(&self) -> usize {
        self.round_keys.len() - 1
    }

    /// Key length in bits
    pub fn key_bits(&self) -> usize {
        (self.rounds() - 6) * 32
    }

    pub fn encrypt_block(&self, block: &mut [u8; 16]) {
        let rounds = self.rounds();
        add_round_key(block, &self.round_keys[0]);
        for round_key in &self.round_keys[1..rounds] {
            sub_bytes(block);
            shift_rows(block);
            mix_columns(block);
            add_round_key(block, round_key);
        }
        sub_bytes(block);
        shift_rows(block);
        add_round_key(block, &self.round_keys[rounds]);
    }

    pub fn decrypt_block(&self, block: &mut [u8; 16]) {
        let rounds = self.rounds();
        add_round_key(block, &self.round_keys[rounds]);
        for round_key in self.round_keys[1..rounds].iter().rev() {
            inv_shift_rows(block);
            inv_sub_bytes(block);
            add_round_key(block, round_key);
            inv_mix_columns(block);
        }
        inv_shift_rows(block);
        inv_sub_bytes(block);
        add_round_key(block, &self.round_keys[0]);
    }
}

impl std::fmt::Debug for AesBlockCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AesBlockCipher")
            .field("key_bits", &self.key_bits())
            .finish_non_exhaustive()
    }
}
