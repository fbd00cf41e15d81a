// Digest/Mask Module
// Hash primitives used by OAEP, and the MGF1 mask generation function

use std::fmt;
use std::str::FromStr;

use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha384, Sha512};

use crate::codec::encode_hex;
use crate::error::{CryptoError, Result};

/// Hash functions usable as the OAEP digest or the MGF1 digest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DigestAlgorithm {
    Sha1,
    Sha256,
    Sha384,
    Sha512,
}

impl DigestAlgorithm {
    /// Output length in bytes
    pub fn output_len(self) -> usize {
        match self {
            DigestAlgorithm::Sha1 => 20,
            DigestAlgorithm::Sha256 => 32,
            DigestAlgorithm::Sha384 => 48,
            DigestAlgorithm::Sha512 => 64,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DigestAlgorithm::Sha1 => "SHA-1",
            DigestAlgorithm::Sha256 => "SHA-256",
            DigestAlgorithm::Sha384 => "SHA-384",
            DigestAlgorithm::Sha512 => "SHA-512",
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DigestAlgorithm {
    type Err = CryptoError;

    /// Accepts `SHA-256`, `sha256`, `SHA_256` and so on. `MGF1` names the
    /// SHA-1 based mask function in JCE-style transformation strings.
    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_uppercase();
        match normalized.as_str() {
            "SHA1" | "MGF1" => Ok(DigestAlgorithm::Sha1),
            "SHA256" => Ok(DigestAlgorithm::Sha256),
            "SHA384" => Ok(DigestAlgorithm::Sha384),
            "SHA512" => Ok(DigestAlgorithm::Sha512),
            _ => Err(CryptoError::UnsupportedAlgorithm {
                op: "parse_digest",
                name: s.to_string(),
            }),
        }
    }
}

fn hash_parts<D: Digest>(parts: &[&[u8]]) -> Vec<u8> {
    let mut hasher = D::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().to_vec()
}

fn digest_parts(parts: &[&[u8]], algorithm: DigestAlgorithm) -> Vec<u8> {
    match algorithm {
        DigestAlgorithm::Sha1 => hash_parts::<Sha1>(parts),
        DigestAlgorithm::Sha256 => hash_parts::<Sha256>(parts),
        DigestAlgorithm::Sha384 => hash_parts::<Sha384>(parts),
        DigestAlgorithm::Sha512 => hash_parts::<Sha512>(parts),
    }
}

/// Hash `data` with `algorithm`
pub fn digest(data: &[u8], algorithm: DigestAlgorithm) -> Vec<u8> {
    digest_parts(&[data], algorithm)
}

/// MGF1 from PKCS#1: expand `seed` into `length` mask bytes.
///
/// `T = Hash(seed || C0) || Hash(seed || C1) || ...` with 32-bit big-endian counters.
pub fn mask_generate(seed: &[u8], length: usize, algorithm: DigestAlgorithm) -> Result<Vec<u8>> {
    let h_len = algorithm.output_len();
    let blocks = length.div_ceil(h_len);
    if blocks as u64 > u32::MAX as u64 + 1 {
        return Err(CryptoError::InvalidConfig {
            op: "mask_generate",
            reason: "mask too long",
        });
    }

    let mut mask = Vec::with_capacity(blocks * h_len);
    for counter in 0..blocks {
        let counter = (counter as u32).to_be_bytes();
        mask.extend_from_slice(&digest_parts(&[seed, &counter[..]], algorithm));
    }
    mask.truncate(length);
    Ok(mask)
}

/// Lowercase hex MD5, for checksums only
pub fn md5_hex(data: &[u8]) -> String {
    encode_hex(&Md5::digest(data))
}
