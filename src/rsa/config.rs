// RSA Cipher Configuration
// Mode, padding and digest selection, validated once at construction

use std::fmt;
use std::str::FromStr;

use crate::digest::DigestAlgorithm;
use crate::error::{CryptoError, Result};
use crate::padding::{oaep, pkcs1, OaepParams};

/// RSA has no chaining; the single mode exists to mirror the AES API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RsaMode {
    #[default]
    Ecb,
}

impl fmt::Display for RsaMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ECB")
    }
}

impl FromStr for RsaMode {
    type Err = CryptoError;

    /// `NONE` is accepted as another name for the same single-block operation
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ECB" | "NONE" => Ok(RsaMode::Ecb),
            _ => Err(CryptoError::InvalidConfig {
                op: "parse_rsa_mode",
                reason: "RSA supports only ECB mode",
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RsaPadding {
    #[default]
    Pkcs1,
    Oaep,
}

impl fmt::Display for RsaPadding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RsaPadding::Pkcs1 => f.write_str("PKCS1"),
            RsaPadding::Oaep => f.write_str("OAEP"),
        }
    }
}

impl FromStr for RsaPadding {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_uppercase().replace(['#', '_', '-'], "");
        match normalized.trim_end_matches("PADDING") {
            "PKCS1" | "PKCS1V15" | "PKCS1V1.5" => Ok(RsaPadding::Pkcs1),
            "OAEP" => Ok(RsaPadding::Oaep),
            _ => Err(CryptoError::InvalidConfig {
                op: "parse_rsa_padding",
                reason: "unknown RSA padding",
            }),
        }
    }
}

/// Validated RSA cipher configuration.
///
/// Digests are present exactly when the padding is OAEP, so once built a
/// config never carries a stray or missing digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaConfig {
    mode: RsaMode,
    padding: RsaPadding,
    digest: Option<DigestAlgorithm>,
    mask_digest: Option<DigestAlgorithm>,
    label: Vec<u8>,
    segmented: bool,
}

impl RsaConfig {
    pub fn new(
        mode: RsaMode,
        padding: RsaPadding,
        digest: Option<DigestAlgorithm>,
        mask_digest: Option<DigestAlgorithm>,
    ) -> Result<Self> {
        match (padding, digest, mask_digest) {
            (RsaPadding::Pkcs1, None, None) | (RsaPadding::Oaep, Some(_), Some(_)) => Ok(Self {
                mode,
                padding,
                digest,
                mask_digest,
                label: Vec::new(),
                segmented: false,
            }),
            (RsaPadding::Pkcs1, _, _) => Err(CryptoError::InvalidConfig {
                op: "rsa_config",
                reason: "PKCS1 padding takes no digest",
            }),
            (RsaPadding::Oaep, _, _) => Err(CryptoError::InvalidConfig {
                op: "rsa_config",
                reason: "OAEP requires both a digest and a mask digest",
            }),
        }
    }

    /// Build from textual names, e.g. `("ECB", "OAEP", Some("SHA-256"), Some("SHA-1"))`
    pub fn parse(
        mode: &str,
        padding: &str,
        digest: Option<&str>,
        mask_digest: Option<&str>,
    ) -> Result<Self> {
        let digest = digest.map(DigestAlgorithm::from_str).transpose()?;
        let mask_digest = mask_digest.map(DigestAlgorithm::from_str).transpose()?;
        Self::new(mode.parse()?, padding.parse()?, digest, mask_digest)
    }

    /// PKCS#1 v1.5 padding
    pub fn pkcs1() -> Self {
        Self {
            mode: RsaMode::Ecb,
            padding: RsaPadding::Pkcs1,
            digest: None,
            mask_digest: None,
            label: Vec::new(),
            segmented: false,
        }
    }

    /// OAEP with the given label digest and MGF1 digest
    pub fn oaep(digest: DigestAlgorithm, mask_digest: DigestAlgorithm) -> Self {
        Self {
            mode: RsaMode::Ecb,
            padding: RsaPadding::Oaep,
            digest: Some(digest),
            mask_digest: Some(mask_digest),
            label: Vec::new(),
            segmented: false,
        }
    }

    /// Set the OAEP label; rejected for PKCS1
    pub fn with_label(mut self, label: impl Into<Vec<u8>>) -> Result<Self> {
        if self.padding != RsaPadding::Oaep {
            return Err(CryptoError::InvalidConfig {
                op: "rsa_config",
                reason: "a label is only meaningful with OAEP",
            });
        }
        self.label = label.into();
        Ok(self)
    }

    /// Split long input into independently encrypted blocks
    pub fn with_segmentation(mut self, segmented: bool) -> Self {
        self.segmented = segmented;
        self
    }

    pub fn mode(&self) -> RsaMode {
        self.mode
    }

    pub fn padding(&self) -> RsaPadding {
        self.padding
    }

    pub fn digest(&self) -> Option<DigestAlgorithm> {
        self.digest
    }

    pub fn mask_digest(&self) -> Option<DigestAlgorithm> {
        self.mask_digest
    }

    pub fn label(&self) -> &[u8] {
        &self.label
    }

    pub fn is_segmented(&self) -> bool {
        self.segmented
    }

    /// Largest plaintext one block of `block_size` bytes can carry
    pub fn capacity(&self, block_size: usize) -> Result<usize> {
        let capacity = match self.oaep_params() {
            Some(params) => oaep::max_message_len(block_size, params.digest),
            None => block_size.checked_sub(pkcs1::PKCS1_OVERHEAD),
        };
        capacity.ok_or(CryptoError::InvalidConfig {
            op: "rsa_config",
            reason: "modulus too small for the selected padding",
        })
    }

    pub(crate) fn oaep_params(&self) -> Option<OaepParams<'_>> {
        match (self.digest, self.mask_digest) {
            (Some(digest), Some(mask_digest)) => Some(OaepParams {
                digest,
                mask_digest,
                label: &self.label,
            }),
            _ => None,
        }
    }
}

impl Default for RsaConfig {
    fn default() -> Self {
        Self::pkcs1()
    }
}
