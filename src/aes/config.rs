// AES Cipher Configuration

use std::fmt;
use std::str::FromStr;

use crate::error::{CryptoError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AesMode {
    #[default]
    Cbc,
    /// Leaks repeated plaintext blocks; kept for interoperability
    Ecb,
}

impl AesMode {
    pub fn requires_iv(self) -> bool {
        matches!(self, AesMode::Cbc)
    }
}

impl fmt::Display for AesMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AesMode::Cbc => f.write_str("CBC"),
            AesMode::Ecb => f.write_str("ECB"),
        }
    }
}

impl FromStr for AesMode {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CBC" => Ok(AesMode::Cbc),
            "ECB" => Ok(AesMode::Ecb),
            _ => Err(CryptoError::InvalidConfig {
                op: "parse_aes_mode",
                reason: "AES mode must be CBC or ECB",
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AesPadding {
    #[default]
    Pkcs7,
    /// Same bytes as PKCS#7 at a 16-byte block size
    Pkcs5,
    /// Input must already be block aligned
    NoPadding,
}

impl AesPadding {
    pub(crate) fn is_padded(self) -> bool {
        !matches!(self, AesPadding::NoPadding)
    }
}

impl fmt::Display for AesPadding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AesPadding::Pkcs7 => f.write_str("PKCS7"),
            AesPadding::Pkcs5 => f.write_str("PKCS5"),
            AesPadding::NoPadding => f.write_str("NoPadding"),
        }
    }
}

impl FromStr for AesPadding {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_uppercase().replace(['#', '_', '-'], "");
        match normalized.as_str() {
            "PKCS7" | "PKCS7PADDING" => Ok(AesPadding::Pkcs7),
            "PKCS5" | "PKCS5PADDING" => Ok(AesPadding::Pkcs5),
            "NONE" | "NOPADDING" => Ok(AesPadding::NoPadding),
            _ => Err(CryptoError::InvalidConfig {
                op: "parse_aes_padding",
                reason: "unknown AES padding",
            }),
        }
    }
}

/// AES mode and padding selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AesConfig {
    mode: AesMode,
    padding: AesPadding,
}

impl AesConfig {
    pub fn new(mode: AesMode, padding: AesPadding) -> Self {
        Self { mode, padding }
    }

    /// Build from names such as `("CBC", "PKCS5Padding")`
    pub fn parse(mode: &str, padding: &str) -> Result<Self> {
        Ok(Self::new(mode.parse()?, padding.parse()?))
    }

    /// CBC with PKCS#7
    pub fn cbc() -> Self {
        Self::new(AesMode::Cbc, AesPadding::Pkcs7)
    }

    /// ECB with PKCS#7
    pub fn ecb() -> Self {
        Self::new(AesMode::Ecb, AesPadding::Pkcs7)
    }

    pub fn with_padding(self, padding: AesPadding) -> Self {
        Self { padding, ..self }
    }

    pub fn mode(&self) -> AesMode {
        self.mode
    }

    pub fn padding(&self) -> AesPadding {
        self.padding
    }
}

impl fmt::Display for AesConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AES/{}/{}", self.mode, self.padding)
    }
}
