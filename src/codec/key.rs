// RSA key export formats
// PKCS#1 (traditional) and PKCS#8 / X.509 SubjectPublicKeyInfo (container) encodings

use std::fmt;
use std::str::FromStr;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use der::asn1::{AnyRef, BitStringRef, ObjectIdentifier, UintRef};
use der::{Decode, Encode};
use pkcs8::PrivateKeyInfo;
use spki::{AlgorithmIdentifierRef, SubjectPublicKeyInfoRef};
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use super::strip_armor;
use crate::error::{CryptoError, Result};
use crate::rsa::bigint::{from_bytes, to_bytes, RsaBigInt};
use crate::rsa::keygen::{RsaPrivateKey, RsaPublicKey};

const RSA_ENCRYPTION_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");

/// rsaEncryption with NULL parameters
const RSA_ALGORITHM: AlgorithmIdentifierRef<'static> = AlgorithmIdentifierRef {
    oid: RSA_ENCRYPTION_OID,
    parameters: Some(AnyRef::NULL),
};

/// Export format of RSA key material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyFormat {
    /// Bare `RSAPublicKey` / `RSAPrivateKey` structures
    Pkcs1,
    /// `SubjectPublicKeyInfo` / `PrivateKeyInfo` containers
    Pkcs8,
}

impl fmt::Display for KeyFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyFormat::Pkcs1 => write!(f, "PKCS1"),
            KeyFormat::Pkcs8 => write!(f, "PKCS8"),
        }
    }
}

impl FromStr for KeyFormat {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().replace('#', "").as_str() {
            "PKCS1" => Ok(KeyFormat::Pkcs1),
            "PKCS8" => Ok(KeyFormat::Pkcs8),
            _ => Err(CryptoError::UnsupportedAlgorithm {
                op: "parse_key_format",
                name: s.to_string(),
            }),
        }
    }
}

/// Whether key material holds the public or the private half
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyKind {
    Public,
    Private,
}

/// DER-encoded key bytes tagged with their kind and export format.
///
/// Construction always validates the encoding, so a `KeyMaterial` value
/// is known to parse into a usable key. Bytes are wiped on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct KeyMaterial {
    #[zeroize(skip)]
    kind: KeyKind,
    #[zeroize(skip)]
    format: KeyFormat,
    der: Vec<u8>,
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("kind", &self.kind)
            .field("format", &self.format)
            .field("len", &self.der.len())
            .finish()
    }
}

impl KeyMaterial {
    pub fn from_public_key(key: &RsaPublicKey, format: KeyFormat) -> Result<Self> {
        Ok(Self {
            kind: KeyKind::Public,
            format,
            der: public_key_der(key, format)?,
        })
    }

    pub fn from_private_key(key: &RsaPrivateKey, format: KeyFormat) -> Result<Self> {
        Ok(Self {
            kind: KeyKind::Private,
            format,
            der: private_key_der(key, format)?,
        })
    }

    /// Parse DER bytes, rejecting anything that does not decode to a valid key
    pub fn from_der(der: &[u8], kind: KeyKind, format: KeyFormat) -> Result<Self> {
        let material = Self {
            kind,
            format,
            der: der.to_vec(),
        };
        match kind {
            KeyKind::Public => {
                material.to_public_key()?;
            }
            KeyKind::Private => {
                material.to_private_key()?;
            }
        }
        Ok(material)
    }

    /// Parse the textual (Base64, optionally PEM-armored) form
    pub fn from_text(text: &str, kind: KeyKind, format: KeyFormat) -> Result<Self> {
        let mut der = decode_key_text(text)?;
        let parsed = Self::from_der(&der, kind, format);
        der.zeroize();
        parsed
    }

    /// Parse the textual form, trying PKCS#8 first and then PKCS#1
    pub fn detect(text: &str, kind: KeyKind) -> Result<Self> {
        let mut der = decode_key_text(text)?;
        let parsed = Self::from_der(&der, kind, KeyFormat::Pkcs8)
            .or_else(|_| Self::from_der(&der, kind, KeyFormat::Pkcs1))
            .map_err(|_| CryptoError::InvalidKey {
                op: "detect_key",
                reason: "neither PKCS#8 nor PKCS#1",
            });
        der.zeroize();
        parsed
    }

    pub fn kind(&self) -> KeyKind {
        self.kind
    }

    pub fn format(&self) -> KeyFormat {
        self.format
    }

    pub fn as_der(&self) -> &[u8] {
        &self.der
    }

    /// Base64 of the DER bytes, without armor
    pub fn to_text(&self) -> String {
        STANDARD.encode(&self.der)
    }

    pub fn to_public_key(&self) -> Result<RsaPublicKey> {
        if self.kind != KeyKind::Public {
            return Err(CryptoError::InvalidKey {
                op: "parse_public_key",
                reason: "expected a public key",
            });
        }
        parse_public_key_der(&self.der, self.format)
    }

    pub fn to_private_key(&self) -> Result<RsaPrivateKey> {
        if self.kind != KeyKind::Private {
            return Err(CryptoError::InvalidKey {
                op: "parse_private_key",
                reason: "expected a private key",
            });
        }
        parse_private_key_der(&self.der, self.format)
    }
}

/// Encode a public key to its textual export form
pub fn encode_public_key(key: &RsaPublicKey, format: KeyFormat) -> Result<String> {
    Ok(KeyMaterial::from_public_key(key, format)?.to_text())
}

/// Decode a public key from its textual export form
pub fn decode_public_key(text: &str, format: KeyFormat) -> Result<RsaPublicKey> {
    let der = decode_key_text(text)?;
    parse_public_key_der(&der, format)
}

/// Encode a private key to its textual export form
pub fn encode_private_key(key: &RsaPrivateKey, format: KeyFormat) -> Result<String> {
    Ok(KeyMaterial::from_private_key(key, format)?.to_text())
}

/// Decode a private key from its textual export form
pub fn decode_private_key(text: &str, format: KeyFormat) -> Result<RsaPrivateKey> {
    let mut der = decode_key_text(text)?;
    let key = parse_private_key_der(&der, format);
    der.zeroize();
    key
}

fn decode_key_text(text: &str) -> Result<Vec<u8>> {
    let body = strip_armor(text);
    if body.is_empty() {
        return Err(CryptoError::MalformedEncoding {
            op: "decode_key",
            reason: "empty key text",
        });
    }
    STANDARD
        .decode(body.as_bytes())
        .map_err(|_| CryptoError::MalformedEncoding {
            op: "decode_key",
            reason: "invalid base64",
        })
}

fn encode_error(err: der::Error) -> CryptoError {
    debug!(%err, "DER encoding failed");
    CryptoError::MalformedEncoding {
        op: "encode_key",
        reason: "DER encoding failed",
    }
}

fn decode_error(err: der::Error) -> CryptoError {
    debug!(%err, "DER rejected");
    CryptoError::MalformedEncoding {
        op: "decode_key",
        reason: "invalid DER structure",
    }
}

fn uint(bytes: &[u8]) -> Result<UintRef<'_>> {
    UintRef::new(bytes).map_err(encode_error)
}

fn biguint(value: UintRef<'_>) -> RsaBigInt {
    from_bytes(value.as_bytes())
}

fn pkcs1_public_der(key: &RsaPublicKey) -> Result<Vec<u8>> {
    let n = to_bytes(&key.n);
    let e = to_bytes(&key.e);
    pkcs1::RsaPublicKey {
        modulus: uint(&n)?,
        public_exponent: uint(&e)?,
    }
    .to_der()
    .map_err(encode_error)
}

fn pkcs1_private_der(key: &RsaPrivateKey) -> Result<Zeroizing<Vec<u8>>> {
    let fields = [&key.n, &key.e, &key.d, &key.p, &key.q, &key.d_p, &key.d_q, &key.q_inv]
        .map(|value| Zeroizing::new(to_bytes(value)));
    let [n, e, d, p, q, d_p, d_q, q_inv] = &fields;

    let document = pkcs1::RsaPrivateKey {
        modulus: uint(n)?,
        public_exponent: uint(e)?,
        private_exponent: uint(d)?,
        prime1: uint(p)?,
        prime2: uint(q)?,
        exponent1: uint(d_p)?,
        exponent2: uint(d_q)?,
        coefficient: uint(q_inv)?,
        other_prime_infos: None,
    };
    document.to_der().map(Zeroizing::new).map_err(encode_error)
}

fn public_key_der(key: &RsaPublicKey, format: KeyFormat) -> Result<Vec<u8>> {
    let inner = pkcs1_public_der(key)?;
    match format {
        KeyFormat::Pkcs1 => Ok(inner),
        KeyFormat::Pkcs8 => SubjectPublicKeyInfoRef {
            algorithm: RSA_ALGORITHM,
            subject_public_key: BitStringRef::from_bytes(&inner).map_err(encode_error)?,
        }
        .to_der()
        .map_err(encode_error),
    }
}

fn private_key_der(key: &RsaPrivateKey, format: KeyFormat) -> Result<Vec<u8>> {
    let mut inner = pkcs1_private_der(key)?;
    match format {
        KeyFormat::Pkcs1 => Ok(std::mem::take(&mut *inner)),
        KeyFormat::Pkcs8 => PrivateKeyInfo {
            algorithm: RSA_ALGORITHM,
            private_key: inner.as_slice(),
            public_key: None,
        }
        .to_der()
        .map_err(encode_error),
    }
}

fn check_algorithm(algorithm: &AlgorithmIdentifierRef<'_>) -> Result<()> {
    if algorithm.oid != RSA_ENCRYPTION_OID || algorithm.parameters != Some(AnyRef::NULL) {
        return Err(CryptoError::InvalidKey {
            op: "decode_key",
            reason: "not an rsaEncryption key",
        });
    }
    Ok(())
}

fn parse_pkcs1_public(der: &[u8]) -> Result<RsaPublicKey> {
    let document = pkcs1::RsaPublicKey::from_der(der).map_err(decode_error)?;
    RsaPublicKey::new(biguint(document.modulus), biguint(document.public_exponent))
}

fn parse_pkcs1_private(der: &[u8]) -> Result<RsaPrivateKey> {
    let document = pkcs1::RsaPrivateKey::from_der(der).map_err(decode_error)?;
    if document.other_prime_infos.is_some() {
        return Err(CryptoError::InvalidKey {
            op: "decode_key",
            reason: "multi-prime keys are not supported",
        });
    }
    RsaPrivateKey::from_parts(
        biguint(document.modulus),
        biguint(document.public_exponent),
        biguint(document.private_exponent),
        biguint(document.prime1),
        biguint(document.prime2),
        biguint(document.exponent1),
        biguint(document.exponent2),
        biguint(document.coefficient),
    )
}

fn parse_public_key_der(der: &[u8], format: KeyFormat) -> Result<RsaPublicKey> {
    match format {
        KeyFormat::Pkcs1 => parse_pkcs1_public(der),
        KeyFormat::Pkcs8 => {
            let info = SubjectPublicKeyInfoRef::from_der(der).map_err(decode_error)?;
            check_algorithm(&info.algorithm)?;
            let inner = info
                .subject_public_key
                .as_bytes()
                .ok_or(CryptoError::MalformedEncoding {
                    op: "decode_key",
                    reason: "public key bit string has unused bits",
                })?;
            parse_pkcs1_public(inner)
        }
    }
}

fn parse_private_key_der(der: &[u8], format: KeyFormat) -> Result<RsaPrivateKey> {
    match format {
        KeyFormat::Pkcs1 => parse_pkcs1_private(der),
        KeyFormat::Pkcs8 => {
            let info = PrivateKeyInfo::from_der(der).map_err(decode_error)?;
            check_algorithm(&info.algorithm)?;
            parse_pkcs1_private(info.private_key)
        }
    }
}
