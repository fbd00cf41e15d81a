// RSA Key Generation
// Implements RSA key pair generation (public and private keys)

use std::fmt;

use num_integer::Integer;
use num_traits::{One, Zero};
use tracing::{debug, trace};

use super::bigint::{from_u64, gcd, lcm, mod_inverse, random_prime, RsaBigInt};
use crate::codec::key::{KeyFormat, KeyMaterial};
use crate::error::{CryptoError, Result};

/// Default modulus size in bits
pub const DEFAULT_MODULUS_BITS: u32 = 2048;

/// Smallest modulus accepted for generation or import
pub const MIN_MODULUS_BITS: u32 = 512;

/// Largest modulus supported
pub const MAX_MODULUS_BITS: u32 = 16384;

/// Default public exponent (F4)
pub const DEFAULT_PUBLIC_EXPONENT: u64 = 65537;

/// Upper bound on prime pairs tried before giving up
const MAX_PAIR_ATTEMPTS: u32 = 64;

/// RSA Public Key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPublicKey {
    pub n: RsaBigInt, // Modulus
    pub e: RsaBigInt, // Public exponent
}

/// RSA Private Key
#[derive(Clone, PartialEq, Eq)]
pub struct RsaPrivateKey {
    pub n: RsaBigInt, // Modulus (same as public)
    pub e: RsaBigInt, // Public exponent, kept for export and blinding
    pub d: RsaBigInt, // Private exponent
    pub p: RsaBigInt, // First prime factor
    pub q: RsaBigInt, // Second prime factor
    // Pre-computed values for faster decryption
    pub d_p: RsaBigInt,   // d mod (p-1)
    pub d_q: RsaBigInt,   // d mod (q-1)
    pub q_inv: RsaBigInt, // q^(-1) mod p
}

impl fmt::Debug for RsaPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaPrivateKey")
            .field("bits", &self.n.bits())
            .finish_non_exhaustive()
    }
}

fn invalid_key(reason: &'static str) -> CryptoError {
    CryptoError::InvalidKey {
        op: "import_key",
        reason,
    }
}

fn check_modulus(n: &RsaBigInt) -> Result<()> {
    if n.is_zero() || n.is_even() {
        return Err(invalid_key("modulus must be odd and non-zero"));
    }
    if n.bits() < MIN_MODULUS_BITS as u64 {
        return Err(invalid_key("modulus below minimum size"));
    }
    if n.bits() > MAX_MODULUS_BITS as u64 {
        return Err(invalid_key("modulus above maximum size"));
    }
    Ok(())
}

fn check_exponent(e: &RsaBigInt, n: &RsaBigInt) -> Result<()> {
    if e < &from_u64(3) || e.is_even() || e >= n {
        return Err(invalid_key("public exponent out of range"));
    }
    Ok(())
}

impl RsaPublicKey {
    /// Build a public key, checking modulus size and exponent range
    pub fn new(n: RsaBigInt, e: RsaBigInt) -> Result<Self> {
        check_modulus(&n)?;
        check_exponent(&e, &n)?;
        Ok(Self { n, e })
    }

    /// Get the bit length of the modulus
    pub fn bit_length(&self) -> u64 {
        self.n.bits()
    }

    /// Modulus length in bytes, i.e. the RSA block size
    pub fn size(&self) -> usize {
        ((self.bit_length() + 7) / 8) as usize
    }
}

impl RsaPrivateKey {
    /// Build a private key from the primes and exponents, deriving the CRT values
    pub fn from_components(p: RsaBigInt, q: RsaBigInt, e: RsaBigInt, d: RsaBigInt) -> Result<Self> {
        // Ensure p > q (for q_inv calculation)
        let (p, q) = if p < q { (q, p) } else { (p, q) };
        if q <= RsaBigInt::one() {
            return Err(invalid_key("prime factor too small"));
        }
        let n = &p * &q;
        check_modulus(&n)?;
        check_exponent(&e, &n)?;

        let d_p = &d % (&p - 1u8);
        let d_q = &d % (&q - 1u8);
        let q_inv = mod_inverse(&q, &p).ok_or_else(|| invalid_key("prime factors not coprime"))?;

        Ok(Self {
            n,
            e,
            d,
            p,
            q,
            d_p,
            d_q,
            q_inv,
        })
    }

    /// Build a private key from every PKCS#1 field, checking that they agree
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        n: RsaBigInt,
        e: RsaBigInt,
        d: RsaBigInt,
        p: RsaBigInt,
        q: RsaBigInt,
        d_p: RsaBigInt,
        d_q: RsaBigInt,
        q_inv: RsaBigInt,
    ) -> Result<Self> {
        check_modulus(&n)?;
        check_exponent(&e, &n)?;
        if p <= RsaBigInt::one() || q <= RsaBigInt::one() || &p * &q != n {
            return Err(invalid_key("prime factors do not match modulus"));
        }
        if d.is_zero() || d >= n || d_p >= p || d_q >= q || q_inv >= p {
            return Err(invalid_key("private exponent out of range"));
        }
        if (&q * &q_inv % &p) != RsaBigInt::one() {
            return Err(invalid_key("inconsistent CRT coefficient"));
        }

        Ok(Self {
            n,
            e,
            d,
            p,
            q,
            d_p,
            d_q,
            q_inv,
        })
    }

    /// Public half of this key
    pub fn to_public_key(&self) -> RsaPublicKey {
        RsaPublicKey {
            n: self.n.clone(),
            e: self.e.clone(),
        }
    }

    /// Get the bit length of the modulus
    pub fn bit_length(&self) -> u64 {
        self.n.bits()
    }

    /// Modulus length in bytes
    pub fn size(&self) -> usize {
        ((self.bit_length() + 7) / 8) as usize
    }
}

/// Generated key pair, exported in the format chosen at generation time
#[derive(Debug, Clone)]
pub struct KeyPair {
    public_key: KeyMaterial,
    private_key: KeyMaterial,
    modulus_bits: u32,
}

impl KeyPair {
    pub fn public_key(&self) -> &KeyMaterial {
        &self.public_key
    }

    pub fn private_key(&self) -> &KeyMaterial {
        &self.private_key
    }

    /// Base64 text of the public key
    pub fn public_key_text(&self) -> String {
        self.public_key.to_text()
    }

    /// Base64 text of the private key
    pub fn private_key_text(&self) -> String {
        self.private_key.to_text()
    }

    pub fn format(&self) -> KeyFormat {
        self.public_key.format()
    }

    /// Get the bit length of the key
    pub fn modulus_bits(&self) -> u32 {
        self.modulus_bits
    }

    /// Split into (public, private)
    pub fn into_parts(self) -> (KeyMaterial, KeyMaterial) {
        (self.public_key, self.private_key)
    }
}

fn keygen_error(reason: &'static str) -> CryptoError {
    CryptoError::KeyGeneration {
        op: "generate_keypair",
        reason,
    }
}

/// Generate typed RSA keys with the given modulus size and public exponent
///
/// The modulus has exactly `bit_length` bits; odd sizes are allowed.
pub fn generate_rsa_keys(bit_length: u32, e: u64) -> Result<(RsaPublicKey, RsaPrivateKey)> {
    if bit_length < MIN_MODULUS_BITS {
        return Err(keygen_error("modulus below 512-bit minimum"));
    }
    if bit_length > MAX_MODULUS_BITS {
        return Err(keygen_error("modulus size not supported"));
    }
    if e < 3 || e % 2 == 0 {
        return Err(keygen_error("public exponent must be odd and at least 3"));
    }

    let e = from_u64(e);
    let p_bits = (bit_length + 1) / 2;
    let q_bits = bit_length - p_bits;

    for pair in 1..=MAX_PAIR_ATTEMPTS {
        // Step 1: Generate two random primes p and q with gcd(e, prime - 1) = 1
        let p = coprime_prime(p_bits, &e);
        let q = coprime_prime(q_bits, &e);

        // Ensure p != q
        if p == q {
            continue;
        }

        // Step 2: Compute n = p * q
        let n = &p * &q;
        if n.bits() != bit_length as u64 {
            trace!(pair, "modulus length mismatch, retrying");
            continue;
        }

        // Step 3: Compute λ(n) = lcm(p-1, q-1)
        let lambda = lcm(&(&p - 1u8), &(&q - 1u8));

        // Step 4: Compute d = e^(-1) mod λ(n)
        let Some(d) = mod_inverse(&e, &lambda) else {
            continue;
        };

        // Step 5: CRT parameters for faster decryption
        let private_key = RsaPrivateKey::from_components(p, q, e.clone(), d)?;
        let public_key = private_key.to_public_key();
        debug!(bits = bit_length, pairs_tried = pair, "generated RSA key pair");
        return Ok((public_key, private_key));
    }

    Err(keygen_error("exhausted prime generation attempts"))
}

fn coprime_prime(bits: u32, e: &RsaBigInt) -> RsaBigInt {
    loop {
        let (prime, attempts) = random_prime(bits);
        trace!(bits, attempts, "prime candidate found");
        if gcd(e, &(&prime - 1u8)).is_one() {
            return prime;
        }
    }
}

/// Generate RSA key pair with the default public exponent (65537)
pub fn generate_keypair(format: KeyFormat, modulus_bits: u32) -> Result<KeyPair> {
    generate_keypair_with_exponent(format, modulus_bits, DEFAULT_PUBLIC_EXPONENT)
}

/// Generate RSA key pair with an explicit public exponent
pub fn generate_keypair_with_exponent(
    format: KeyFormat,
    modulus_bits: u32,
    e: u64,
) -> Result<KeyPair> {
    debug!(bits = modulus_bits, %format, "generating RSA key pair");
    let (public_key, private_key) = generate_rsa_keys(modulus_bits, e)?;

    Ok(KeyPair {
        public_key: KeyMaterial::from_public_key(&public_key, format)?,
        private_key: KeyMaterial::from_private_key(&private_key, format)?,
        modulus_bits,
    })
}

/// Generate RSA key pair with default settings (2048 bits, e=65537, PKCS#8)
pub fn generate_default_keypair() -> Result<KeyPair> {
    generate_keypair(KeyFormat::Pkcs8, DEFAULT_MODULUS_BITS)
}

/// Shared 1024-bit keys so unit tests do not each pay for generation
#[cfg(test)]
pub(crate) fn test_keys() -> (&'static RsaPublicKey, &'static RsaPrivateKey) {
    use std::sync::OnceLock;

    static KEYS: OnceLock<(RsaPublicKey, RsaPrivateKey)> = OnceLock::new();
    let (public, private) = KEYS.get_or_init(|| {
        generate_rsa_keys(1024, DEFAULT_PUBLIC_EXPONENT).expect("test key generation")
    });
    (public, private)
}
