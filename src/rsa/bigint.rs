// RSA Big Integer Operations
// Wrapper around num-bigint for RSA-specific operations

use num_bigint::{BigInt, BigUint, RandBigInt, Sign};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::thread_rng;

/// RSA Big Integer type alias
pub type RsaBigInt = BigUint;

/// Odd primes used to sieve candidates before Miller-Rabin
const SMALL_PRIMES: [u32; 53] = [
    3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
    101, 103, 107, 109, 113, 127, 131, 137, 139, 149, 151, 157, 163, 167, 173, 179, 181, 191,
    193, 197, 199, 211, 223, 227, 229, 233, 239, 241, 251,
];

/// Create a big integer from u64
pub fn from_u64(n: u64) -> RsaBigInt {
    RsaBigInt::from(n)
}

/// Create a big integer from bytes (big-endian)
pub fn from_bytes(bytes: &[u8]) -> RsaBigInt {
    RsaBigInt::from_bytes_be(bytes)
}

/// Convert big integer to bytes (big-endian)
pub fn to_bytes(n: &RsaBigInt) -> Vec<u8> {
    n.to_bytes_be()
}

/// Big-endian encoding left-padded with zeros to exactly `len` bytes (I2OSP).
/// Returns None if the value does not fit.
pub fn to_bytes_padded(n: &RsaBigInt, len: usize) -> Option<Vec<u8>> {
    let bytes = n.to_bytes_be();
    if n.is_zero() {
        return Some(vec![0u8; len]);
    }
    if bytes.len() > len {
        return None;
    }
    let mut result = vec![0u8; len];
    result[len - bytes.len()..].copy_from_slice(&bytes);
    Some(result)
}

/// Modular exponentiation: base^exp mod modulus
pub fn mod_pow(base: &RsaBigInt, exp: &RsaBigInt, modulus: &RsaBigInt) -> RsaBigInt {
    if modulus.is_one() || modulus.is_zero() {
        return RsaBigInt::zero();
    }
    base.modpow(exp, modulus)
}

/// Extended Euclidean Algorithm over signed integers
/// Returns (gcd, x) such that a*x ≡ gcd (mod b)
fn extended_gcd(a: &BigInt, b: &BigInt) -> (BigInt, BigInt) {
    let (mut old_r, mut r) = (a.clone(), b.clone());
    let (mut old_x, mut x) = (BigInt::one(), BigInt::zero());

    while !r.is_zero() {
        let q = &old_r / &r;
        let next_r = &old_r - &q * &r;
        old_r = std::mem::replace(&mut r, next_r);
        let next_x = &old_x - &q * &x;
        old_x = std::mem::replace(&mut x, next_x);
    }

    (old_r, old_x)
}

/// Compute modular inverse: a^(-1) mod m
/// Returns None if inverse doesn't exist
pub fn mod_inverse(a: &RsaBigInt, m: &RsaBigInt) -> Option<RsaBigInt> {
    if m.is_zero() {
        return None;
    }
    let a = BigInt::from_biguint(Sign::Plus, a % m);
    let m_signed = BigInt::from_biguint(Sign::Plus, m.clone());
    let (gcd, x) = extended_gcd(&a, &m_signed);

    if !gcd.is_one() {
        // Inverse doesn't exist
        return None;
    }

    // Normalize into [0, m)
    x.mod_floor(&m_signed).to_biguint()
}

/// Miller-Rabin rounds for a candidate of `bits` bits (error below 2^-80 for random input)
fn miller_rabin_rounds(bits: u64) -> u32 {
    match bits {
        b if b >= 1024 => 5,
        b if b >= 512 => 8,
        b if b >= 256 => 16,
        _ => 32,
    }
}

/// Miller-Rabin primality test
/// Returns true if n is probably prime
pub fn is_probable_prime(n: &RsaBigInt, iterations: u32) -> bool {
    if n < &RsaBigInt::from(2u8) {
        return false;
    }
    if n == &RsaBigInt::from(2u8) || n == &RsaBigInt::from(3u8) {
        return true;
    }
    if n.is_even() {
        return false;
    }

    // Trial division by small primes
    for &p in SMALL_PRIMES.iter() {
        let p = RsaBigInt::from(p);
        if n == &p {
            return true;
        }
        if (n % &p).is_zero() {
            return false;
        }
    }

    // Write n-1 as d * 2^s with d odd
    let n_minus_one = n - 1u8;
    let mut d = n_minus_one.clone();
    let mut s = 0u32;
    while d.is_even() {
        d >>= 1;
        s += 1;
    }

    // Witness loop
    let mut rng = thread_rng();
    let two = RsaBigInt::from(2u8);

    for _ in 0..iterations {
        // Pick random witness a in [2, n-2]
        let a = rng.gen_biguint_range(&two, &n_minus_one);

        // Compute x = a^d mod n
        let mut x = mod_pow(&a, &d, n);

        if x.is_one() || x == n_minus_one {
            continue;
        }

        let mut continue_outer = false;
        for _ in 1..s {
            x = mod_pow(&x, &two, n);
            if x == n_minus_one {
                continue_outer = true;
                break;
            }
        }

        if continue_outer {
            continue;
        }

        // Composite
        return false;
    }

    // Probably prime
    true
}

/// Generate a random big integer in range [0, bound)
pub fn random_biguint(bound: &RsaBigInt) -> RsaBigInt {
    let mut rng = thread_rng();
    rng.gen_biguint_below(bound)
}

/// Generate a random prime of exactly `bit_length` bits with the two top bits set,
/// so that the product of two such primes has exactly the sum of their lengths.
/// Returns the prime and the number of candidates tried.
pub fn random_prime(bit_length: u32) -> (RsaBigInt, u32) {
    let mut rng = thread_rng();
    let top_bits = (RsaBigInt::one() << (bit_length - 1)) | (RsaBigInt::one() << (bit_length - 2));
    let rounds = miller_rabin_rounds(bit_length as u64);
    let mut attempts = 0u32;

    loop {
        attempts += 1;
        // Generate random number with specified bit length, odd, top bits set
        let candidate = rng.gen_biguint(bit_length as u64) | &top_bits | RsaBigInt::one();

        if is_probable_prime(&candidate, rounds) {
            return (candidate, attempts);
        }
    }
}

/// Greatest common divisor
pub fn gcd(a: &RsaBigInt, b: &RsaBigInt) -> RsaBigInt {
    a.gcd(b)
}

/// Least common multiple
pub fn lcm(a: &RsaBigInt, b: &RsaBigInt) -> RsaBigInt {
    if a.is_zero() || b.is_zero() {
        return RsaBigInt::zero();
    }
    (a * b) / gcd(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mod_pow() {
        // 3^5 mod 7 = 243 mod 7 = 5
        let base = from_u64(3);
        let exp = from_u64(5);
        let modulus = from_u64(7);
        let result = mod_pow(&base, &exp, &modulus);
        assert_eq!(result, from_u64(5));
    }

    #[test]
    fn test_mod_inverse() {
        // 3 * 5 = 15 ≡ 1 mod 7, so inverse of 3 mod 7 is 5
        let a = from_u64(3);
        let m = from_u64(7);
        let inv = mod_inverse(&a, &m).unwrap();
        assert_eq!(inv, from_u64(5));

        // Verify: 3 * 5 = 15 ≡ 1 (mod 7)
        assert_eq!((a * inv) % m, from_u64(1));
    }

    #[test]
    fn test_mod_inverse_large_and_missing() {
        // 17^-1 mod 3120, where 3120 = (61-1)(53-1)
        let inv = mod_inverse(&from_u64(17), &from_u64(3120)).unwrap();
        assert_eq!(inv, from_u64(2753));

        // gcd(6, 9) = 3, no inverse
        assert!(mod_inverse(&from_u64(6), &from_u64(9)).is_none());
    }

    #[test]
    fn test_is_probable_prime() {
        // 2 is prime
        assert!(is_probable_prime(&from_u64(2), 5));
        // 3 is prime
        assert!(is_probable_prime(&from_u64(3), 5));
        // 7 is prime
        assert!(is_probable_prime(&from_u64(7), 5));
        // 4 is not prime
        assert!(!is_probable_prime(&from_u64(4), 5));
        // 9 is not prime
        assert!(!is_probable_prime(&from_u64(9), 5));
        // Mersenne prime 2^61 - 1
        assert!(is_probable_prime(&from_u64((1u64 << 61) - 1), 10));
        // Carmichael number 561 = 3 * 11 * 17
        assert!(!is_probable_prime(&from_u64(561), 10));
        // 1009 * 1013, past the sieve
        assert!(!is_probable_prime(&from_u64(1009 * 1013), 10));
    }

    #[test]
    fn test_random_prime_bit_length() {
        let (p, attempts) = random_prime(128);
        assert_eq!(p.bits(), 128);
        assert!(p.is_odd());
        assert!(attempts >= 1);
        assert!(is_probable_prime(&p, 20));
    }

    #[test]
    fn test_to_bytes_padded() {
        assert_eq!(to_bytes_padded(&from_u64(0x0102), 4).unwrap(), vec![0, 0, 1, 2]);
        assert_eq!(to_bytes_padded(&from_u64(0), 2).unwrap(), vec![0, 0]);
        assert!(to_bytes_padded(&from_u64(0x010203), 2).is_none());
    }

    #[test]
    fn test_lcm() {
        assert_eq!(lcm(&from_u64(4), &from_u64(6)), from_u64(12));
        assert_eq!(lcm(&from_u64(0), &from_u64(6)), from_u64(0));
    }
}
