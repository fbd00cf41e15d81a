// Padding Module
// RSA block formatting (PKCS#1 v1.5, OAEP) and AES block alignment (PKCS#7)

pub mod oaep;
pub mod pkcs1;
pub mod pkcs7;

pub use oaep::{pad_oaep, unpad_oaep, OaepParams};
pub use pkcs1::{pad_pkcs1_v15, pad_pkcs1_v15_type1, unpad_pkcs1_v15, unpad_pkcs1_v15_type1};
pub use pkcs7::{pad_pkcs7, unpad_pkcs7};

/// Replays a fixed byte pattern so padding output is reproducible
#[cfg(test)]
pub(crate) struct FixedRng {
    pattern: Vec<u8>,
    position: usize,
}

#[cfg(test)]
impl FixedRng {
    pub(crate) fn new(pattern: &[u8]) -> Self {
        Self {
            pattern: pattern.to_vec(),
            position: 0,
        }
    }
}

#[cfg(test)]
impl rand::RngCore for FixedRng {
    fn next_u32(&mut self) -> u32 {
        let mut bytes = [0u8; 4];
        self.fill_bytes(&mut bytes);
        u32::from_le_bytes(bytes)
    }

    fn next_u64(&mut self) -> u64 {
        let mut bytes = [0u8; 8];
        self.fill_bytes(&mut bytes);
        u64::from_le_bytes(bytes)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for byte in dest {
            *byte = self.pattern[self.position % self.pattern.len()];
            self.position += 1;
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

#[cfg(test)]
impl rand::CryptoRng for FixedRng {}
