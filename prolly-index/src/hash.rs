//! Content hashes used for node addressing.

use sha2::{Digest, Sha256};
use std::fmt;

/// Width of a content hash in bytes.
pub const HASH_LEN: usize = 20;

const BASE32_ALPHABET: &[u8; 32] = b"0123456789abcdefghijklmnopqrstuv";

/// A 20-byte content hash. Equality is byte equality; the string form is
/// 32 characters of lowercase base32, used for diagnostics and partition
/// keys only, never for comparison.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Hash([u8; HASH_LEN]);

impl Hash {
    pub const fn new(bytes: [u8; HASH_LEN]) -> Self {
        Hash(bytes)
    }

    /// Build a hash from a slice that must be exactly `HASH_LEN` bytes.
    pub fn from_slice(bytes: &[u8]) -> Self {
        assert!(bytes.len() == HASH_LEN, "hash must be {} bytes", HASH_LEN);
        let mut h = [0u8; HASH_LEN];
        h.copy_from_slice(bytes);
        Hash(h)
    }

    /// Compute the content hash of a byte string: SHA-256 truncated to
    /// `HASH_LEN` bytes.
    pub fn of(bytes: &[u8]) -> Self {
        let digest = Sha256::digest(bytes);
        Hash::from_slice(&digest[..HASH_LEN])
    }

    pub fn as_bytes(&self) -> &[u8; HASH_LEN] {
        &self.0
    }

    /// 32-character lowercase base32 rendering (160 bits / 5 bits per char).
    pub fn to_base32(&self) -> String {
        let mut out = String::with_capacity(32);
        for i in 0..32 {
            let bit = i * 5;
            let byte = bit / 8;
            let shift = bit % 8;
            let mut window = (self.0[byte] as u16) << 8;
            if byte + 1 < HASH_LEN {
                window |= self.0[byte + 1] as u16;
            }
            let idx = ((window >> (11 - shift)) & 0x1f) as usize;
            out.push(BASE32_ALPHABET[idx] as char);
        }
        out
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base32())
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash({})", self.to_base32())
    }
}
