//! 32-byte Keccak-256 hash type.

use crate::types::encoding::EncodeSink;
use crate::types::hexutil::impl_fixed_bytes;
use sha3::{Digest, Keccak256};

/// Keccak-256 hash length in bytes.
pub const HASH_LEN: usize = 32;

/// Fixed-size 32-byte hash used for block identity, roots and digests.
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash, Ord, PartialOrd)]
pub struct Hash(pub [u8; HASH_LEN]);

impl_fixed_bytes!(Hash, HASH_LEN, "Hash");

impl Hash {
    /// Creates a zero-valued hash (all bytes are 0x00).
    pub const fn zero() -> Hash {
        Hash([0u8; HASH_LEN])
    }

    /// Returns the hash as a byte slice.
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Creates a new Keccak-256 builder for incremental hashing.
    pub fn keccak() -> HashBuilder {
        HashBuilder::new()
    }
}

/// Keccak-256 of `data` in one call.
pub fn keccak256(data: &[u8]) -> Hash {
    let mut h = Hash::keccak();
    h.update(data);
    h.finalize()
}

/// Incremental Keccak-256 hash builder.
///
/// Implements [`EncodeSink`] so encodable values can be hashed directly
/// without an intermediate byte buffer.
#[derive(Clone, Default)]
pub struct HashBuilder {
    hasher: Keccak256,
}

impl HashBuilder {
    /// Creates a new hash builder with empty state.
    pub fn new() -> Self {
        Self {
            hasher: Keccak256::new(),
        }
    }

    /// Feeds data into the hash computation.
    pub fn update(&mut self, data: &[u8]) {
        self.hasher.update(data);
    }

    /// Feeds data and returns the builder, for chained one-liners.
    pub fn chain(mut self, data: &[u8]) -> Self {
        self.update(data);
        self
    }

    /// Consumes the builder and returns the final hash.
    pub fn finalize(self) -> Hash {
        Hash(self.hasher.finalize().into())
    }
}

impl EncodeSink for HashBuilder {
    fn write(&mut self, bytes: &[u8]) {
        self.hasher.update(bytes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::encoding::{Decode, Encode};

    #[test]
    fn keccak_of_empty_input() {
        assert_eq!(
            keccak256(&[]).to_string(),
            "0xc5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn incremental_matches_one_shot() {
        let one_shot = keccak256(b"hello world");
        let chained = Hash::keccak().chain(b"hello ").chain(b"world").finalize();
        assert_eq!(one_shot, chained);
    }

    #[test]
    fn zero_hash_is_all_zero() {
        assert!(Hash::zero().as_slice().iter().all(|&b| b == 0));
        assert_eq!(Hash::zero(), Hash::default());
    }

    #[test]
    fn encodes_as_32_byte_string() {
        let hash = keccak256(b"x");
        let bytes = hash.to_bytes();
        assert_eq!(bytes.len(), 33);
        assert_eq!(bytes[0], 0xa0);
        assert_eq!(Hash::from_bytes(&bytes).unwrap(), hash);
    }
}
