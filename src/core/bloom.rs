//! 2048-bit aggregate log filter.
//!
//! Every log contributes its address and each of its topics. An item sets
//! three bits, taken from the first six bytes of its Keccak-256 hash as
//! three big-endian 11-bit indices. A block's filter is the union of the
//! filters of all its receipts, so a negative membership test proves a log
//! is absent while a positive one only suggests it may be present.

use crate::core::params::{BLOOM_BIT_LENGTH, BLOOM_BYTE_LENGTH};
use crate::core::receipt::{ContractResult, Log};
use crate::types::hash::keccak256;
use crate::types::hexutil::impl_fixed_bytes;

/// Fixed-size log filter carried in every header and receipt.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bloom(pub [u8; BLOOM_BYTE_LENGTH]);

impl_fixed_bytes!(Bloom, BLOOM_BYTE_LENGTH, "Bloom");

impl Default for Bloom {
    fn default() -> Self {
        Bloom::zero()
    }
}

/// Byte index and bit mask of the three bits set for `data`.
fn bloom_bits(data: &[u8]) -> [(usize, u8); 3] {
    let hash = keccak256(data);
    let mut bits = [(0usize, 0u8); 3];
    for (i, bit) in bits.iter_mut().enumerate() {
        let index = ((usize::from(hash.0[2 * i]) << 8) | usize::from(hash.0[2 * i + 1]))
            & (BLOOM_BIT_LENGTH - 1);
        *bit = (BLOOM_BYTE_LENGTH - 1 - index / 8, 1u8 << (index % 8));
    }
    bits
}

impl Bloom {
    /// An empty filter.
    pub const fn zero() -> Bloom {
        Bloom([0u8; BLOOM_BYTE_LENGTH])
    }

    /// Adds `data` to the filter.
    pub fn add(&mut self, data: &[u8]) {
        for (byte, mask) in bloom_bits(data) {
            self.0[byte] |= mask;
        }
    }

    /// Returns false if `data` was certainly never added.
    pub fn contains(&self, data: &[u8]) -> bool {
        bloom_bits(data)
            .iter()
            .all(|&(byte, mask)| self.0[byte] & mask == mask)
    }

    /// Merges `other` into this filter.
    pub fn accrue(&mut self, other: &Bloom) {
        for (a, b) in self.0.iter_mut().zip(other.0.iter()) {
            *a |= b;
        }
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&b| b == 0)
    }
}

/// Filter over the addresses and topics of `logs`.
pub fn logs_bloom(logs: &[Log]) -> Bloom {
    let mut bloom = Bloom::zero();
    for log in logs {
        bloom.add(log.address.as_slice());
        for topic in &log.topics {
            bloom.add(topic.as_slice());
        }
    }
    bloom
}

/// Union of the log filters of every receipt.
pub fn create_bloom(receipts: &[ContractResult]) -> Bloom {
    let mut bloom = Bloom::zero();
    for receipt in receipts {
        bloom.accrue(&logs_bloom(&receipt.logs));
    }
    bloom
}
