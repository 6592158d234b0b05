//! Block header, the consensus-critical summary of a block.
//!
//! The header's identity is the Keccak-256 hash of its canonical encoding,
//! so the field order of [`Header`] is the wire contract and must never be
//! reordered.

use crate::core::bloom::Bloom;
use crate::core::params::{SHARD_MASTER, ShardId};
use crate::types::address::Address;
use crate::types::bytes::Bytes;
use crate::types::encoding::Encode;
use crate::types::hash::Hash;
use crate::types::hexutil::{big_quantity, impl_fixed_bytes, uint64_quantity};
use crate::types::storage_size::StorageSize;
use num_bigint::BigUint;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use shardchain_derive::RlpCodec;

/// Block nonce length in bytes.
pub const NONCE_LEN: usize = 8;

/// 64-bit proof-of-work nonce, stored big-endian.
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct BlockNonce(pub [u8; NONCE_LEN]);

impl_fixed_bytes!(BlockNonce, NONCE_LEN, "BlockNonce");

/// Converts an integer into a block nonce.
pub fn encode_nonce(value: u64) -> BlockNonce {
    BlockNonce(value.to_be_bytes())
}

impl BlockNonce {
    /// Integer value of the nonce.
    pub fn to_u64(&self) -> u64 {
        u64::from_be_bytes(self.0)
    }
}

/// Block header.
///
/// `Clone` is a deep copy, see [`copy_header`].
#[derive(Debug, Default, PartialEq, Eq, RlpCodec)]
pub struct Header {
    pub shard_id: ShardId,
    pub parent_hash: Hash,
    pub coinbase: Address,
    /// State root after executing the block.
    pub root: Hash,
    /// Trie root of the block's transactions.
    pub tx_hash: Hash,
    /// Trie root of the block's receipts.
    pub receipt_hash: Hash,
    pub bloom: Bloom,
    pub difficulty: BigUint,
    pub number: BigUint,
    pub gas_limit: u64,
    pub gas_used: u64,
    /// Block timestamp in seconds.
    pub time: BigUint,
    pub extra: Bytes,
    pub mix_digest: Hash,
    pub nonce: BlockNonce,
}

impl Header {
    /// Keccak-256 of the header's canonical encoding.
    pub fn hash(&self) -> Hash {
        let mut h = Hash::keccak();
        self.encode(&mut h);
        h.finalize()
    }

    /// Approximate memory footprint, for cache accounting.
    pub fn size(&self) -> StorageSize {
        let big_bits = self.difficulty.bits() + self.number.bits() + self.time.bits();
        StorageSize::from(
            std::mem::size_of::<Header>() + self.extra.len() + (big_bits / 8) as usize,
        )
    }

    /// Whether this header belongs to a master block.
    pub fn is_master(&self) -> bool {
        self.shard_id == SHARD_MASTER
    }
}

/// Returns a deep copy of `h`: the big integers and the extra data of the
/// copy are independently allocated.
pub fn copy_header(h: &Header) -> Header {
    Header {
        shard_id: h.shard_id,
        parent_hash: h.parent_hash,
        coinbase: h.coinbase,
        root: h.root,
        tx_hash: h.tx_hash,
        receipt_hash: h.receipt_hash,
        bloom: h.bloom,
        difficulty: h.difficulty.clone(),
        number: h.number.clone(),
        gas_limit: h.gas_limit,
        gas_used: h.gas_used,
        time: h.time.clone(),
        extra: Bytes::from(h.extra.as_slice()),
        mix_digest: h.mix_digest,
        nonce: h.nonce,
    }
}

impl Clone for Header {
    fn clone(&self) -> Self {
        copy_header(self)
    }
}

/// JSON shape of a header. `hash` is written on output and ignored on input.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HeaderJson {
    shard_id: ShardId,
    parent_hash: Hash,
    miner: Address,
    state_root: Hash,
    transactions_root: Hash,
    receipts_root: Hash,
    logs_bloom: Bloom,
    #[serde(with = "big_quantity")]
    difficulty: BigUint,
    #[serde(with = "big_quantity")]
    number: BigUint,
    #[serde(with = "uint64_quantity")]
    gas_limit: u64,
    #[serde(with = "uint64_quantity")]
    gas_used: u64,
    #[serde(with = "big_quantity")]
    timestamp: BigUint,
    extra_data: Bytes,
    mix_hash: Hash,
    nonce: BlockNonce,
    #[serde(default, skip_deserializing)]
    hash: Hash,
}

impl From<&Header> for HeaderJson {
    fn from(h: &Header) -> Self {
        let h = copy_header(h);
        HeaderJson {
            hash: h.hash(),
            shard_id: h.shard_id,
            parent_hash: h.parent_hash,
            miner: h.coinbase,
            state_root: h.root,
            transactions_root: h.tx_hash,
            receipts_root: h.receipt_hash,
            logs_bloom: h.bloom,
            difficulty: h.difficulty,
            number: h.number,
            gas_limit: h.gas_limit,
            gas_used: h.gas_used,
            timestamp: h.time,
            extra_data: h.extra,
            mix_hash: h.mix_digest,
            nonce: h.nonce,
        }
    }
}

impl From<HeaderJson> for Header {
    fn from(j: HeaderJson) -> Self {
        Header {
            shard_id: j.shard_id,
            parent_hash: j.parent_hash,
            coinbase: j.miner,
            root: j.state_root,
            tx_hash: j.transactions_root,
            receipt_hash: j.receipts_root,
            bloom: j.logs_bloom,
            difficulty: j.difficulty,
            number: j.number,
            gas_limit: j.gas_limit,
            gas_used: j.gas_used,
            time: j.timestamp,
            extra: j.extra_data,
            mix_digest: j.mix_hash,
            nonce: j.nonce,
        }
    }
}

impl Serialize for Header {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        HeaderJson::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Header {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        HeaderJson::deserialize(deserializer).map(Header::from)
    }
}
