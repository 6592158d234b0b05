//! Shared fixtures for unit tests.

#[cfg(test)]
pub mod utils {
    use crate::core::header::{Header, encode_nonce};
    use crate::core::params::RECEIPT_STATUS_SUCCESSFUL;
    use crate::core::receipt::{ContractResult, Log};
    use crate::core::transaction::Transaction;
    use crate::types::address::Address;
    use crate::types::bytes::Bytes;
    use crate::types::hash::{HASH_LEN, Hash, keccak256};
    use num_bigint::BigUint;
    use std::sync::atomic::{AtomicU64, Ordering};

    static COUNTER: AtomicU64 = AtomicU64::new(0);

    pub fn random_hash() -> Hash {
        let mut value = [0u8; HASH_LEN];
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        value[..8].copy_from_slice(&n.to_le_bytes());
        Hash(value)
    }

    /// Header with fixed, recognizable values: extra data `b"extra"`,
    /// difficulty 131072, gas limit 8,000,000 and time 1,500,000,000.
    pub fn sample_header(shard_id: u16, number: u64) -> Header {
        Header {
            shard_id,
            parent_hash: keccak256(&number.to_be_bytes()),
            coinbase: Address([0xcb; 20]),
            root: keccak256(b"state"),
            difficulty: BigUint::from(131_072u32),
            number: BigUint::from(number),
            gas_limit: 8_000_000,
            gas_used: 21_000,
            time: BigUint::from(1_500_000_000u32),
            extra: Bytes::from("extra"),
            mix_digest: keccak256(b"mix"),
            nonce: encode_nonce(0x42),
            ..Header::default()
        }
    }

    /// Transfer to a fixed recipient, made unique by `nonce` and `payload`.
    pub fn new_tx(nonce: u64, payload: &[u8]) -> Transaction {
        Transaction::new(
            nonce,
            Address([0x0a; 20]),
            BigUint::from(1_000u32),
            21_000,
            BigUint::from(1u8),
            Bytes::from(payload),
        )
    }

    /// Successful receipt for `tx` with one log whose topic is the tx hash.
    pub fn receipt_for(tx: &Transaction, cumulative_gas_used: u64) -> ContractResult {
        ContractResult::new(
            tx.hash(),
            RECEIPT_STATUS_SUCCESSFUL,
            cumulative_gas_used,
            21_000,
            vec![Log {
                address: Address([0x0c; 20]),
                topics: vec![tx.hash(), random_hash()],
                data: Bytes::from(tx.payload.as_slice()),
            }],
        )
    }
}
