//! Value transfers and contract calls carried in a block body.
//!
//! A transaction is identified by the Keccak-256 hash of its canonical
//! encoding. The hash is computed once and cached; the cache is not part of
//! the encoding.

use crate::types::address::Address;
use crate::types::bytes::Bytes;
use crate::types::cache::OnceCache;
use crate::types::encoding::Encode;
use crate::types::hash::Hash;
use num_bigint::BigUint;
use shardchain_derive::RlpCodec;

/// A signed transaction.
///
/// Field order is the wire format. Mutating a field after [`hash`] has been
/// called leaves the cached hash stale; build a new value instead.
///
/// [`hash`]: Transaction::hash
#[derive(Clone, Debug, PartialEq, Eq, RlpCodec)]
pub struct Transaction {
    pub account_nonce: u64,
    /// Gas price in the smallest currency unit.
    pub price: BigUint,
    pub gas_limit: u64,
    /// Destination account; `None` creates a contract.
    pub recipient: Option<Address>,
    pub amount: BigUint,
    pub payload: Bytes,

    // Signature values
    pub v: BigUint,
    pub r: BigUint,
    pub s: BigUint,

    /// Lazily computed transaction hash, do not use directly.
    #[rlp(skip)]
    cached_hash: OnceCache<Hash>,
}

impl Transaction {
    /// Creates an unsigned transaction to `recipient`.
    pub fn new(
        account_nonce: u64,
        recipient: Address,
        amount: BigUint,
        gas_limit: u64,
        price: BigUint,
        payload: Bytes,
    ) -> Self {
        Self::build(account_nonce, Some(recipient), amount, gas_limit, price, payload)
    }

    /// Creates an unsigned transaction whose payload is contract init code.
    pub fn new_contract_creation(
        account_nonce: u64,
        amount: BigUint,
        gas_limit: u64,
        price: BigUint,
        payload: Bytes,
    ) -> Self {
        Self::build(account_nonce, None, amount, gas_limit, price, payload)
    }

    fn build(
        account_nonce: u64,
        recipient: Option<Address>,
        amount: BigUint,
        gas_limit: u64,
        price: BigUint,
        payload: Bytes,
    ) -> Self {
        Self {
            account_nonce,
            price,
            gas_limit,
            recipient,
            amount,
            payload,
            v: BigUint::default(),
            r: BigUint::default(),
            s: BigUint::default(),
            cached_hash: OnceCache::new(),
        }
    }

    /// Returns a copy carrying the given signature values.
    pub fn with_signature(&self, v: BigUint, r: BigUint, s: BigUint) -> Self {
        Self {
            v,
            r,
            s,
            cached_hash: OnceCache::new(),
            ..self.clone()
        }
    }

    /// Returns the transaction hash, computing and caching it on first call.
    pub fn hash(&self) -> Hash {
        self.cached_hash.get_or_compute(|| {
            let mut h = Hash::keccak();
            self.encode(&mut h);
            h.finalize()
        })
    }

    /// Whether this transaction creates a contract.
    pub fn is_contract_creation(&self) -> bool {
        self.recipient.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::encoding::{Decode, DecodeError};
    use crate::types::hash::keccak256;
    use crate::utils::test_utils::utils::new_tx;

    #[test]
    fn serialize_deserialize_roundtrip() {
        let tx = new_tx(7, b"hello");
        let decoded = Transaction::from_bytes(&tx.to_bytes()).expect("decode failed");
        assert_eq!(tx, decoded);
        assert_eq!(tx.hash(), decoded.hash());
    }

    #[test]
    fn hash_is_keccak_of_encoding() {
        let tx = new_tx(1, b"data");
        assert_eq!(tx.hash(), keccak256(&tx.to_bytes()));
    }

    #[test]
    fn hash_is_deterministic() {
        let tx = new_tx(3, b"abc");
        assert_eq!(tx.hash(), tx.hash());
        assert_eq!(tx.hash(), tx.clone().hash());
    }

    #[test]
    fn nonce_changes_hash() {
        assert_ne!(new_tx(1, b"x").hash(), new_tx(2, b"x").hash());
    }

    #[test]
    fn signature_changes_hash() {
        let tx = new_tx(1, b"x");
        let signed = tx.with_signature(
            BigUint::from(27u8),
            BigUint::from(1u8),
            BigUint::from(2u8),
        );
        assert_ne!(tx.hash(), signed.hash());
        assert_eq!(signed.payload, tx.payload);
    }

    #[test]
    fn contract_creation_has_empty_recipient() {
        let tx = Transaction::new_contract_creation(
            0,
            BigUint::default(),
            100_000,
            BigUint::from(1u8),
            Bytes::from(&[0x60, 0x80]),
        );
        assert!(tx.is_contract_creation());
        let decoded = Transaction::from_bytes(&tx.to_bytes()).unwrap();
        assert_eq!(decoded.recipient, None);
    }

    #[test]
    fn truncated_encoding_is_rejected() {
        let bytes = new_tx(9, b"payload").to_bytes();
        assert_eq!(
            Transaction::from_bytes(&bytes[..bytes.len() - 1]),
            Err(DecodeError::UnexpectedEof)
        );
    }
}
