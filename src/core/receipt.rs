//! Transaction execution receipts.
//!
//! Each executed transaction produces a [`ContractResult`] recording the
//! outcome and the logs it emitted. A block commits to its receipts through
//! the receipt trie root and the aggregate log filter in its header.

use crate::core::bloom::{Bloom, logs_bloom};
use crate::types::address::Address;
use crate::types::bytes::Bytes;
use crate::types::encoding::Encode;
use crate::types::hash::Hash;
use shardchain_derive::RlpCodec;

/// An event emitted by a contract during execution.
#[derive(Clone, Debug, Default, PartialEq, Eq, RlpCodec)]
pub struct Log {
    /// Contract that emitted the event.
    pub address: Address,
    /// Indexed event parameters.
    pub topics: Vec<Hash>,
    pub data: Bytes,
}

/// Record of a single transaction's execution result within a block.
#[derive(Clone, Debug, Default, PartialEq, Eq, RlpCodec)]
pub struct ContractResult {
    /// [`RECEIPT_STATUS_SUCCESSFUL`] or [`RECEIPT_STATUS_FAILED`].
    ///
    /// [`RECEIPT_STATUS_SUCCESSFUL`]: crate::core::params::RECEIPT_STATUS_SUCCESSFUL
    /// [`RECEIPT_STATUS_FAILED`]: crate::core::params::RECEIPT_STATUS_FAILED
    pub status: u64,
    /// Running total of gas consumed by all transactions up to and including this one.
    pub cumulative_gas_used: u64,
    /// Filter over the addresses and topics of `logs`.
    pub bloom: Bloom,
    pub logs: Vec<Log>,
    /// Hash of the transaction that produced this receipt.
    pub tx_hash: Hash,
    /// Created contract, or the zero address.
    pub contract_address: Address,
    /// Gas consumed by this individual transaction.
    pub gas_used: u64,
}

impl ContractResult {
    /// Builds a receipt, deriving its filter from `logs`.
    pub fn new(
        tx_hash: Hash,
        status: u64,
        cumulative_gas_used: u64,
        gas_used: u64,
        logs: Vec<Log>,
    ) -> Self {
        Self {
            status,
            cumulative_gas_used,
            bloom: logs_bloom(&logs),
            logs,
            tx_hash,
            contract_address: Address::zero(),
            gas_used,
        }
    }

    /// Keccak-256 of the receipt's canonical encoding.
    pub fn hash(&self) -> Hash {
        let mut h = Hash::keccak();
        self.encode(&mut h);
        h.finalize()
    }
}
