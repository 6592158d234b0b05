//! Blocks: a header plus the transactions and receipts it commits to.
//!
//! A block is immutable once built. Its identity is the hash of its header;
//! both the hash and the encoded size are computed lazily and cached.
//!
//! Two canonical encodings exist:
//! - relay format `[header, transactions, receipts]`, read and written by
//!   [`Block`];
//! - legacy storage format `[header, transactions, receipts, td]`, read
//!   only, through [`StorageBlock`].

use crate::core::bloom::{Bloom, create_bloom};
use crate::core::header::{Header, copy_header};
use crate::core::params::SHARD_MASTER;
use crate::core::receipt::ContractResult;
use crate::core::transaction::Transaction;
use crate::types::address::Address;
use crate::types::cache::OnceCache;
use crate::types::encoding::{
    Decode, DecodeError, Encode, EncodeSink, decode_list_payload, encode_list_header,
    ensure_list_consumed,
};
use crate::types::hash::Hash;
use crate::types::merkle_tree::{EMPTY_ROOT_HASH, derive_sha};
use crate::types::storage_size::StorageSize;
use crate::{debug, warn};
use num_bigint::BigUint;
use shardchain_derive::RlpCodec;
use std::sync::Arc;
use std::time::SystemTime;

/// Borrowed view of a block's contents.
#[derive(Debug, Clone, Copy)]
pub struct Body<'a> {
    pub transactions: &'a [Transaction],
    pub receipts: &'a [ContractResult],
}

/// An immutable block.
///
/// The transactions and receipts are reference counted: [`Block::with_seal`]
/// produces a block that shares them with its source, every other
/// constructor allocates its own copy.
#[derive(Debug, Clone)]
pub struct Block {
    header: Header,
    transactions: Arc<[Transaction]>,
    receipts: Arc<[ContractResult]>,

    /// Lazily computed header hash, do not use directly.
    cached_hash: OnceCache<Hash>,
    /// Lazily computed encoded size, do not use directly.
    cached_size: OnceCache<StorageSize>,

    /// Total difficulty, only ever set when reading legacy storage blocks.
    td: BigUint,

    /// When the block was received; not part of any encoding.
    pub received_at: Option<SystemTime>,
    /// Peer the block was received from; not part of any encoding.
    pub received_from: Option<String>,
}

impl Block {
    /// Creates a new block.
    ///
    /// The header is copied, and its transaction root, receipt root and log
    /// filter are overwritten with values derived from `txs` and `receipts`.
    /// With no receipts the receipt root is the empty root and the header's
    /// filter is left as given.
    pub fn new(header: &Header, txs: &[Transaction], receipts: &[ContractResult]) -> Self {
        let mut header = copy_header(header);

        if txs.is_empty() {
            header.tx_hash = EMPTY_ROOT_HASH;
        } else {
            header.tx_hash = derive_sha(txs);
        }

        if receipts.is_empty() {
            header.receipt_hash = EMPTY_ROOT_HASH;
        } else {
            header.receipt_hash = derive_sha(receipts);
            header.bloom = create_bloom(receipts);
        }

        if !txs.is_empty() && !receipts.is_empty() && txs.len() != receipts.len() {
            warn!(
                "block {} built with {} transactions but {} receipts",
                header.number,
                txs.len(),
                receipts.len()
            );
        }

        Self::assemble(header, txs.into(), receipts.into(), BigUint::default())
    }

    /// Creates a block with the given header and an empty body.
    ///
    /// The header is copied as is; its roots are not recomputed.
    pub fn with_header(header: &Header) -> Self {
        Self::assemble(
            copy_header(header),
            Arc::from([]),
            Arc::from([]),
            BigUint::default(),
        )
    }

    fn assemble(
        header: Header,
        transactions: Arc<[Transaction]>,
        receipts: Arc<[ContractResult]>,
        td: BigUint,
    ) -> Self {
        Self {
            header,
            transactions,
            receipts,
            cached_hash: OnceCache::new(),
            cached_size: OnceCache::new(),
            td,
            received_at: None,
            received_from: None,
        }
    }

    /// Returns a block with a copy of `header` that shares this block's
    /// transactions and receipts.
    ///
    /// The header is taken as is, so the caller is responsible for its roots
    /// still matching the shared body.
    pub fn with_seal(&self, header: &Header) -> Self {
        Self::assemble(
            copy_header(header),
            Arc::clone(&self.transactions),
            Arc::clone(&self.receipts),
            BigUint::default(),
        )
    }

    /// Returns a block with a copy of this block's header and copies of the
    /// given transactions and receipts. The header is not updated.
    pub fn with_body(&self, txs: &[Transaction], receipts: &[ContractResult]) -> Self {
        Self::assemble(
            copy_header(&self.header),
            txs.into(),
            receipts.into(),
            BigUint::default(),
        )
    }

    /// Returns the header hash, computing and caching it on first call.
    pub fn hash(&self) -> Hash {
        self.cached_hash.get_or_compute(|| self.header.hash())
    }

    /// Returns the relay-encoded size, computing and caching it on first call.
    pub fn size(&self) -> StorageSize {
        self.cached_size
            .get_or_compute(|| StorageSize::from(self.encoded_len()))
    }

    /// Finds a transaction by its hash.
    pub fn transaction(&self, hash: &Hash) -> Option<&Transaction> {
        self.transactions.iter().find(|tx| tx.hash() == *hash)
    }

    /// Finds the receipt produced by the transaction with the given hash.
    pub fn contract_receipt(&self, tx_hash: &Hash) -> Option<&ContractResult> {
        self.receipts.iter().find(|r| r.tx_hash == *tx_hash)
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn contract_receipts(&self) -> &[ContractResult] {
        &self.receipts
    }

    pub fn body(&self) -> Body<'_> {
        Body {
            transactions: &self.transactions,
            receipts: &self.receipts,
        }
    }

    /// Returns a deep copy of the header.
    pub fn header(&self) -> Header {
        copy_header(&self.header)
    }

    pub(crate) fn header_ref(&self) -> &Header {
        &self.header
    }

    pub fn shard_id(&self) -> u16 {
        self.header.shard_id
    }

    pub fn is_master(&self) -> bool {
        self.header.shard_id == SHARD_MASTER
    }

    pub fn number(&self) -> BigUint {
        self.header.number.clone()
    }

    /// Block number truncated to its low 64 bits.
    pub fn number_u64(&self) -> u64 {
        self.header.number.iter_u64_digits().next().unwrap_or(0)
    }

    pub fn difficulty(&self) -> BigUint {
        self.header.difficulty.clone()
    }

    pub fn time(&self) -> BigUint {
        self.header.time.clone()
    }

    pub fn gas_limit(&self) -> u64 {
        self.header.gas_limit
    }

    pub fn gas_used(&self) -> u64 {
        self.header.gas_used
    }

    pub fn nonce(&self) -> u64 {
        self.header.nonce.to_u64()
    }

    pub fn mix_digest(&self) -> Hash {
        self.header.mix_digest
    }

    pub fn bloom(&self) -> Bloom {
        self.header.bloom
    }

    pub fn coinbase(&self) -> Address {
        self.header.coinbase
    }

    pub fn root(&self) -> Hash {
        self.header.root
    }

    pub fn parent_hash(&self) -> Hash {
        self.header.parent_hash
    }

    pub fn tx_hash(&self) -> Hash {
        self.header.tx_hash
    }

    pub fn receipt_hash(&self) -> Hash {
        self.header.receipt_hash
    }

    pub fn extra(&self) -> Vec<u8> {
        self.header.extra.to_vec()
    }

    /// Total difficulty read from a legacy storage block, zero otherwise.
    #[deprecated(note = "total difficulty is only kept for legacy storage blocks")]
    pub fn deprecated_td(&self) -> BigUint {
        self.td.clone()
    }
}

impl Encode for Block {
    fn encode<S: EncodeSink>(&self, out: &mut S) {
        let payload_len = self.header.encoded_len()
            + self.transactions.encoded_len()
            + self.receipts.encoded_len();
        encode_list_header(payload_len, out);
        self.header.encode(out);
        self.transactions.encode(out);
        self.receipts.encode(out);
    }
}

/// Relay format as it appears on the wire.
#[derive(RlpCodec)]
struct ExtBlock {
    header: Header,
    transactions: Vec<Transaction>,
    receipts: Vec<ContractResult>,
}

impl Decode for Block {
    fn decode(input: &mut &[u8]) -> Result<Self, DecodeError> {
        let start = input.len();
        let ext = ExtBlock::decode(input)?;
        let block = Self::assemble(
            ext.header,
            ext.transactions.into(),
            ext.receipts.into(),
            BigUint::default(),
        );
        block
            .cached_size
            .store(StorageSize::from(start - input.len()));
        Ok(block)
    }
}

/// A block read from the legacy storage format, which also carries the
/// total difficulty. There is no way to write this format.
#[derive(Debug, Clone)]
pub struct StorageBlock(Block);

impl StorageBlock {
    pub fn block(&self) -> &Block {
        &self.0
    }

    pub fn into_block(self) -> Block {
        self.0
    }
}

impl From<StorageBlock> for Block {
    fn from(block: StorageBlock) -> Self {
        block.0
    }
}

impl Decode for StorageBlock {
    fn decode(input: &mut &[u8]) -> Result<Self, DecodeError> {
        let mut payload = decode_list_payload(input)?;
        let header = Header::decode(&mut payload)?;
        let transactions = Vec::<Transaction>::decode(&mut payload)?;
        let receipts = Vec::<ContractResult>::decode(&mut payload)?;
        let td = BigUint::decode(&mut payload)?;
        ensure_list_consumed(payload)?;

        debug!(
            "read legacy storage block {} with total difficulty {}",
            header.number, td
        );
        Ok(StorageBlock(Block::assemble(
            header,
            transactions.into(),
            receipts.into(),
            td,
        )))
    }
}
