//! Protocol constants shared by the block model and the codec.

/// Identifier of the shard a block belongs to.
pub type ShardId = u16;

/// Reserved shard id marking a master (aggregating) block rather than a
/// shard block.
pub const SHARD_MASTER: ShardId = 0xFFFF;

/// Size of the aggregate log filter in bytes.
pub const BLOOM_BYTE_LENGTH: usize = 256;

/// Size of the aggregate log filter in bits.
pub const BLOOM_BIT_LENGTH: usize = 8 * BLOOM_BYTE_LENGTH;

/// Upper bound on items in one decoded list, so a hostile length cannot
/// make the decoder allocate without limit.
pub const MAX_LIST_ITEMS: usize = 1_000_000;

/// Receipt status of a failed transaction.
pub const RECEIPT_STATUS_FAILED: u64 = 0;

/// Receipt status of a successful transaction.
pub const RECEIPT_STATUS_SUCCESSFUL: u64 = 1;
