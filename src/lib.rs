//! Block and header core of a sharded ledger.
//!
//! Provides the canonical block data model: headers, blocks, their canonical
//! encodings and hashes, transaction/receipt roots, the aggregate log filter
//! and block ordering.

pub mod core;
pub mod types;
pub mod utils;
