//! Core block data structures.
//!
//! - `Header`: consensus-critical block summary, identified by its hash
//! - `Block`: immutable header plus transactions and receipts
//! - `Transaction`, `ContractResult`, `Log`: the body entities blocks commit to
//! - `Bloom`: aggregate log filter
//! - `BlockBy`: comparator-driven block ordering

pub mod block;
pub mod bloom;
pub mod header;
pub mod params;
pub mod receipt;
pub mod sort;
pub mod transaction;
