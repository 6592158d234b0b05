//! Core type definitions shared by every consensus structure.
//!
//! This module provides the fundamental building blocks:
//! - `encoding`: the canonical RLP codec behind every wire and storage format
//! - `Hash`, `Address`, `Bytes`: fixed and variable-size byte values
//! - `hexutil`: `0x`-hex text forms used by JSON and logs
//! - `merkle_tree`: ordered trie roots over block bodies
//! - `OnceCache`: compute-once cells for derived values

pub mod address;
pub mod bytes;
pub mod cache;
pub mod encoding;
pub mod hash;
pub mod hexutil;
pub mod merkle_tree;
pub mod storage_size;
