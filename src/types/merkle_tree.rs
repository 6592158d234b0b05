//! Ordered Merkle-Patricia trie roots for block bodies.
//!
//! Behavior:
//! - Item `i` is stored under the key `rlp(i)` with value `rlp(item)`, so the
//!   root commits to both the items and their order.
//! - Nodes whose encoding is shorter than 32 bytes are embedded in their
//!   parent; larger nodes are referenced by their Keccak-256 hash.
//! - The root node is always hashed, whatever its size.
//! - An empty list yields [`EMPTY_ROOT_HASH`], the hash of the empty string.

use crate::types::encoding::{Encode, encode_bytes, encode_list_header};
use crate::types::hash::{HASH_LEN, Hash, keccak256};

/// Root of an empty trie: `keccak256(rlp(""))`.
pub const EMPTY_ROOT_HASH: Hash = Hash([
    0x56, 0xe8, 0x1f, 0x17, 0x1b, 0xcc, 0x55, 0xa6, 0xff, 0x83, 0x45, 0xe6, 0x92, 0xc0, 0xf8, 0x6e,
    0x5b, 0x48, 0xe0, 0x1b, 0x99, 0x6c, 0xad, 0xc0, 0x01, 0x62, 0x2f, 0xb5, 0xe3, 0x63, 0xb4, 0x21,
]);

const BRANCH_WIDTH: usize = 16;

/// A key/value pair with the key already split into nibbles.
struct Leaf {
    nibbles: Vec<u8>,
    value: Vec<u8>,
}

/// Utility functions to build trie roots from ordered items.
pub struct MerkleTree;

impl MerkleTree {
    /// Computes the ordered trie root of `items`.
    pub fn derive_root<T: Encode>(items: &[T]) -> Hash {
        if items.is_empty() {
            return EMPTY_ROOT_HASH;
        }

        let mut leaves: Vec<Leaf> = items
            .iter()
            .enumerate()
            .map(|(index, item)| Leaf {
                nibbles: to_nibbles(&(index as u64).to_bytes()),
                value: item.to_bytes(),
            })
            .collect();
        leaves.sort_by(|a, b| a.nibbles.cmp(&b.nibbles));

        keccak256(&encode_node(&leaves, 0))
    }
}

/// Computes the ordered trie root of `items`.
pub fn derive_sha<T: Encode>(items: &[T]) -> Hash {
    MerkleTree::derive_root(items)
}

fn to_nibbles(key: &[u8]) -> Vec<u8> {
    key.iter().flat_map(|b| [b >> 4, b & 0x0f]).collect()
}

/// Compact (hex-prefix) encoding of a nibble path.
fn hex_prefix(nibbles: &[u8], leaf: bool) -> Vec<u8> {
    let flag = if leaf { 0x20 } else { 0x00 };
    let mut out = Vec::with_capacity(nibbles.len() / 2 + 1);
    let rest = if nibbles.len() % 2 == 1 {
        out.push(flag | 0x10 | nibbles[0]);
        &nibbles[1..]
    } else {
        out.push(flag);
        nibbles
    };
    out.extend(rest.chunks(2).map(|pair| (pair[0] << 4) | pair[1]));
    out
}

/// Encodes `items` (each already a complete RLP item) as one list.
fn encode_raw_list(items: &[Vec<u8>]) -> Vec<u8> {
    let payload_len: usize = items.iter().map(Vec::len).sum();
    let mut out = Vec::with_capacity(payload_len + 9);
    encode_list_header(payload_len, &mut out);
    for item in items {
        out.extend_from_slice(item);
    }
    out
}

fn encode_string(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len() + 9);
    encode_bytes(bytes, &mut out);
    out
}

/// How a parent refers to a child node: inline when small, by hash otherwise.
fn node_reference(encoded: Vec<u8>) -> Vec<u8> {
    if encoded.len() < HASH_LEN {
        encoded
    } else {
        encode_string(keccak256(&encoded).as_slice())
    }
}

fn common_prefix_len(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

/// Encodes the node holding the sorted `leaves`, which all share the first
/// `depth` nibbles.
fn encode_node(leaves: &[Leaf], depth: usize) -> Vec<u8> {
    if let [leaf] = leaves {
        return encode_raw_list(&[
            encode_string(&hex_prefix(&leaf.nibbles[depth..], true)),
            encode_string(&leaf.value),
        ]);
    }

    // Sorted input: the shared prefix of all leaves is that of the extremes.
    let first = &leaves[0].nibbles[depth..];
    let last = &leaves[leaves.len() - 1].nibbles[depth..];
    let shared = common_prefix_len(first, last);
    if shared > 0 {
        let child = encode_node(leaves, depth + shared);
        return encode_raw_list(&[
            encode_string(&hex_prefix(&first[..shared], false)),
            node_reference(child),
        ]);
    }

    let mut slots: Vec<Vec<u8>> = Vec::with_capacity(BRANCH_WIDTH + 1);
    let mut value = encode_string(&[]);
    let mut rest = leaves;
    if let Some(leaf) = rest.first()
        && leaf.nibbles.len() == depth
    {
        value = encode_string(&leaf.value);
        rest = &rest[1..];
    }
    for nibble in 0..BRANCH_WIDTH as u8 {
        let count = rest
            .iter()
            .take_while(|leaf| leaf.nibbles[depth] == nibble)
            .count();
        let (group, tail) = rest.split_at(count);
        rest = tail;
        slots.push(if group.is_empty() {
            encode_string(&[])
        } else {
            node_reference(encode_node(group, depth + 1))
        });
    }
    slots.push(value);
    encode_raw_list(&slots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::bytes::Bytes;

    fn items(data: &[&str]) -> Vec<Bytes> {
        data.iter().map(|d| Bytes::from(*d)).collect()
    }

    #[test]
    fn empty_root_is_hash_of_empty_string() {
        assert_eq!(keccak256(&[0x80]), EMPTY_ROOT_HASH);
        assert_eq!(derive_sha::<Bytes>(&[]), EMPTY_ROOT_HASH);
    }

    #[test]
    fn single_item_root_is_hashed_leaf() {
        let list = items(&["a"]);
        // key rlp(0) = 0x80 -> nibbles [8, 0] -> hex prefix 0x20 0x80
        let leaf = encode_raw_list(&[encode_string(&[0x20, 0x80]), encode_string(&[b'a'])]);
        assert_eq!(derive_sha(&list), keccak256(&leaf));
    }

    #[test]
    fn hex_prefix_flags() {
        assert_eq!(hex_prefix(&[1, 2, 3, 4, 5], false), vec![0x11, 0x23, 0x45]);
        assert_eq!(hex_prefix(&[0, 1, 2, 3, 4, 5], false), vec![0x00, 0x01, 0x23, 0x45]);
        assert_eq!(hex_prefix(&[0x0f, 0x01, 0x0c, 0x0b, 0x08], true), vec![0x3f, 0x1c, 0xb8]);
        assert_eq!(hex_prefix(&[0, 0x0f, 0x01, 0x0c, 0x0b, 0x08], true), vec![0x20, 0x0f, 0x1c, 0xb8]);
    }

    #[test]
    fn root_depends_on_order() {
        let forward = items(&["alpha", "beta", "gamma"]);
        let swapped = items(&["beta", "alpha", "gamma"]);
        assert_ne!(derive_sha(&forward), derive_sha(&swapped));
    }

    #[test]
    fn root_depends_on_content() {
        let a = items(&["alpha", "beta"]);
        let b = items(&["alpha", "betA"]);
        assert_ne!(derive_sha(&a), derive_sha(&b));
    }

    #[test]
    fn root_is_deterministic() {
        let list: Vec<Bytes> = (0..300u32).map(|i| Bytes::from(i.to_be_bytes())).collect();
        assert_eq!(derive_sha(&list), derive_sha(&list.clone()));
        assert_ne!(derive_sha(&list), derive_sha(&list[..299]));
    }
}
