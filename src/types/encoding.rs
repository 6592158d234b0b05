//! Canonical RLP encoding and decoding.
//!
//! Every consensus structure is serialized with Recursive Length Prefix
//! encoding. The decoder is strict: any input that a conforming encoder
//! could not have produced is rejected, so each value has exactly one byte
//! representation and hashes agree across nodes.
//!
//! # Binary Format
//!
//! - A single byte below `0x80` is its own encoding.
//! - Strings of 0..=55 bytes: `0x80 + len` followed by the bytes.
//! - Longer strings: `0xb7 + len_of_len`, big-endian length, bytes.
//! - Lists: same scheme with base `0xc0` / `0xf7` over the concatenated items.
//! - Unsigned integers: minimal big-endian bytes as a string; zero is the
//!   empty string `0x80`.
//! - Fixed-size byte arrays: a string of exactly `N` bytes.
//!
//! # Example
//!
//! ```ignore
//! use crate::types::encoding::{Decode, Encode};
//!
//! let bytes = 1024u64.to_bytes();
//! assert_eq!(bytes, vec![0x82, 0x04, 0x00]);
//! assert_eq!(u64::from_bytes(&bytes).unwrap(), 1024);
//! ```

use crate::core::params::MAX_LIST_ITEMS;
use num_bigint::BigUint;

const STRING_OFFSET: u8 = 0x80;
const LIST_OFFSET: u8 = 0xc0;
const SHORT_PAYLOAD_MAX: usize = 55;

/// Sink for writing encoded bytes.
///
/// Implemented by byte buffers, size counters and hashers so a value can be
/// encoded straight into its destination.
pub trait EncodeSink {
    /// Writes the given bytes to the sink.
    fn write(&mut self, bytes: &[u8]);
}

/// Counts encoded bytes without storing them.
///
/// Used for list payload lengths and for the block size cache.
#[derive(Debug, Default)]
pub struct SizeCounter {
    len: usize,
}

impl SizeCounter {
    /// Creates a new counter initialized to zero.
    pub fn new() -> Self {
        Self { len: 0 }
    }

    /// Returns the total number of bytes counted.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl EncodeSink for SizeCounter {
    fn write(&mut self, bytes: &[u8]) {
        self.len += bytes.len();
    }
}

impl EncodeSink for Vec<u8> {
    fn write(&mut self, bytes: &[u8]) {
        self.extend_from_slice(bytes);
    }
}

/// Trait for types with a canonical RLP encoding.
pub trait Encode {
    /// Writes the full RLP item (prefix and payload) to the given sink.
    fn encode<S: EncodeSink>(&self, out: &mut S);

    /// Returns the length in bytes of the full RLP item.
    fn encoded_len(&self) -> usize {
        let mut counter = SizeCounter::new();
        self.encode(&mut counter);
        counter.len()
    }

    /// Serializes to a new byte buffer with exact capacity.
    fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.encode(&mut out);
        out
    }
}

/// Errors produced by the canonical decoder.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// Input ended before the announced item was complete.
    #[error("unexpected end of input")]
    UnexpectedEof,
    /// A list was found where a string was expected.
    #[error("expected input string or byte")]
    ExpectedString,
    /// A string was found where a list was expected.
    #[error("expected input list")]
    ExpectedList,
    /// A size prefix was not in its shortest form.
    #[error("non-canonical size information")]
    NonCanonicalSize,
    /// An integer had leading zero bytes or was encoded as `0x00`.
    #[error("non-canonical integer (leading zero bytes)")]
    NonCanonicalInteger,
    /// An integer does not fit the target type.
    #[error("input string too long for {type_name}")]
    IntegerOverflow { type_name: &'static str },
    /// A fixed-size value had the wrong number of bytes.
    #[error("invalid length for {type_name}: expected {expected} bytes, got {actual}")]
    InvalidLength {
        type_name: &'static str,
        expected: usize,
        actual: usize,
    },
    /// A list contained more items than the target structure has fields.
    #[error("input list has too many elements ({remaining} bytes left)")]
    ListTooLong { remaining: usize },
    /// Bytes remained after the top-level value was decoded.
    #[error("trailing bytes after value ({remaining} bytes)")]
    TrailingBytes { remaining: usize },
    /// Announced size does not fit in memory or exceeds the list item limit.
    #[error("value size exceeds limits")]
    LengthOverflow,
    /// Data does not represent a valid value for the target type.
    #[error("invalid value")]
    InvalidValue,
}

/// Trait for types that can be decoded from canonical RLP.
pub trait Decode: Sized {
    /// Reads one RLP item from the input and advances the slice past it.
    fn decode(input: &mut &[u8]) -> Result<Self, DecodeError>;

    /// Decodes a value from a byte slice, requiring all bytes to be consumed.
    fn from_bytes(data: &[u8]) -> Result<Self, DecodeError> {
        let mut input = data;
        let value = Self::decode(&mut input)?;

        if !input.is_empty() {
            return Err(DecodeError::TrailingBytes {
                remaining: input.len(),
            });
        }

        Ok(value)
    }
}

/// Prefix of one RLP item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemHeader {
    pub list: bool,
    pub payload_len: usize,
}

/// Minimal big-endian representation of `len`, without leading zeros.
fn be_len_bytes(len: usize) -> ([u8; 8], usize) {
    let bytes = (len as u64).to_be_bytes();
    let skip = bytes.iter().take_while(|b| **b == 0).count();
    (bytes, skip)
}

fn encode_header(offset: u8, payload_len: usize, out: &mut impl EncodeSink) {
    if payload_len <= SHORT_PAYLOAD_MAX {
        out.write(&[offset + payload_len as u8]);
    } else {
        let (bytes, skip) = be_len_bytes(payload_len);
        let len_of_len = bytes.len() - skip;
        out.write(&[offset + SHORT_PAYLOAD_MAX as u8 + len_of_len as u8]);
        out.write(&bytes[skip..]);
    }
}

/// Writes the prefix of a list whose items total `payload_len` bytes.
pub fn encode_list_header<S: EncodeSink>(payload_len: usize, out: &mut S) {
    encode_header(LIST_OFFSET, payload_len, out);
}

/// Length of a list prefix for the given payload length.
pub fn list_header_len(payload_len: usize) -> usize {
    let mut counter = SizeCounter::new();
    encode_list_header(payload_len, &mut counter);
    counter.len()
}

/// Writes `bytes` as an RLP string.
pub fn encode_bytes<S: EncodeSink>(bytes: &[u8], out: &mut S) {
    if bytes.len() == 1 && bytes[0] < STRING_OFFSET {
        out.write(bytes);
    } else {
        encode_header(STRING_OFFSET, bytes.len(), out);
        out.write(bytes);
    }
}

/// Writes a big-endian unsigned integer, stripping leading zero bytes.
fn encode_uint_be<S: EncodeSink>(be: &[u8], out: &mut S) {
    let skip = be.iter().take_while(|b| **b == 0).count();
    encode_bytes(&be[skip..], out);
}

/// Reads exactly `n` bytes from the input, advancing the slice.
fn read_bytes<'a>(input: &mut &'a [u8], n: usize) -> Result<&'a [u8], DecodeError> {
    if input.len() < n {
        return Err(DecodeError::UnexpectedEof);
    }
    let (bytes, rest) = input.split_at(n);
    *input = rest;
    Ok(bytes)
}

/// Reads a long-form size of `len_of_len` bytes and checks it is canonical.
fn read_long_size(input: &mut &[u8], len_of_len: usize) -> Result<usize, DecodeError> {
    let bytes = read_bytes(input, len_of_len)?;
    if bytes[0] == 0 {
        return Err(DecodeError::NonCanonicalSize);
    }
    if len_of_len > std::mem::size_of::<usize>() {
        return Err(DecodeError::LengthOverflow);
    }
    let size = bytes
        .iter()
        .fold(0usize, |acc, b| (acc << 8) | usize::from(*b));
    if size <= SHORT_PAYLOAD_MAX {
        return Err(DecodeError::NonCanonicalSize);
    }
    Ok(size)
}

/// Reads an item prefix and advances the input past it.
///
/// A single byte below `0x80` is reported as a one-byte string payload and
/// the input is left pointing at that byte.
pub fn decode_header(input: &mut &[u8]) -> Result<ItemHeader, DecodeError> {
    let first = *input.first().ok_or(DecodeError::UnexpectedEof)?;
    let header = match first {
        0x00..=0x7f => {
            return Ok(ItemHeader {
                list: false,
                payload_len: 1,
            });
        }
        0x80..=0xb7 => {
            *input = &input[1..];
            let payload_len = usize::from(first - STRING_OFFSET);
            if payload_len == 1 {
                let byte = *input.first().ok_or(DecodeError::UnexpectedEof)?;
                if byte < STRING_OFFSET {
                    return Err(DecodeError::NonCanonicalSize);
                }
            }
            ItemHeader {
                list: false,
                payload_len,
            }
        }
        0xb8..=0xbf => {
            *input = &input[1..];
            let len_of_len = usize::from(first - 0xb7);
            ItemHeader {
                list: false,
                payload_len: read_long_size(input, len_of_len)?,
            }
        }
        0xc0..=0xf7 => {
            *input = &input[1..];
            ItemHeader {
                list: true,
                payload_len: usize::from(first - LIST_OFFSET),
            }
        }
        0xf8..=0xff => {
            *input = &input[1..];
            let len_of_len = usize::from(first - 0xf7);
            ItemHeader {
                list: true,
                payload_len: read_long_size(input, len_of_len)?,
            }
        }
    };

    if header.payload_len > input.len() {
        return Err(DecodeError::UnexpectedEof);
    }
    Ok(header)
}

/// Reads a string item and returns its payload.
pub fn decode_bytes<'a>(input: &mut &'a [u8]) -> Result<&'a [u8], DecodeError> {
    let header = decode_header(input)?;
    if header.list {
        return Err(DecodeError::ExpectedString);
    }
    read_bytes(input, header.payload_len)
}

/// Reads a list item and returns its payload for field-by-field decoding.
pub fn decode_list_payload<'a>(input: &mut &'a [u8]) -> Result<&'a [u8], DecodeError> {
    let header = decode_header(input)?;
    if !header.list {
        return Err(DecodeError::ExpectedList);
    }
    read_bytes(input, header.payload_len)
}

/// Fails if a list payload still holds items after all fields were read.
pub fn ensure_list_consumed(payload: &[u8]) -> Result<(), DecodeError> {
    if payload.is_empty() {
        Ok(())
    } else {
        Err(DecodeError::ListTooLong {
            remaining: payload.len(),
        })
    }
}

/// Reads a canonical unsigned integer of at most `max_len` bytes.
fn decode_uint_bytes<'a>(
    input: &mut &'a [u8],
    max_len: usize,
    type_name: &'static str,
) -> Result<&'a [u8], DecodeError> {
    let bytes = decode_bytes(input)?;
    if bytes.first() == Some(&0) {
        return Err(DecodeError::NonCanonicalInteger);
    }
    if bytes.len() > max_len {
        return Err(DecodeError::IntegerOverflow { type_name });
    }
    Ok(bytes)
}

macro_rules! impl_uint {
    ($($t:ty),*) => {
        $(
            impl Encode for $t {
                fn encode<S: EncodeSink>(&self, out: &mut S) {
                    encode_uint_be(&self.to_be_bytes(), out);
                }
            }

            impl Decode for $t {
                fn decode(input: &mut &[u8]) -> Result<Self, DecodeError> {
                    let bytes = decode_uint_bytes(
                        input,
                        std::mem::size_of::<$t>(),
                        stringify!($t),
                    )?;
                    Ok(bytes.iter().fold(0, |acc: $t, b| (acc << 8) | <$t>::from(*b)))
                }
            }
        )*
    };
}

impl_uint!(u16, u32, u64);

impl Encode for u8 {
    fn encode<S: EncodeSink>(&self, out: &mut S) {
        encode_uint_be(&[*self], out);
    }
}

impl Decode for u8 {
    fn decode(input: &mut &[u8]) -> Result<Self, DecodeError> {
        let bytes = decode_uint_bytes(input, 1, "u8")?;
        Ok(bytes.first().copied().unwrap_or(0))
    }
}

// Unbounded integers share the unsigned integer rules with no size limit.
impl Encode for BigUint {
    fn encode<S: EncodeSink>(&self, out: &mut S) {
        encode_uint_be(&self.to_bytes_be(), out);
    }
}

impl Decode for BigUint {
    fn decode(input: &mut &[u8]) -> Result<Self, DecodeError> {
        let bytes = decode_uint_bytes(input, usize::MAX, "BigUint")?;
        Ok(BigUint::from_bytes_be(bytes))
    }
}

// Fixed-size byte arrays are strings of exactly N bytes.
impl<const N: usize> Encode for [u8; N] {
    fn encode<S: EncodeSink>(&self, out: &mut S) {
        encode_bytes(self, out);
    }
}

impl<const N: usize> Decode for [u8; N] {
    fn decode(input: &mut &[u8]) -> Result<Self, DecodeError> {
        let bytes = decode_bytes(input)?;
        bytes.try_into().map_err(|_| DecodeError::InvalidLength {
            type_name: "byte array",
            expected: N,
            actual: bytes.len(),
        })
    }
}

// Slices and vectors of encodable items are lists.
impl<T: Encode> Encode for [T] {
    fn encode<S: EncodeSink>(&self, out: &mut S) {
        let payload_len: usize = self.iter().map(Encode::encoded_len).sum();
        encode_list_header(payload_len, out);
        for item in self {
            item.encode(out);
        }
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode<S: EncodeSink>(&self, out: &mut S) {
        self.as_slice().encode(out);
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn decode(input: &mut &[u8]) -> Result<Self, DecodeError> {
        let mut payload = decode_list_payload(input)?;
        let mut items = Vec::new();
        while !payload.is_empty() {
            if items.len() == MAX_LIST_ITEMS {
                return Err(DecodeError::LengthOverflow);
            }
            items.push(T::decode(&mut payload)?);
        }
        Ok(items)
    }
}

impl<T: Encode + ?Sized> Encode for &T {
    fn encode<S: EncodeSink>(&self, out: &mut S) {
        (**self).encode(out);
    }
}

impl<T: Encode + ?Sized> Encode for std::sync::Arc<T> {
    fn encode<S: EncodeSink>(&self, out: &mut S) {
        (**self).encode(out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========== Integer Tests ==========

    #[test]
    fn uint_small_values_are_single_bytes() {
        assert_eq!(0u64.to_bytes(), vec![0x80]);
        assert_eq!(1u64.to_bytes(), vec![0x01]);
        assert_eq!(0x7fu64.to_bytes(), vec![0x7f]);
        assert_eq!(0x80u64.to_bytes(), vec![0x81, 0x80]);
    }

    #[test]
    fn uint_uses_minimal_big_endian() {
        assert_eq!(1024u64.to_bytes(), vec![0x82, 0x04, 0x00]);
        assert_eq!(0xffffu16.to_bytes(), vec![0x82, 0xff, 0xff]);
        assert_eq!(
            u64::MAX.to_bytes(),
            vec![0x88, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]
        );
    }

    #[test]
    fn uint_rejects_leading_zeros() {
        let result = u64::from_bytes(&[0x82, 0x00, 0x01]);
        assert_eq!(result, Err(DecodeError::NonCanonicalInteger));

        let result = u64::from_bytes(&[0x00]);
        assert_eq!(result, Err(DecodeError::NonCanonicalInteger));
    }

    #[test]
    fn uint_rejects_wrapped_single_byte() {
        let result = u64::from_bytes(&[0x81, 0x05]);
        assert_eq!(result, Err(DecodeError::NonCanonicalSize));
    }

    #[test]
    fn uint_overflow_is_reported() {
        let bytes = 0x1_0000u32.to_bytes();
        let result = u16::from_bytes(&bytes);
        assert_eq!(result, Err(DecodeError::IntegerOverflow { type_name: "u16" }));
    }

    #[test]
    fn biguint_beyond_64_bits() {
        let value = BigUint::from(u64::MAX) * BigUint::from(u64::MAX);
        let bytes = value.to_bytes();
        assert_eq!(bytes[0], 0x80 + 16);
        assert_eq!(BigUint::from_bytes(&bytes).unwrap(), value);
        assert_eq!(BigUint::from(0u8).to_bytes(), vec![0x80]);
    }

    // ========== String Tests ==========

    #[test]
    fn long_string_uses_length_of_length() {
        let data = [0xaau8; 56];
        let bytes = data.to_bytes();
        assert_eq!(&bytes[..2], &[0xb8, 56]);
        assert_eq!(bytes.len(), 58);
        assert_eq!(<[u8; 56]>::from_bytes(&bytes).unwrap(), data);
    }

    #[test]
    fn long_form_for_short_payload_is_rejected() {
        let mut bytes = vec![0xb8, 2];
        bytes.extend_from_slice(&[0xaa, 0xbb]);
        assert_eq!(decode_bytes(&mut bytes.as_slice()), Err(DecodeError::NonCanonicalSize));
    }

    #[test]
    fn fixed_array_length_mismatch() {
        let bytes = [1u8; 4].to_bytes();
        let result = <[u8; 8]>::from_bytes(&bytes);
        assert!(matches!(
            result,
            Err(DecodeError::InvalidLength {
                expected: 8,
                actual: 4,
                ..
            })
        ));
    }

    // ========== List Tests ==========

    #[test]
    fn list_of_uints() {
        let list: Vec<u64> = vec![1, 2, 3];
        assert_eq!(list.to_bytes(), vec![0xc3, 0x01, 0x02, 0x03]);
        assert_eq!(Vec::<u64>::from_bytes(&[0xc3, 0x01, 0x02, 0x03]).unwrap(), list);
    }

    #[test]
    fn empty_list() {
        let list: Vec<u64> = Vec::new();
        assert_eq!(list.to_bytes(), vec![0xc0]);
    }

    #[test]
    fn list_where_string_expected() {
        let result = u64::from_bytes(&[0xc0]);
        assert_eq!(result, Err(DecodeError::ExpectedString));
    }

    #[test]
    fn string_where_list_expected() {
        let result = Vec::<u64>::from_bytes(&[0x80]);
        assert_eq!(result, Err(DecodeError::ExpectedList));
    }

    #[test]
    fn list_header_len_matches_encoding() {
        assert_eq!(list_header_len(0), 1);
        assert_eq!(list_header_len(55), 1);
        assert_eq!(list_header_len(56), 2);
        assert_eq!(list_header_len(1 << 16), 4);
    }

    // ========== Error Handling Tests ==========

    #[test]
    fn truncated_input() {
        assert_eq!(u64::from_bytes(&[]), Err(DecodeError::UnexpectedEof));
        assert_eq!(u64::from_bytes(&[0x82, 0x04]), Err(DecodeError::UnexpectedEof));
        assert_eq!(
            Vec::<u64>::from_bytes(&[0xc3, 0x01]),
            Err(DecodeError::UnexpectedEof)
        );
    }

    #[test]
    fn trailing_bytes_error() {
        let result = u64::from_bytes(&[0x05, 0x06]);
        assert_eq!(result, Err(DecodeError::TrailingBytes { remaining: 1 }));
    }

    #[test]
    fn decode_advances_input() {
        let mut input: &[u8] = &[0x05, 0x82, 0x04, 0x00];
        assert_eq!(u64::decode(&mut input).unwrap(), 5);
        assert_eq!(input.len(), 3);
        assert_eq!(u64::decode(&mut input).unwrap(), 1024);
        assert!(input.is_empty());
    }

    #[test]
    fn size_counter_matches_buffer() {
        let list: Vec<u64> = (0..100).collect();
        let mut counter = SizeCounter::new();
        list.encode(&mut counter);
        assert_eq!(counter.len(), list.to_bytes().len());
    }
}
