//! `0x`-prefixed hexadecimal text encoding.
//!
//! This is the human and JSON facing form of hashes, addresses, nonces,
//! filters, byte strings and quantities. Output is always lowercase; input
//! accepts either case but must carry the `0x` prefix.
//!
//! Quantities (integers) are written without leading zero digits, with zero
//! written as `0x0`. Fixed-size values must have exactly twice their byte
//! length in hex digits.

use num_bigint::BigUint;

/// Errors produced when parsing hex text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TextError {
    #[error("hex string without 0x prefix")]
    MissingPrefix,
    #[error("hex string of odd length")]
    OddLength,
    #[error("invalid hex string")]
    InvalidHex,
    #[error("hex string has length {actual}, want {expected} for {type_name}")]
    InvalidLength {
        type_name: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("hex string \"0x\"")]
    EmptyNumber,
    #[error("hex number with leading zero digits")]
    LeadingZeroDigits,
    #[error("hex number > 64 bits")]
    UintOverflow,
    #[error("hex number > 256 bits")]
    BigOverflow,
}

/// Widest accepted big quantity, in hex digits.
const MAX_BIG_DIGITS: usize = 64;

fn strip_prefix(input: &str) -> Result<&str, TextError> {
    input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .ok_or(TextError::MissingPrefix)
}

fn map_hex_error(err: hex::FromHexError) -> TextError {
    match err {
        hex::FromHexError::OddLength => TextError::OddLength,
        _ => TextError::InvalidHex,
    }
}

/// Encodes bytes as `0x`-prefixed lowercase hex.
pub fn encode(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Decodes `0x`-prefixed hex of any even length.
pub fn decode(input: &str) -> Result<Vec<u8>, TextError> {
    hex::decode(strip_prefix(input)?).map_err(map_hex_error)
}

/// Decodes `0x`-prefixed hex into `out`, which fixes the expected length.
///
/// `type_name` labels the error so callers can tell which field was wrong.
pub fn decode_fixed(type_name: &'static str, input: &str, out: &mut [u8]) -> Result<(), TextError> {
    let raw = strip_prefix(input)?;
    if raw.len() != out.len() * 2 {
        return Err(TextError::InvalidLength {
            type_name,
            expected: out.len() * 2,
            actual: raw.len(),
        });
    }
    hex::decode_to_slice(raw, out).map_err(map_hex_error)
}

/// Checks the quantity rules shared by all integer widths and returns the digits.
fn quantity_digits(input: &str) -> Result<&str, TextError> {
    let raw = strip_prefix(input)?;
    if raw.is_empty() {
        return Err(TextError::EmptyNumber);
    }
    if raw.len() > 1 && raw.starts_with('0') {
        return Err(TextError::LeadingZeroDigits);
    }
    if !raw.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(TextError::InvalidHex);
    }
    Ok(raw)
}

/// Encodes an unbounded integer as a hex quantity.
pub fn encode_big(value: &BigUint) -> String {
    format!("0x{value:x}")
}

/// Decodes a hex quantity of at most 256 bits.
pub fn decode_big(input: &str) -> Result<BigUint, TextError> {
    let raw = quantity_digits(input)?;
    if raw.len() > MAX_BIG_DIGITS {
        return Err(TextError::BigOverflow);
    }
    BigUint::parse_bytes(raw.as_bytes(), 16).ok_or(TextError::InvalidHex)
}

/// Encodes a 64-bit integer as a hex quantity.
pub fn encode_uint64(value: u64) -> String {
    format!("0x{value:x}")
}

/// Decodes a hex quantity that must fit in 64 bits.
pub fn decode_uint64(input: &str) -> Result<u64, TextError> {
    let raw = quantity_digits(input)?;
    if raw.len() > 16 {
        return Err(TextError::UintOverflow);
    }
    u64::from_str_radix(raw, 16).map_err(|_| TextError::InvalidHex)
}

/// Serde adapter for `BigUint` fields written as hex quantities.
pub mod big_quantity {
    use num_bigint::BigUint;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::encode_big(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigUint, D::Error> {
        let text = String::deserialize(deserializer)?;
        super::decode_big(&text).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for `u64` fields written as hex quantities.
pub mod uint64_quantity {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::encode_uint64(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        let text = String::deserialize(deserializer)?;
        super::decode_uint64(&text).map_err(serde::de::Error::custom)
    }
}

/// Implements hex text, serde and canonical codec support for a
/// `struct Name(pub [u8; LEN])` newtype.
macro_rules! impl_fixed_bytes {
    ($name:ident, $len:expr, $label:literal) => {
        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(&$crate::types::hexutil::encode(&self.0))
            }
        }

        impl ::std::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, "{}({})", $label, self)
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::types::hexutil::TextError;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                let mut out = [0u8; $len];
                $crate::types::hexutil::decode_fixed($label, s, &mut out)?;
                Ok($name(out))
            }
        }

        impl ::std::convert::From<[u8; $len]> for $name {
            fn from(bytes: [u8; $len]) -> Self {
                $name(bytes)
            }
        }

        impl ::std::convert::AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl $crate::types::encoding::Encode for $name {
            fn encode<S: $crate::types::encoding::EncodeSink>(&self, out: &mut S) {
                $crate::types::encoding::encode_bytes(&self.0, out);
            }
        }

        impl $crate::types::encoding::Decode for $name {
            fn decode(
                input: &mut &[u8],
            ) -> ::std::result::Result<Self, $crate::types::encoding::DecodeError> {
                let bytes = $crate::types::encoding::decode_bytes(input)?;
                let array: [u8; $len] = bytes.try_into().map_err(|_| {
                    $crate::types::encoding::DecodeError::InvalidLength {
                        type_name: $label,
                        expected: $len,
                        actual: bytes.len(),
                    }
                })?;
                Ok($name(array))
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S: ::serde::Serializer>(
                &self,
                serializer: S,
            ) -> ::std::result::Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D: ::serde::Deserializer<'de>>(
                deserializer: D,
            ) -> ::std::result::Result<Self, D::Error> {
                let text = <::std::string::String as ::serde::Deserialize>::deserialize(deserializer)?;
                text.parse().map_err(::serde::de::Error::custom)
            }
        }
    };
}

pub(crate) use impl_fixed_bytes;
