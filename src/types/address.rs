//! 20-byte account addresses.

use crate::types::encoding::{Decode, DecodeError, Encode, EncodeSink, decode_header};
use crate::types::hexutil::impl_fixed_bytes;

/// Address length in bytes.
pub const ADDRESS_LEN: usize = 20;

/// Fixed-size 20-byte address identifying an account, such as a block's
/// coinbase or a transaction recipient.
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash, Ord, PartialOrd)]
pub struct Address(pub [u8; ADDRESS_LEN]);

impl_fixed_bytes!(Address, ADDRESS_LEN, "Address");

impl Address {
    /// Creates the all-zero address.
    pub const fn zero() -> Address {
        Address([0u8; ADDRESS_LEN])
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

// An absent address (contract creation) is written as the empty string.
impl Encode for Option<Address> {
    fn encode<S: EncodeSink>(&self, out: &mut S) {
        match self {
            None => out.write(&[0x80]),
            Some(address) => address.encode(out),
        }
    }
}

impl Decode for Option<Address> {
    fn decode(input: &mut &[u8]) -> Result<Self, DecodeError> {
        let mut peek = *input;
        let header = decode_header(&mut peek)?;
        if !header.list && header.payload_len == 0 {
            *input = peek;
            return Ok(None);
        }
        Address::decode(input).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_encodes_as_empty_string() {
        let none: Option<Address> = None;
        assert_eq!(none.to_bytes(), vec![0x80]);
        assert_eq!(Option::<Address>::from_bytes(&[0x80]).unwrap(), None);
    }

    #[test]
    fn some_roundtrip() {
        let address = Some(Address([0x11; ADDRESS_LEN]));
        let bytes = address.to_bytes();
        assert_eq!(bytes.len(), 21);
        assert_eq!(Option::<Address>::from_bytes(&bytes).unwrap(), address);
    }

    #[test]
    fn short_address_is_rejected() {
        let bytes = [0x11u8; 19].to_bytes();
        assert!(matches!(
            Address::from_bytes(&bytes),
            Err(DecodeError::InvalidLength {
                type_name: "Address",
                expected: 20,
                actual: 19
            })
        ));
    }

    #[test]
    fn hex_text_roundtrip() {
        let text = "0x00000000000000000000000000000000deadbeef";
        let address: Address = text.parse().unwrap();
        assert_eq!(address.0[16..], [0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(address.to_string(), text);
    }
}
