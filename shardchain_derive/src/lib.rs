//! Derive macros for the shardchain crate.
//!
//! Provides `#[derive(RlpCodec)]`, which implements the canonical list codec
//! for structs whose fields are encoded in declaration order.

mod rlp_codec;

use proc_macro::TokenStream;

/// Implements `Encode` and `Decode` as an RLP list of the struct's fields.
///
/// Fields marked `#[rlp(skip)]` are left out of the encoding and rebuilt with
/// `Default::default()` when decoding.
#[proc_macro_derive(RlpCodec, attributes(rlp))]
pub fn derive_rlp_codec(input: TokenStream) -> TokenStream {
    rlp_codec::derive_rlp_codec(input)
}
