//! Derive macro for the canonical RLP list codec.
//!
//! A struct is encoded as one RLP list whose items are its fields, in
//! declaration order. Field order is therefore part of the wire format and
//! must never be changed for an existing type.
//!
//! # Supported Types
//!
//! - **Named structs**: `struct Header { shard_id: u16, number: BigUint }`
//! - **Tuple structs**: `struct Pair(u64, Hash)`
//!
//! Unit structs, enums and unions have no canonical list shape and are
//! rejected at compile time.
//!
//! # Field Attributes
//!
//! - `#[rlp(skip)]`: the field is not encoded; decoding fills it with
//!   `Default::default()`. Used for lazily computed caches.

use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Field, Fields, parse_macro_input};

/// Derives `Encode` and `Decode` for a struct.
///
/// # Generated Code
///
/// ```ignore
/// impl Encode for Log {
///     fn encode<S: EncodeSink>(&self, out: &mut S) {
///         let payload_len = self.address.encoded_len() + self.topics.encoded_len();
///         encode_list_header(payload_len, out);
///         self.address.encode(out);
///         self.topics.encode(out);
///     }
/// }
///
/// impl Decode for Log {
///     fn decode(input: &mut &[u8]) -> Result<Self, DecodeError> {
///         let mut payload = decode_list_payload(input)?;
///         let value = Self {
///             address: Decode::decode(&mut payload)?,
///             topics: Decode::decode(&mut payload)?,
///         };
///         ensure_list_consumed(payload)?;
///         Ok(value)
///     }
/// }
/// ```
pub fn derive_rlp_codec(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand(&input) {
        Ok(tokens) => TokenStream::from(tokens),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let data_struct = match &input.data {
        Data::Struct(data_struct) => data_struct,
        Data::Enum(_) => {
            return Err(syn::Error::new_spanned(
                input,
                "RlpCodec derive does not support enums",
            ));
        }
        Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                input,
                "RlpCodec derive does not support unions",
            ));
        }
    };

    let members = collect_members(&data_struct.fields, input)?;

    let encoded: Vec<_> = members
        .iter()
        .filter(|m| !m.skip)
        .map(|m| &m.accessor)
        .collect();

    let payload_terms = encoded.iter().map(|accessor| {
        quote! { crate::types::encoding::Encode::encoded_len(&self.#accessor) }
    });
    let encode_fields = encoded.iter().map(|accessor| {
        quote! { crate::types::encoding::Encode::encode(&self.#accessor, out); }
    });

    let decode_body = match &data_struct.fields {
        Fields::Named(_) => {
            let inits = members.iter().map(|m| {
                let accessor = &m.accessor;
                if m.skip {
                    quote! { #accessor: ::std::default::Default::default(), }
                } else {
                    quote! { #accessor: crate::types::encoding::Decode::decode(&mut payload)?, }
                }
            });
            quote! { Self { #(#inits)* } }
        }
        _ => {
            let inits = members.iter().map(|m| {
                if m.skip {
                    quote! { ::std::default::Default::default(), }
                } else {
                    quote! { crate::types::encoding::Decode::decode(&mut payload)?, }
                }
            });
            quote! { Self( #(#inits)* ) }
        }
    };

    Ok(quote! {
        impl #impl_generics crate::types::encoding::Encode for #name #ty_generics #where_clause {
            fn encode<S: crate::types::encoding::EncodeSink>(&self, out: &mut S) {
                let payload_len: usize = 0 #(+ #payload_terms)*;
                crate::types::encoding::encode_list_header(payload_len, out);
                #(#encode_fields)*
            }
        }

        impl #impl_generics crate::types::encoding::Decode for #name #ty_generics #where_clause {
            fn decode(input: &mut &[u8]) -> ::std::result::Result<Self, crate::types::encoding::DecodeError> {
                let mut payload = crate::types::encoding::decode_list_payload(input)?;
                let value = #decode_body;
                crate::types::encoding::ensure_list_consumed(payload)?;
                Ok(value)
            }
        }
    })
}

/// A struct field as seen by the codec: how to reach it and whether it is
/// part of the encoding.
struct Member {
    accessor: proc_macro2::TokenStream,
    skip: bool,
}

fn collect_members(fields: &Fields, input: &DeriveInput) -> syn::Result<Vec<Member>> {
    match fields {
        Fields::Named(named) => named
            .named
            .iter()
            .map(|f| {
                let ident = &f.ident;
                Ok(Member {
                    accessor: quote! { #ident },
                    skip: has_skip_attr(f)?,
                })
            })
            .collect(),
        Fields::Unnamed(unnamed) => unnamed
            .unnamed
            .iter()
            .enumerate()
            .map(|(i, f)| {
                let idx = syn::Index::from(i);
                Ok(Member {
                    accessor: quote! { #idx },
                    skip: has_skip_attr(f)?,
                })
            })
            .collect(),
        Fields::Unit => Err(syn::Error::new_spanned(
            input,
            "RlpCodec derive needs at least one field; unit structs have no list encoding",
        )),
    }
}

/// Returns true for `#[rlp(skip)]`; any other `rlp` option is an error.
fn has_skip_attr(field: &Field) -> syn::Result<bool> {
    let mut skip = false;
    for attr in &field.attrs {
        if !attr.path().is_ident("rlp") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                skip = true;
                Ok(())
            } else {
                Err(meta.error("unsupported rlp attribute; expected #[rlp(skip)]"))
            }
        })?;
    }
    Ok(skip)
}
