//! `#[derive(NodeKey)]`: generate the field-joining boilerplate for a
//! `Node::key()` implementation.
//!
//! This does not derive the whole `Node` trait — tiers, version, and tags
//! are class-level policy a macro should not guess at — only the
//! deterministic "join my fields into a string" part that every node ends
//! up writing by hand otherwise. A node impl calls `self.derived_key()`
//! from its `Node::key` method.

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, LitStr};

#[proc_macro_derive(NodeKey, attributes(node_key))]
pub fn derive_node_key(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let mut separator = ":".to_string();
    for attr in &input.attrs {
        if attr.path().is_ident("node_key") {
            let _ = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("separator") {
                    let value = meta.value()?;
                    let s: LitStr = value.parse()?;
                    separator = s.value();
                    Ok(())
                } else {
                    Err(meta.error("unsupported attribute"))
                }
            });
        }
    }

    let key_gen = match &input.data {
        Data::Struct(data) => {
            let fields = match &data.fields {
                Fields::Named(fields) => &fields.named,
                Fields::Unnamed(fields) => &fields.unnamed,
                Fields::Unit => return unit_struct_key(name),
            };

            let mut key_parts = Vec::new();
            for (i, field) in fields.iter().enumerate() {
                let mut skip = false;
                for attr in &field.attrs {
                    if attr.path().is_ident("node_key") {
                        let _ = attr.parse_nested_meta(|meta| {
                            if meta.path.is_ident("skip") {
                                skip = true;
                            }
                            Ok(())
                        });
                    }
                }
                if !skip {
                    if let Some(ident) = &field.ident {
                        key_parts.push(quote! { self.#ident.to_string() });
                    } else {
                        let index = syn::Index::from(i);
                        key_parts.push(quote! { self.#index.to_string() });
                    }
                }
            }

            if key_parts.is_empty() {
                quote! { String::new() }
            } else {
                quote! {
                    let parts: Vec<String> = vec![#(#key_parts),*];
                    parts.join(#separator)
                }
            }
        }
        _ => {
            return syn::Error::new_spanned(name, "NodeKey derive only supports structs")
                .to_compile_error()
                .into();
        }
    };

    let expanded = quote! {
        impl #name {
            /// Join the struct's fields (in declaration order, skipping any
            /// marked `#[node_key(skip)]`) into this node's key.
            pub fn derived_key(&self) -> String {
                #key_gen
            }
        }
    };

    TokenStream::from(expanded)
}

/// A unit struct has no fields to join, so its key is always empty — no
/// `self.#field` access is generated at all, just the fixed impl.
fn unit_struct_key(name: &syn::Ident) -> TokenStream {
    let expanded = quote! {
        impl #name {
            pub fn derived_key(&self) -> String {
                String::new()
            }
        }
    };

    TokenStream::from(expanded)
}
