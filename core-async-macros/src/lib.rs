//! Attribute macro backing `#[core_async::test]`.
//!
//! Turns an `async fn` test into a plain `#[test]` whose body is driven by
//! `core_async::runtime::block_on`, so crates using it never need a direct
//! Tokio dependency.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, ItemFn};

#[proc_macro_attribute]
pub fn test(attr: TokenStream, item: TokenStream) -> TokenStream {
    if !attr.is_empty() {
        return syn::Error::new_spanned(
            TokenStream2::from(attr),
            "#[core_async::test] does not take arguments",
        )
        .to_compile_error()
        .into();
    }

    let input = parse_macro_input!(item as ItemFn);

    if input.sig.asyncness.is_none() {
        return syn::Error::new_spanned(
            input.sig.fn_token,
            "#[core_async::test] requires `async fn`",
        )
        .to_compile_error()
        .into();
    }

    let ItemFn {
        attrs,
        vis,
        mut sig,
        block,
    } = input;
    sig.asyncness = None;

    quote! {
        #(#attrs)*
        #[test]
        #vis #sig {
            core_async::runtime::block_on(async move #block)
        }
    }
    .into()
}
