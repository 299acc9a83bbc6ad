//! Attribute macros that attach the derives the searchload metric pipeline expects.
//!
//! Both macros add `Serialize`, `Deserialize`, `PartialEq`, `PartialOrd`, `Debug` and
//! `Clone`. `#[metric]` additionally implements `searchload::Metric`, and
//! `#[aggregate]` adds `Default` so an empty aggregate is one call away.
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{ItemStruct, parse_macro_input};

extern crate proc_macro;

fn pipeline_derives(ast: &ItemStruct, extra: TokenStream2) -> TokenStream2 {
    quote! {
        #[derive(
            ::serde::Serialize,
            ::serde::Deserialize,
            ::std::cmp::PartialOrd,
            ::std::cmp::PartialEq,
            ::std::fmt::Debug,
            ::std::clone::Clone,
            #extra
        )]
        #ast
    }
}

/// Marks a struct as a single measured sample.
#[proc_macro_attribute]
pub fn metric(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(item as ItemStruct);
    let ident = &ast.ident;
    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();
    let derived = pipeline_derives(&ast, TokenStream2::new());

    TokenStream::from(quote! {
        #derived

        impl #impl_generics ::searchload::Metric for #ident #ty_generics #where_clause {}
    })
}

/// Marks a struct as a mergeable collection of samples.
#[proc_macro_attribute]
pub fn aggregate(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(item as ItemStruct);
    TokenStream::from(pipeline_derives(&ast, quote!(::std::default::Default)))
}
