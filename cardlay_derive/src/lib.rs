extern crate proc_macro;

mod expand;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives `cardlay::token::Token`, `FromStr` and `Display` for a fieldless enum.
///
/// Variant names default to snake case; use `#[token(rename = "...")]` to
/// override one, and `#[token(kind = "...")]` on the enum to name the
/// enumeration in error messages.
#[proc_macro_derive(Token, attributes(token))]
pub fn token(input: TokenStream) -> TokenStream {
    let ast: DeriveInput = parse_macro_input!(input);
    expand::derive_token(&ast)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
