use proc_macro2::TokenStream;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Fields, LitStr};

pub fn derive_token(ast: &DeriveInput) -> syn::Result<TokenStream> {
    let name = &ast.ident;
    let variants = match &ast.data {
        Data::Enum(data) => &data.variants,
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "`Token` can only be derived for enums",
            ))
        }
    };

    let kind = token_attr(&ast.attrs, "kind")?
        .unwrap_or_else(|| snake_case(&name.to_string()).replace('_', " "));

    let mut idents = Vec::with_capacity(variants.len());
    let mut names = Vec::with_capacity(variants.len());
    for variant in variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                variant,
                "`Token` variants cannot carry data",
            ));
        }
        let token = token_attr(&variant.attrs, "rename")?
            .unwrap_or_else(|| snake_case(&variant.ident.to_string()));
        idents.push(&variant.ident);
        names.push(token);
    }

    let gen = quote! {
        impl ::cardlay::token::Token for #name {
            const KIND: &'static str = #kind;
            const ALL: &'static [Self] = &[#(Self::#idents),*];

            fn as_str(&self) -> &'static str {
                match self {
                    #(Self::#idents => #names,)*
                }
            }
        }

        impl ::std::str::FromStr for #name {
            type Err = ::cardlay::token::UnknownToken;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s {
                    #(#names => ::std::result::Result::Ok(Self::#idents),)*
                    _ => ::std::result::Result::Err(::cardlay::token::UnknownToken::new(#kind, s)),
                }
            }
        }

        impl ::std::fmt::Display for #name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(::cardlay::token::Token::as_str(self))
            }
        }
    };
    Ok(gen)
}

fn token_attr(attrs: &[Attribute], key: &str) -> syn::Result<Option<String>> {
    let mut value = None;
    for attr in attrs.iter().filter(|a| a.path().is_ident("token")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident(key) {
                let lit: LitStr = meta.value()?.parse()?;
                value = Some(lit.value());
                Ok(())
            } else {
                Err(meta.error(format!("expected `{key} = \"...\"`")))
            }
        })?;
    }
    Ok(value)
}

fn snake_case(ident: &str) -> String {
    let mut out = String::with_capacity(ident.len() + 4);
    for (i, c) in ident.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
