// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Attribute parsing for `#[pipevet::func(...)]` and `anon!(...)`.

use syn::parse::{Parse, ParseStream};
use syn::{Expr, LitStr, Result, Token};

/// Parsed arguments of `#[pipevet::func(...)]`.
#[derive(Debug, Default)]
pub struct FuncAttributes {
    /// Stable key replacing the derived qualified name: `key = "..."`
    pub key: Option<LitStr>,
    /// `reachable`: the function's module path is public from the crate
    /// root, so generated code may name generic instantiations directly.
    pub reachable: bool,
}

/// Keys end up in generated comments and string literals; they must be
/// non-empty and free of control characters.
fn check_key(key: &LitStr) -> Result<()> {
    let value = key.value();
    if value.is_empty() {
        return Err(syn::Error::new_spanned(key, "key must not be empty"));
    }
    if value.chars().any(char::is_control) {
        return Err(syn::Error::new_spanned(
            key,
            "key must not contain control characters",
        ));
    }
    Ok(())
}

impl FuncAttributes {
    pub fn parser(&mut self) -> impl syn::parse::Parser<Output = ()> + '_ {
        syn::meta::parser(move |meta| {
            if meta.path.is_ident("key") {
                let value: LitStr = meta.value()?.parse()?;
                check_key(&value)?;
                self.key = Some(value);
                return Ok(());
            }
            if meta.path.is_ident("reachable") {
                self.reachable = true;
                return Ok(());
            }
            Err(meta.error(
                "unsupported pipevet::func argument; expected `key = \"...\"` or `reachable`",
            ))
        })
    }
}

/// Arguments of `anon!([key = "...",] closure)`.
pub struct AnonArgs {
    pub key: Option<LitStr>,
    pub function: Expr,
}

impl Parse for AnonArgs {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut key = None;
        if input.peek(syn::Ident) && input.peek2(Token![=]) {
            let ident: syn::Ident = input.parse()?;
            if ident != "key" {
                return Err(syn::Error::new(ident.span(), "expected `key = \"...\"`"));
            }
            input.parse::<Token![=]>()?;
            let value = input.parse::<LitStr>()?;
            check_key(&value)?;
            key = Some(value);
            input.parse::<Token![,]>()?;
        }
        let function: Expr = input.parse()?;
        if input.peek(Token![,]) {
            input.parse::<Token![,]>()?;
        }
        if !input.is_empty() {
            return Err(input.error("anon! takes one function, optionally preceded by `key = \"...\",`"));
        }
        Ok(Self { key, function })
    }
}
