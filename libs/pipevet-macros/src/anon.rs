// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Rewriting of `anon!(..)` invocations inside a `#[pipevet::func]` body.
//!
//! Ordinals follow source order: a pre-order walk of the body numbers each
//! `anon!` before anything nested inside it.

use proc_macro2::TokenStream;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::visit_mut::{self, VisitMut};
use syn::{Block, Expr, Macro, Stmt, Token};

use crate::attributes::AnonArgs;

pub struct AnonRewriter {
    scope: String,
    next_ordinal: u32,
    errors: Vec<syn::Error>,
}

impl AnonRewriter {
    pub fn new(scope: String) -> Self {
        Self {
            scope,
            next_ordinal: 1,
            errors: Vec::new(),
        }
    }

    /// Rewrite every `anon!` in `block`; returns how many were found.
    pub fn rewrite(mut self, block: &mut Block) -> syn::Result<u32> {
        self.visit_block_mut(block);
        let mut errors = self.errors.into_iter();
        if let Some(mut first) = errors.next() {
            for error in errors {
                first.combine(error);
            }
            return Err(first);
        }
        Ok(self.next_ordinal - 1)
    }

    fn expand(&mut self, mac: &Macro) -> Option<Expr> {
        let args: AnonArgs = match mac.parse_body() {
            Ok(args) => args,
            Err(e) => {
                self.errors.push(e);
                return None;
            }
        };
        let ordinal = self.next_ordinal;
        self.next_ordinal += 1;

        let mut function = args.function;
        self.visit_expr_mut(&mut function);

        let scope = &self.scope;
        let key = match &args.key {
            Some(key) => quote!(::std::option::Option::Some(#key)),
            None => quote!(::std::option::Option::None),
        };
        Some(syn::parse_quote! {
            ::pipevet::Callable::anonymous(
                ::pipevet::identity::AnonSite {
                    module_path: ::std::module_path!(),
                    scope: #scope,
                    ordinal: #ordinal,
                    key: #key,
                },
                #function,
            )
        })
    }

    /// Rewrite `anon!` calls nested in the arguments of another macro, as
    /// in `vec![anon!(..), anon!(..)]`. Only bodies that parse as a comma
    /// separated expression list are touched.
    fn rewrite_nested(&mut self, mac: &mut Macro) {
        if !contains_anon(mac.tokens.clone()) {
            return;
        }
        let parser = Punctuated::<Expr, Token![,]>::parse_terminated;
        let Ok(mut exprs) = mac.parse_body_with(parser) else {
            return;
        };
        for expr in exprs.iter_mut() {
            self.visit_expr_mut(expr);
        }
        mac.tokens = quote!(#exprs);
    }
}

fn is_anon(mac: &Macro) -> bool {
    mac.path
        .segments
        .last()
        .is_some_and(|segment| segment.ident == "anon")
}

fn contains_anon(tokens: TokenStream) -> bool {
    tokens.into_iter().any(|tt| match tt {
        proc_macro2::TokenTree::Ident(ident) => ident == "anon",
        proc_macro2::TokenTree::Group(group) => contains_anon(group.stream()),
        _ => false,
    })
}

impl VisitMut for AnonRewriter {
    fn visit_expr_mut(&mut self, expr: &mut Expr) {
        if let Expr::Macro(expr_macro) = expr {
            if is_anon(&expr_macro.mac) {
                if let Some(rewritten) = self.expand(&expr_macro.mac) {
                    *expr = rewritten;
                }
                return;
            }
            self.rewrite_nested(&mut expr_macro.mac);
            return;
        }
        visit_mut::visit_expr_mut(self, expr);
    }

    fn visit_stmt_mut(&mut self, stmt: &mut Stmt) {
        if let Stmt::Macro(stmt_macro) = stmt {
            if is_anon(&stmt_macro.mac) {
                let semi = stmt_macro.semi_token;
                if let Some(rewritten) = self.expand(&stmt_macro.mac) {
                    *stmt = Stmt::Expr(rewritten, semi);
                }
                return;
            }
            self.rewrite_nested(&mut stmt_macro.mac);
            return;
        }
        visit_mut::visit_stmt_mut(self, stmt);
    }
}
