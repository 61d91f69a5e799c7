// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Code generation for `#[pipevet::func]`
//!
//! Emits the function unchanged (apart from `anon!` rewriting) followed by a
//! companion module of the same name and visibility:
//! - `declaration()` builds the function's `FnDecl`
//! - `callable()` binds it as a `Callable`
//! - a `SymbolEntry` registration for non-generic functions

use proc_macro2::TokenStream;
use quote::quote;

use crate::analysis::FuncAnalysis;

pub fn generate_func_module(analysis: &FuncAnalysis) -> TokenStream {
    let item = &analysis.item;
    let fn_name = &item.sig.ident;
    let fn_name_str = fn_name.to_string();
    let vis = &item.vis;
    let visibility = analysis.visibility.variant();

    let key = match &analysis.attrs.key {
        Some(key) => quote!(::std::option::Option::Some(#key)),
        None => quote!(::std::option::Option::None),
    };

    let reachable = analysis.attrs.reachable;

    let params = &analysis.param_types;
    let output = &analysis.output_type;
    let type_params = &analysis.type_params;
    let type_idents: Vec<_> = type_params.iter().map(|tp| &tp.ident).collect();
    let where_clause = &item.sig.generics.where_clause;

    let (generics, turbofish) = if analysis.is_generic() {
        (quote!(<#(#type_params),*>), quote!(::<#(#type_idents),*>))
    } else {
        (quote!(), quote!())
    };

    let symbol_registration = if analysis.is_generic() {
        quote! {}
    } else {
        quote! {
            ::pipevet::inventory::submit! {
                ::pipevet::identity::SymbolEntry::new(declaration)
            }
        }
    };

    quote! {
        #item

        #[allow(non_snake_case, dead_code)]
        #vis mod #fn_name {
            #[allow(unused_imports)]
            use super::*;

            /// Identity of the function this module is named after.
            pub fn declaration #generics () -> ::pipevet::identity::FnDecl #where_clause {
                ::pipevet::identity::FnDecl::declared(
                    ::pipevet::identity::DeclSite {
                        module_path: ::pipevet::identity::parent_module(::std::module_path!()),
                        name: #fn_name_str,
                        key: #key,
                        visibility: ::pipevet::identity::Visibility::#visibility,
                        reachable: #reachable,
                        generic_args: ::std::vec![#(::std::any::type_name::<#type_idents>()),*],
                    },
                    super::#fn_name #turbofish as fn(#(#params),*) -> #output,
                )
            }

            /// The function bound as a transform callable.
            pub fn callable #generics () -> ::pipevet::Callable #where_clause {
                ::pipevet::Callable::declared(declaration #turbofish (), super::#fn_name #turbofish)
            }

            #symbol_registration
        }
    }
}
