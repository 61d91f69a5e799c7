// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Procedural macros for pipevet
//!
//! `#[pipevet::func]` gives a free function a stable identity that the
//! evaluator and the shim generator can rely on without runtime reflection.
//!
//! ```ignore
//! #[pipevet::func]
//! pub fn ident_int(x: i64) -> i64 {
//!     x
//! }
//!
//! #[pipevet::func]
//! pub fn construct() -> anyhow::Result<pipevet::Pipeline> {
//!     let mut p = pipevet::Pipeline::new();
//!     let mut root = p.root();
//!     let input = root.create(vec![1i64, 2, 3]);
//!     let out = root.par_do(ident_int::callable(), &input)?;
//!     // named `<module>.construct.func1`; anon!(key = "...", ..) pins the name
//!     root.par_do(anon!(|x: i64| x + 1), &out)?;
//!     Ok(p)
//! }
//! ```
//!
//! The companion module `ident_int` holds `declaration()` and `callable()`.
//! Non-generic functions are also entered into the symbol table so that
//! generated code can load them by name even when they are private.

mod analysis;
mod anon;
mod attributes;
mod codegen;

use proc_macro::TokenStream;
use syn::{ItemFn, parse_macro_input};

use crate::analysis::FuncAnalysis;
use crate::anon::AnonRewriter;
use crate::attributes::FuncAttributes;

/// Declare a pipeline transform function.
///
/// # Attributes
///
/// - `key = "..."` - explicit qualified name, stable across source edits
/// - `reachable` - the function's module path is public from the crate root.
///   Generic functions have no symbol-table entry, so generated shims name
///   their instantiations by path and need this flag.
///
/// # Generated Code
///
/// ```ignore
/// pub fn ident_int(x: i64) -> i64 { x }
///
/// pub mod ident_int {
///     use super::*;
///     pub fn declaration() -> ::pipevet::identity::FnDecl { .. }
///     pub fn callable() -> ::pipevet::Callable { .. }
///     ::pipevet::inventory::submit! { ::pipevet::identity::SymbolEntry::new(declaration) }
/// }
/// ```
///
/// `anon!(..)` invocations in the body become anonymous callables numbered
/// `func1`, `func2`, ... in source order.
#[proc_macro_attribute]
pub fn func(attr: TokenStream, item: TokenStream) -> TokenStream {
    let mut attrs = FuncAttributes::default();
    let attr_parser = attrs.parser();
    parse_macro_input!(attr with attr_parser);

    let mut item = parse_macro_input!(item as ItemFn);

    let rewriter = AnonRewriter::new(item.sig.ident.to_string());
    if let Err(err) = rewriter.rewrite(&mut item.block) {
        return err.to_compile_error().into();
    }

    let analysis = match FuncAnalysis::analyze(item, attrs) {
        Ok(result) => result,
        Err(err) => return err.to_compile_error().into(),
    };

    TokenStream::from(codegen::generate_func_module(&analysis))
}
