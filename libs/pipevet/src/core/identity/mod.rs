// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Function identity: stable qualified names for callables, and typed
//! reconstruction of recorded function pointers.
//!
//! Names come from declarations made by `#[pipevet::func]` where available,
//! and from `std::any::type_name` of the function item type otherwise.
//! Both are deterministic within one build.

mod decl;
mod name;
mod pointer;
mod signature;
mod symbols;

pub use decl::{AnonSite, DeclSite, FnDecl};
pub use name::{
    ItemPath, NameKind, QualifiedName, Visibility, parse_fn_type_name, render_type_path,
};
pub use pointer::{FnPointer, PointerToken};
pub use signature::{Signature, TypeDescriptor};
pub use symbols::{SymbolEntry, SymbolTable, global_symbols, load_symbol};

use crate::core::callable::Callable;
use crate::core::error::{Result, VetError};

/// Qualified name of `callable`.
///
/// Fails only when there is no backing symbol at all, which is the case for
/// closures created outside a `#[pipevet::func]` scope.
pub fn identify(callable: &Callable) -> Result<QualifiedName> {
    let decl = callable.decl();
    decl.name()
        .cloned()
        .ok_or_else(|| VetError::UnresolvableIdentity {
            callable: decl.label().to_string(),
        })
}

/// Turn a recorded pointer token back into a typed function pointer.
///
/// The token, the recorded signature and `F` must all describe the same
/// function pointer type. Tokens only exist for zero-capture functions, so
/// closures can never be reconstructed.
pub fn reconstruct<F: FnPointer>(token: PointerToken, signature: &Signature) -> Result<F> {
    let expected = F::signature();
    if signature.fn_type() != expected.fn_type() || token.fn_type() != expected.fn_type() {
        return Err(VetError::SignatureMismatch {
            expected: expected.to_string(),
            found: signature.to_string(),
        });
    }
    // SAFETY: the token was produced by `FnPointer::token` on a value whose
    // type has the same `TypeId` as `F`.
    Ok(unsafe { F::from_addr(token.address()) })
}

/// Strip the last segment of a `module_path!()`; used by the companion
/// modules `#[pipevet::func]` nests under the function's own name.
pub fn parent_module(module_path: &'static str) -> &'static str {
    module_path
        .rsplit_once("::")
        .map(|(parent, _)| parent)
        .unwrap_or(module_path)
}
