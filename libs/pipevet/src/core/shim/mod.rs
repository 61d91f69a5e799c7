// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Direct-call shims and their link-time registration.

pub mod generator;
mod table;

pub use generator::{GENERATED_HEADER, ShimGenerator, ShimRoute, shim_route};
pub use table::{ShimTable, global_shims};

use std::fmt;

use crate::core::callable::{Datum, IntoCallable, Invoker};
use crate::core::error::{Result, VetError};
use crate::core::identity::{FnDecl, Signature};

/// Direct-call wrapper for one named callable, monomorphized over the
/// concrete function it wraps.
pub struct Shim {
    name: String,
    signature: Signature,
    call: Invoker,
}

impl Shim {
    pub fn new<F, M>(name: impl Into<String>, f: F) -> Self
    where
        F: IntoCallable<M>,
    {
        Self {
            name: name.into(),
            signature: F::signature(),
            call: f.into_invoker(),
        }
    }

    /// Build a shim named after a `#[pipevet::func]` declaration. Fails when
    /// `f` does not have the declared signature.
    pub fn for_decl<F, M>(decl: &FnDecl, f: F) -> Result<Self>
    where
        F: IntoCallable<M>,
    {
        let name = decl.name().ok_or_else(|| VetError::UnresolvableIdentity {
            callable: decl.label().to_string(),
        })?;
        if decl.signature() != &F::signature() {
            return Err(VetError::SignatureMismatch {
                expected: decl.signature().to_string(),
                found: F::signature().to_string(),
            });
        }
        Ok(Self::new(name.as_str(), f))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn call(&self, args: Vec<Datum>) -> Result<Datum> {
        (self.call)(args)
    }
}

impl fmt::Debug for Shim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shim")
            .field("name", &self.name)
            .field("signature", &self.signature.to_string())
            .finish()
    }
}

/// Link-time shim registration, collected by [`global_shims`].
pub struct ShimRegistration {
    expected: Option<(&'static str, &'static str)>,
    install: fn() -> Result<Shim>,
}

impl ShimRegistration {
    /// Registration emitted by the shim generator. `name` and `signature`
    /// are what the generator saw; the installed shim must still match them.
    pub const fn generated(
        name: &'static str,
        signature: &'static str,
        install: fn() -> Result<Shim>,
    ) -> Self {
        Self {
            expected: Some((name, signature)),
            install,
        }
    }

    /// Hand-written registration, usually through [`register_shim!`](crate::register_shim).
    pub const fn manual(install: fn() -> Result<Shim>) -> Self {
        Self {
            expected: None,
            install,
        }
    }

    pub fn expected(&self) -> Option<(&'static str, &'static str)> {
        self.expected
    }

    pub fn install(&self) -> Result<Shim> {
        (self.install)()
    }
}

inventory::collect!(ShimRegistration);

/// Register a direct-call shim for a `#[pipevet::func]` function by path.
///
/// ```ignore
/// #[pipevet::func]
/// pub fn ident_int(x: i64) -> i64 { x }
///
/// pipevet::register_shim!(ident_int);
/// ```
#[macro_export]
macro_rules! register_shim {
    ($($seg:ident)::+) => {
        const _: () = {
            fn install() -> $crate::Result<$crate::Shim> {
                $crate::Shim::for_decl(&$($seg::)+declaration(), $($seg)::+)
            }

            $crate::inventory::submit! {
                $crate::ShimRegistration::manual(install)
            }
        };
    };
}
