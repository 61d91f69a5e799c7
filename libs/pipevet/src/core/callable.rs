// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Callables bound into transforms.
//!
//! Every [`Callable`] carries a type-erased invoker built at bind time. That
//! invoker is the reflection fallback: arguments travel as [`Datum`]s and are
//! downcast on every call. A direct-call shim registered under the
//! callable's name replaces it.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::core::error::{Result, VetError};
use crate::core::identity::{AnonSite, FnDecl, FnPointer, Signature};
use crate::core::shim::{ShimTable, global_shims};

/// A type-erased element passed to or returned from a callable.
pub struct Datum(Box<dyn Any + Send>);

impl Datum {
    pub fn new<T: Any + Send>(value: T) -> Self {
        Self(Box::new(value))
    }

    pub fn is<T: Any>(&self) -> bool {
        self.0.is::<T>()
    }

    pub fn downcast<T: Any>(self) -> std::result::Result<T, Datum> {
        match self.0.downcast::<T>() {
            Ok(value) => Ok(*value),
            Err(inner) => Err(Datum(inner)),
        }
    }
}

impl fmt::Debug for Datum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Datum(..)")
    }
}

/// Positional arguments of one call.
pub type Args = Vec<Datum>;

/// Type-erased call entry point.
pub type Invoker = Arc<dyn Fn(Vec<Datum>) -> Result<Datum> + Send + Sync>;

/// Functions and closures that can be bound into a transform.
///
/// `Marker` is the `fn(..) -> R` pointer type describing the callable's
/// shape; it only exists to keep the per-arity impls apart.
pub trait IntoCallable<Marker>: Send + Sync + 'static {
    fn signature() -> Signature;

    fn into_invoker(self) -> Invoker;
}

fn take<T: Any>(args: &mut std::vec::IntoIter<Datum>, arity: usize) -> Result<T> {
    let position = arity - args.len();
    args.next()
        .and_then(|datum| datum.downcast::<T>().ok())
        .ok_or(VetError::ArgumentType {
            position,
            expected: std::any::type_name::<T>(),
        })
}

macro_rules! impl_into_callable {
    ($($arg:ident $val:ident),*) => {
        impl<F, R, $($arg),*> IntoCallable<fn($($arg),*) -> R> for F
        where
            F: Fn($($arg),*) -> R + Send + Sync + 'static,
            R: Send + 'static,
            $($arg: Send + 'static,)*
        {
            fn signature() -> Signature {
                <fn($($arg),*) -> R as FnPointer>::signature()
            }

            fn into_invoker(self) -> Invoker {
                Arc::new(move |args: Vec<Datum>| {
                    let names: &[&str] = &[$(stringify!($arg)),*];
                    let arity = names.len();
                    if args.len() != arity {
                        return Err(VetError::Arity {
                            expected: arity,
                            found: args.len(),
                        });
                    }
                    #[allow(unused_mut, unused_variables)]
                    let mut args = args.into_iter();
                    $(let $val = take::<$arg>(&mut args, arity)?;)*
                    Ok(Datum::new((self)($($val),*)))
                })
            }
        }
    };
}

impl_into_callable!();
impl_into_callable!(A a);
impl_into_callable!(A a, B b);
impl_into_callable!(A a, B b, C c);
impl_into_callable!(A a, B b, C c, D d);

/// A function bound as a transform's processing logic.
#[derive(Clone)]
pub struct Callable {
    decl: Arc<FnDecl>,
    invoker: Invoker,
}

impl Callable {
    /// Bind a function declared with `#[pipevet::func]`.
    pub fn declared<F, M>(decl: FnDecl, f: F) -> Self
    where
        F: IntoCallable<M>,
    {
        debug_assert_eq!(decl.signature(), &F::signature());
        Self {
            decl: Arc::new(decl),
            invoker: f.into_invoker(),
        }
    }

    /// Bind any function or closure, identified by its type name.
    pub fn from_fn<F, M>(f: F) -> Self
    where
        F: IntoCallable<M>,
    {
        Self {
            decl: Arc::new(FnDecl::introspected(
                std::any::type_name::<F>(),
                F::signature(),
            )),
            invoker: f.into_invoker(),
        }
    }

    /// Bind an `anon!` closure declared inside a `#[pipevet::func]` body.
    pub fn anonymous<F, M>(site: AnonSite, f: F) -> Self
    where
        F: IntoCallable<M>,
    {
        Self {
            decl: Arc::new(FnDecl::anonymous(site, F::signature())),
            invoker: f.into_invoker(),
        }
    }

    /// Bind a closure under an explicit stable key.
    pub fn keyed<F, M>(key: &str, f: F) -> Self
    where
        F: IntoCallable<M>,
    {
        Self {
            decl: Arc::new(FnDecl::keyed_closure(key, F::signature())),
            invoker: f.into_invoker(),
        }
    }

    pub fn decl(&self) -> &FnDecl {
        &self.decl
    }

    pub fn signature(&self) -> &Signature {
        self.decl.signature()
    }

    /// Call through the global direct-call shim when one is registered,
    /// otherwise through the fallback invoker.
    pub fn invoke(&self, args: Vec<Datum>) -> Result<Datum> {
        self.invoke_with(global_shims(), args)
    }

    pub fn invoke_with(&self, shims: &ShimTable, args: Vec<Datum>) -> Result<Datum> {
        if let Some(shim) = self
            .decl
            .name()
            .and_then(|name| shims.get(name.as_str()))
            .filter(|shim| shim.signature() == self.signature())
        {
            return shim.call(args);
        }
        tracing::debug!("[invoke] reflection fallback for '{}'", self.decl.label());
        self.invoke_fallback(args)
    }

    pub fn invoke_fallback(&self, args: Vec<Datum>) -> Result<Datum> {
        (self.invoker)(args)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callable")
            .field("name", &self.decl.label())
            .field("signature", &self.decl.signature().to_string())
            .finish()
    }
}
