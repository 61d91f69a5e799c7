// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Recorded function pointers.
//!
//! A [`PointerToken`] can only be produced from a real `fn(..) -> R` value
//! and remembers which pointer type it came from, so reconstruction can
//! refuse any request for a different type instead of transmuting blindly.

use std::any::TypeId;

use super::signature::{Signature, TypeDescriptor};

/// Opaque address of a zero-capture function plus its pointer type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointerToken {
    addr: usize,
    fn_type: TypeId,
}

impl PointerToken {
    pub fn address(&self) -> usize {
        self.addr
    }

    pub fn fn_type(&self) -> TypeId {
        self.fn_type
    }
}

/// Function pointer types that can be recorded and reconstructed.
pub trait FnPointer: Copy + Send + Sync + 'static {
    fn signature() -> Signature;

    fn token(self) -> PointerToken;

    /// # Safety
    ///
    /// `addr` must have been produced by [`FnPointer::token`] on a value of
    /// exactly this type.
    unsafe fn from_addr(addr: usize) -> Self;
}

macro_rules! impl_fn_pointer {
    ($($arg:ident),*) => {
        impl<R: 'static, $($arg: 'static),*> FnPointer for fn($($arg),*) -> R {
            fn signature() -> Signature {
                Signature::new::<Self>(
                    vec![$(TypeDescriptor::of::<$arg>()),*],
                    TypeDescriptor::of::<R>(),
                )
            }

            fn token(self) -> PointerToken {
                PointerToken {
                    addr: self as usize,
                    fn_type: TypeId::of::<Self>(),
                }
            }

            unsafe fn from_addr(addr: usize) -> Self {
                // SAFETY: function pointers are address-sized and the caller
                // guarantees the address came from a pointer of this type.
                unsafe { std::mem::transmute_copy::<usize, Self>(&addr) }
            }
        }
    };
}

impl_fn_pointer!();
impl_fn_pointer!(A);
impl_fn_pointer!(A, B);
impl_fn_pointer!(A, B, C);
impl_fn_pointer!(A, B, C, D);

#[cfg(test)]
mod tests {
    use super::*;

    fn forty_two() -> i64 {
        42
    }

    fn add(a: i64, b: i64) -> i64 {
        a + b
    }

    #[test]
    fn test_token_records_pointer_type() {
        let token = (forty_two as fn() -> i64).token();
        assert_eq!(token.fn_type(), TypeId::of::<fn() -> i64>());
        assert_ne!(token.address(), 0);
    }

    #[test]
    fn test_from_addr_round_trips() {
        let token = (add as fn(i64, i64) -> i64).token();
        let f = unsafe { <fn(i64, i64) -> i64 as FnPointer>::from_addr(token.address()) };
        assert_eq!(f(2, 3), 5);
    }

    #[test]
    fn test_signature_shape() {
        let sig = <fn(i64, i64) -> i64 as FnPointer>::signature();
        assert_eq!(sig.arity(), 2);
        assert_eq!(sig.fn_type(), TypeId::of::<fn(i64, i64) -> i64>());
    }
}
