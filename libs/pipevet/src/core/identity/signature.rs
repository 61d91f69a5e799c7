// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use std::any::{Any, TypeId};
use std::fmt;

/// A single parameter or return type of a transform function.
#[derive(Debug, Clone, Copy)]
pub struct TypeDescriptor {
    name: &'static str,
    id: TypeId,
}

impl TypeDescriptor {
    pub fn of<T: Any>() -> Self {
        Self {
            name: std::any::type_name::<T>(),
            id: TypeId::of::<T>(),
        }
    }

    /// Full type path as reported by `std::any::type_name`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn type_id(&self) -> TypeId {
        self.id
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeDescriptor {}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Parameter and output types of a callable, plus the `TypeId` of the
/// function pointer type with exactly that shape.
#[derive(Debug, Clone)]
pub struct Signature {
    params: Vec<TypeDescriptor>,
    output: TypeDescriptor,
    fn_type: TypeId,
}

impl Signature {
    /// Build a signature from its parts. `P` is the function pointer type
    /// (`fn(A, B) -> R`) the parts describe.
    pub fn new<P: Any>(params: Vec<TypeDescriptor>, output: TypeDescriptor) -> Self {
        Self {
            params,
            output,
            fn_type: TypeId::of::<P>(),
        }
    }

    pub fn params(&self) -> &[TypeDescriptor] {
        &self.params
    }

    pub fn output(&self) -> &TypeDescriptor {
        &self.output
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// `TypeId` of the matching `fn(..) -> R` pointer type.
    pub fn fn_type(&self) -> TypeId {
        self.fn_type
    }

    /// Render as a Rust function pointer type, passing every type path
    /// through `render`.
    pub fn render_with(&self, render: impl Fn(&str) -> String) -> String {
        let params: Vec<String> = self.params.iter().map(|p| render(p.name)).collect();
        format!("fn({}) -> {}", params.join(", "), render(self.output.name))
    }
}

impl PartialEq for Signature {
    fn eq(&self, other: &Self) -> bool {
        self.fn_type == other.fn_type
    }
}

impl Eq for Signature {}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_with(str::to_string))
    }
}
