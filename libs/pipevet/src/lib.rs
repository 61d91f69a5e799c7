// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Build-time vetting for pipelines.
//!
//! Every transform function bound into a [`Pipeline`] either has a
//! direct-call [`Shim`] or goes through the slower reflection fallback.
//! [`evaluate`] reports which, and [`Evaluation::generate_to_string`]
//! writes the Rust module that registers the missing shims.
//!
//! ```ignore
//! #[pipevet::func]
//! pub fn ident_int(x: i64) -> i64 { x }
//!
//! let mut p = pipevet::Pipeline::new();
//! let mut root = p.root();
//! let col = root.create(vec![1i64, 2, 3]);
//! root.par_do(ident_int::callable(), &col)?;
//!
//! let evaluation = pipevet::evaluate(&p)?;
//! if !evaluation.performant() {
//!     std::fs::write("src/generated_shims.rs", evaluation.generate_to_string("my_crate")?)?;
//! }
//! ```

#![allow(clippy::type_complexity)] // Erased invoker and constructor types are clear in context

// Allow `::pipevet::` paths to work inside this crate (for proc macro generated code)
extern crate self as pipevet;

// Re-exported for generated code and generator programs
pub use anyhow;
pub use inventory;

pub mod core;

pub use pipevet_macros::func;

pub use crate::core::{
    Args, Callable, Classification, Datum, Evaluation, Evaluator, IntoCallable, PCollection,
    Pipeline, PipelineConstructor, PipelineRegistry, QualifiedName, RegisteredPipeline, Result,
    Scope, Shim, ShimBlocker, ShimRegistration, ShimTable, Signature, TemplateData, Transform,
    TransformKind, Verdict, VetError, Visibility, evaluate, generate_code, generate_from_registry,
    generator_main, global_shims, identify, init_logging, load_symbol, registry_main,
    render_generator_program, write_output,
};
pub use crate::core::identity;

/// Bind a closure as a callable.
///
/// Inside a `#[pipevet::func]` body every `anon!` is rewritten to an
/// anonymous callable named `<module>.<fn>.funcN` by source order. Anywhere
/// else it falls back to this definition: without a key the closure has no
/// resolvable identity, with `key = "..."` the key is its name.
#[macro_export]
macro_rules! anon {
    (key = $key:literal, $f:expr $(,)?) => {
        $crate::Callable::keyed($key, $f)
    };
    ($f:expr $(,)?) => {
        $crate::Callable::from_fn($f)
    };
}
