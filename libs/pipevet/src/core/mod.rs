// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

pub mod callable;
pub mod driver;
pub mod error;
pub mod graph;
pub mod identity;
pub mod registry;
pub mod shim;
pub mod vet;

pub use callable::{Args, Callable, Datum, IntoCallable};
pub use driver::{
    TemplateData, generate_code, generate_from_registry, generator_main, init_logging,
    registry_main, render_generator_program, write_output,
};
pub use error::{Result, ShimBlocker, VetError};
pub use graph::{PCollection, Pipeline, Scope, Transform, TransformKind};
pub use identity::{QualifiedName, Signature, Visibility, identify, load_symbol};
pub use registry::{PipelineConstructor, PipelineRegistry, RegisteredPipeline};
pub use shim::{Shim, ShimRegistration, ShimTable, global_shims};
pub use vet::{Classification, Evaluation, Evaluator, Verdict, evaluate};
