// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Fixture crate exercising pipevet end to end.
//!
//! `generated_shims.rs` is the checked-in output of [`generate_code`] for
//! [`pipelines::construct_pipeline`]; regenerate it with
//! `cargo xtask generate-shims`.

pub mod pipelines;

#[rustfmt::skip]
mod generated_shims;

use pipevet::identity::global_symbols;
use pipevet::{Evaluator, PipelineRegistry, ShimTable};

/// Crate name the generated shims are compiled into.
pub const PACKAGE: &str = "pipevet_testpipeline";

/// Every fixture pipeline, keyed by import path.
pub fn registry() -> PipelineRegistry {
    let mut registry = PipelineRegistry::new();
    registry.register("pipevet_testpipeline::pipelines", pipelines::construct_pipeline);
    registry.register("pipevet_testpipeline::pipelines::performant", pipelines::performant);
    registry.register("pipevet_testpipeline::pipelines::shim_needed", pipelines::shim_needed);
    registry.register("pipevet_testpipeline::pipelines::anonymous", pipelines::anonymous);
    registry
}

/// Shim source for [`pipelines::construct_pipeline`], computed as if this
/// crate had no shims linked in yet.
pub fn generate_code(package: &str) -> pipevet::Result<String> {
    let pipeline = pipelines::construct_pipeline().map_err(|source| pipevet::VetError::Construction {
        context: "pipevet_testpipeline::pipelines::construct_pipeline".to_string(),
        source,
    })?;
    let unshimmed = ShimTable::new();
    let evaluation = Evaluator::new(&unshimmed, global_symbols()).evaluate(&pipeline)?;
    tracing::debug!("construct_pipeline: {}", evaluation.summary());
    evaluation.generate_to_string(package)
}
