// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Pipeline vetting: which callables still go through the reflection
//! fallback, and whether shims can be generated for them.

mod classification;
mod evaluation;

pub use classification::{CallableEntry, Classification, Verdict};
pub use evaluation::{Evaluation, Evaluator, evaluate};
