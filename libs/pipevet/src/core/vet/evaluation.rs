// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use std::collections::BTreeMap;

use super::classification::{CallableEntry, Classification, Verdict};
use crate::core::callable::Callable;
use crate::core::error::Result;
use crate::core::graph::Pipeline;
use crate::core::identity::{SymbolTable, global_symbols, identify};
use crate::core::shim::{ShimGenerator, ShimTable, global_shims, shim_route};

/// Classifies the callables of a pipeline against a shim table.
#[derive(Clone, Copy)]
pub struct Evaluator<'a> {
    shims: &'a ShimTable,
    symbols: &'a SymbolTable,
}

impl<'a> Evaluator<'a> {
    pub fn new(shims: &'a ShimTable, symbols: &'a SymbolTable) -> Self {
        Self { shims, symbols }
    }

    /// Evaluator over the tables linked into this binary.
    pub fn global() -> Evaluator<'static> {
        Evaluator::new(global_shims(), global_symbols())
    }

    pub fn evaluate(&self, pipeline: &Pipeline) -> Result<Evaluation<'a>> {
        let mut entries: BTreeMap<String, CallableEntry> = BTreeMap::new();

        for (step, transform) in pipeline.transforms()?.into_iter().enumerate() {
            for (position, callable) in transform.callables().iter().enumerate() {
                // Unresolved callables share labels (every closure of a fn is
                // `<fn>::{{closure}}`) and transform names, so each binding
                // gets its own entry.
                let key = match identify(callable) {
                    Ok(name) => name.to_string(),
                    Err(e) => {
                        tracing::debug!("[vet] {}", e);
                        format!("{}@{}#{}", callable.decl().label(), step, position)
                    }
                };
                if let Some(entry) = entries.get_mut(&key) {
                    entry.transforms.push(transform.name().to_string());
                    continue;
                }
                let entry = CallableEntry {
                    decl: callable.decl().clone(),
                    classification: self.classify(callable),
                    route: shim_route(callable.decl(), self.symbols),
                    transforms: vec![transform.name().to_string()],
                };
                tracing::debug!(
                    "[vet] '{}' exported={} direct_shim={}",
                    key,
                    entry.classification.exported(),
                    entry.classification.has_direct_shim()
                );
                entries.insert(key, entry);
            }
        }

        let entries: Vec<CallableEntry> = entries.into_values().collect();
        let verdict = Verdict::from_entries(&entries);
        let evaluation = Evaluation {
            entries,
            verdict,
            symbols: self.symbols,
        };
        tracing::info!("[vet] {}", evaluation.summary());
        Ok(evaluation)
    }

    fn classify(&self, callable: &Callable) -> Classification {
        let decl = callable.decl();
        let has_direct_shim = match decl.name().and_then(|n| self.shims.get(n.as_str())) {
            Some(shim) if shim.signature() == decl.signature() => true,
            Some(shim) => {
                tracing::warn!(
                    "Shim '{}' is stale: registered for `{}`, callable is `{}`",
                    shim.name(),
                    shim.signature(),
                    decl.signature()
                );
                false
            }
            None => false,
        };
        Classification::new(decl.is_exported(), has_direct_shim)
    }
}

/// Evaluate `pipeline` against the global shim and symbol tables.
pub fn evaluate(pipeline: &Pipeline) -> Result<Evaluation<'static>> {
    Evaluator::global().evaluate(pipeline)
}

/// Outcome of vetting one pipeline.
#[derive(Debug)]
pub struct Evaluation<'a> {
    entries: Vec<CallableEntry>,
    verdict: Verdict,
    symbols: &'a SymbolTable,
}

impl Evaluation<'_> {
    /// No callable needs the reflection fallback.
    pub fn performant(&self) -> bool {
        self.verdict.performant
    }

    pub fn all_exported(&self) -> bool {
        self.verdict.all_exported
    }

    pub fn uses_reflection_fallback(&self) -> bool {
        self.verdict.uses_reflection_fallback
    }

    /// Some callable lacks a shim that generated code can register.
    ///
    /// This is not `needs fallback && !exported`: an exported callable with no
    /// shim (which generation fixes) counts, while an anonymous or
    /// unresolvable one (which generation rejects) does not, even though it
    /// is not exported.
    pub fn requires_registrations(&self) -> bool {
        self.verdict.requires_registrations
    }

    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    /// Distinct callables in ascending name order.
    pub fn entries(&self) -> &[CallableEntry] {
        &self.entries
    }

    /// Shim source for every callable that needs the fallback, to be
    /// compiled into crate `package`. A performant evaluation yields a stub
    /// with no items.
    pub fn generate_to_string(&self, package: &str) -> Result<String> {
        let generator = ShimGenerator::new(package, self.symbols)?;
        generator.generate(
            self.entries
                .iter()
                .filter(|e| e.classification.needs_reflection_fallback())
                .map(|e| &e.decl),
        )
    }

    pub fn summary(&self) -> String {
        let fallback = self
            .entries
            .iter()
            .filter(|e| e.classification.needs_reflection_fallback())
            .count();
        format!(
            "{} callable(s), {} direct, {} via reflection fallback (performant: {}, all exported: {}, requires registrations: {})",
            self.entries.len(),
            self.entries.len() - fallback,
            fallback,
            self.verdict.performant,
            self.verdict.all_exported,
            self.verdict.requires_registrations
        )
    }
}
