// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use crate::core::error::ShimBlocker;
use crate::core::identity::FnDecl;
use crate::core::shim::ShimRoute;

/// Per-callable result of vetting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    exported: bool,
    has_direct_shim: bool,
}

impl Classification {
    pub fn new(exported: bool, has_direct_shim: bool) -> Self {
        Self {
            exported,
            has_direct_shim,
        }
    }

    /// Generated code may reference the callable by path.
    pub fn exported(&self) -> bool {
        self.exported
    }

    pub fn has_direct_shim(&self) -> bool {
        self.has_direct_shim
    }

    pub fn needs_reflection_fallback(&self) -> bool {
        !self.has_direct_shim
    }
}

/// One distinct callable found in the pipeline.
#[derive(Debug, Clone)]
pub struct CallableEntry {
    pub(crate) decl: FnDecl,
    pub(crate) classification: Classification,
    pub(crate) route: Result<ShimRoute, ShimBlocker>,
    pub(crate) transforms: Vec<String>,
}

impl CallableEntry {
    /// Qualified name, or the diagnostic label when the identity is unresolved.
    pub fn name(&self) -> &str {
        self.decl
            .name()
            .map(|n| n.as_str())
            .unwrap_or_else(|| self.decl.label())
    }

    pub fn decl(&self) -> &FnDecl {
        &self.decl
    }

    pub fn classification(&self) -> Classification {
        self.classification
    }

    /// How a generated shim would reach this callable, or why none can.
    pub fn route(&self) -> Result<&ShimRoute, &ShimBlocker> {
        self.route.as_ref()
    }

    /// Names of the transforms binding this callable, in visit order.
    pub fn transforms(&self) -> &[String] {
        &self.transforms
    }
}

/// Aggregate result over every callable of one pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub performant: bool,
    pub all_exported: bool,
    pub uses_reflection_fallback: bool,
    pub requires_registrations: bool,
}

impl Verdict {
    pub fn from_entries(entries: &[CallableEntry]) -> Self {
        let uses_reflection_fallback = entries
            .iter()
            .any(|e| e.classification.needs_reflection_fallback());
        Self {
            performant: !uses_reflection_fallback,
            all_exported: entries.iter().all(|e| e.classification.exported()),
            uses_reflection_fallback,
            requires_registrations: entries
                .iter()
                .any(|e| e.classification.needs_reflection_fallback() && e.route.is_ok()),
        }
    }
}
