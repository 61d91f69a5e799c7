// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use std::fmt;

use crate::core::callable::Callable;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformKind {
    Create {
        elements: usize,
        element_type: &'static str,
    },
    ParDo,
    Combine,
    Flatten,
}

impl fmt::Display for TransformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformKind::Create { .. } => f.write_str("Create"),
            TransformKind::ParDo => f.write_str("ParDo"),
            TransformKind::Combine => f.write_str("Combine"),
            TransformKind::Flatten => f.write_str("Flatten"),
        }
    }
}

/// One node of the processing graph and the callables bound to it.
#[derive(Debug, Clone)]
pub struct Transform {
    name: String,
    kind: TransformKind,
    callables: Vec<Callable>,
}

impl Transform {
    pub(crate) fn new(name: String, kind: TransformKind, callables: Vec<Callable>) -> Self {
        Self {
            name,
            kind,
            callables,
        }
    }

    /// Full name including the scope path, e.g. `root/words/ParDo(app.split)`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &TransformKind {
        &self.kind
    }

    pub fn callables(&self) -> &[Callable] {
        &self.callables
    }
}
