// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Catalog of named pipeline constructors for batch code generation.
//!
//! The registry is an ordinary value: build it once at start-up and pass it
//! to [`registry_main`](crate::core::driver::registry_main) or
//! [`generate_from_registry`](crate::core::driver::generate_from_registry).

use std::fmt;
use std::sync::Arc;

use crate::core::error::{Result, VetError};
use crate::core::graph::Pipeline;

/// Builds one pipeline. Errors are reported as construction failures.
pub type PipelineConstructor = Arc<dyn Fn() -> anyhow::Result<Pipeline> + Send + Sync>;

#[derive(Clone)]
pub struct RegisteredPipeline {
    import_path: String,
    constructor: PipelineConstructor,
}

impl RegisteredPipeline {
    pub fn import_path(&self) -> &str {
        &self.import_path
    }

    pub fn constructor(&self) -> &PipelineConstructor {
        &self.constructor
    }

    /// Run the constructor.
    pub fn pipeline(&self) -> Result<Pipeline> {
        (self.constructor)().map_err(|source| VetError::Construction {
            context: self.import_path.clone(),
            source,
        })
    }
}

impl fmt::Debug for RegisteredPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredPipeline")
            .field("import_path", &self.import_path)
            .finish_non_exhaustive()
    }
}

#[derive(Default, Clone, Debug)]
pub struct PipelineRegistry {
    entries: Vec<RegisteredPipeline>,
}

impl PipelineRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pipeline. Registering the same import path twice keeps both
    /// entries; [`find`](Self::find) returns the first.
    pub fn register<F>(&mut self, import_path: impl Into<String>, constructor: F)
    where
        F: Fn() -> anyhow::Result<Pipeline> + Send + Sync + 'static,
    {
        let import_path = import_path.into();
        tracing::debug!("[register] pipeline '{}'", import_path);
        self.entries.push(RegisteredPipeline {
            import_path,
            constructor: Arc::new(constructor),
        });
    }

    /// Registered pipelines in registration order. The returned vector is a
    /// copy; changing it does not affect the registry.
    pub fn list(&self) -> Vec<RegisteredPipeline> {
        self.entries.clone()
    }

    pub fn find(&self, import_path: &str) -> Option<&RegisteredPipeline> {
        self.entries.iter().find(|e| e.import_path == import_path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
