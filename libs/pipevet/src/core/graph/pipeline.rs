// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use std::sync::atomic::{AtomicU64, Ordering};

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};

use super::scope::Scope;
use super::transform::Transform;
use crate::core::error::{Result, VetError};

static PIPELINE_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Output of a transform, consumed by later transforms of the same pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PCollection {
    pub(crate) pipeline: u64,
    pub(crate) producer: NodeIndex,
}

/// Processing graph (DAG) of transforms.
#[derive(Debug)]
pub struct Pipeline {
    id: u64,
    graph: DiGraph<Transform, ()>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline {
    pub fn new() -> Self {
        Self {
            id: PIPELINE_COUNTER.fetch_add(1, Ordering::SeqCst),
            graph: DiGraph::new(),
        }
    }

    pub fn root(&mut self) -> Scope<'_> {
        Scope::new(self, "root".to_string())
    }

    /// All transforms, producers before consumers.
    pub fn transforms(&self) -> Result<Vec<&Transform>> {
        let sorted = toposort(&self.graph, None)
            .map_err(|_| VetError::Graph("Pipeline contains cycles".into()))?;
        Ok(sorted.into_iter().map(|idx| &self.graph[idx]).collect())
    }

    pub fn transform_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub(crate) fn add_source(&mut self, transform: Transform) -> PCollection {
        tracing::trace!("[graph] add source '{}'", transform.name());
        PCollection {
            pipeline: self.id,
            producer: self.graph.add_node(transform),
        }
    }

    pub(crate) fn add_transform(
        &mut self,
        transform: Transform,
        inputs: &[&PCollection],
    ) -> Result<PCollection> {
        for input in inputs {
            if input.pipeline != self.id || self.graph.node_weight(input.producer).is_none() {
                return Err(VetError::Graph(format!(
                    "'{}' consumes a collection from another pipeline",
                    transform.name()
                )));
            }
        }
        tracing::trace!("[graph] add transform '{}'", transform.name());
        let node = self.graph.add_node(transform);
        for input in inputs {
            self.graph.add_edge(input.producer, node, ());
        }
        Ok(PCollection {
            pipeline: self.id,
            producer: node,
        })
    }
}
