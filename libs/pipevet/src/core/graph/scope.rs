// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use super::pipeline::{PCollection, Pipeline};
use super::transform::{Transform, TransformKind};
use crate::core::callable::Callable;
use crate::core::error::{Result, VetError};

/// Named region of a pipeline that new transforms are added under.
pub struct Scope<'p> {
    pipeline: &'p mut Pipeline,
    path: String,
}

impl<'p> Scope<'p> {
    pub(crate) fn new(pipeline: &'p mut Pipeline, path: String) -> Self {
        Self { pipeline, path }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Nested scope. Transforms added through it are named `<path>/<name>/..`.
    pub fn scope(&mut self, name: &str) -> Scope<'_> {
        let path = format!("{}/{}", self.path, name);
        Scope::new(&mut *self.pipeline, path)
    }

    /// Source transform emitting `values`. Binds no callable.
    pub fn create<T: Send + 'static>(&mut self, values: Vec<T>) -> PCollection {
        let kind = TransformKind::Create {
            elements: values.len(),
            element_type: std::any::type_name::<T>(),
        };
        let transform = Transform::new(self.name_for(&kind, None), kind, Vec::new());
        self.pipeline.add_source(transform)
    }

    /// Element-wise transform bound to one callable.
    pub fn par_do(&mut self, callable: Callable, input: &PCollection) -> Result<PCollection> {
        let name = self.name_for(&TransformKind::ParDo, Some(callable.decl().label()));
        let transform = Transform::new(name, TransformKind::ParDo, vec![callable]);
        self.pipeline.add_transform(transform, &[input])
    }

    /// Aggregation bound to one or more callables (create/add/merge/extract
    /// style accumulators bind several).
    pub fn combine(&mut self, callables: Vec<Callable>, input: &PCollection) -> Result<PCollection> {
        let Some(first) = callables.first() else {
            return Err(VetError::Graph(format!(
                "{}: combine needs at least one callable",
                self.path
            )));
        };
        let name = self.name_for(&TransformKind::Combine, Some(first.decl().label()));
        let transform = Transform::new(name, TransformKind::Combine, callables);
        self.pipeline.add_transform(transform, &[input])
    }

    /// Merge several collections. Binds no callable.
    pub fn flatten(&mut self, inputs: &[&PCollection]) -> Result<PCollection> {
        if inputs.is_empty() {
            return Err(VetError::Graph(format!(
                "{}: flatten needs at least one input",
                self.path
            )));
        }
        let name = self.name_for(&TransformKind::Flatten, None);
        let transform = Transform::new(name, TransformKind::Flatten, Vec::new());
        self.pipeline.add_transform(transform, inputs)
    }

    fn name_for(&self, kind: &TransformKind, label: Option<&str>) -> String {
        match label {
            Some(label) => format!("{}/{}({})", self.path, kind, label),
            None => format!("{}/{}", self.path, kind),
        }
    }
}
