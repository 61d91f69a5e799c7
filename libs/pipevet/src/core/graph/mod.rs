// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Minimal processing-graph construction API.

mod pipeline;
mod scope;
mod transform;

pub use pipeline::{PCollection, Pipeline};
pub use scope::Scope;
pub use transform::{Transform, TransformKind};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::callable::Callable;
    use crate::core::error::VetError;

    fn double(x: i64) -> i64 {
        x * 2
    }

    fn sum(a: i64, b: i64) -> i64 {
        a + b
    }

    #[test]
    fn test_transforms_are_topological() {
        let mut p = Pipeline::new();
        let mut root = p.root();
        let col = root.create(vec![1i64, 2, 3]);
        let doubled = root.par_do(Callable::from_fn(double), &col).unwrap();
        let merged = root.flatten(&[&col, &doubled]).unwrap();
        root.combine(vec![Callable::from_fn(sum)], &merged).unwrap();

        let transforms = p.transforms().unwrap();
        let kinds: Vec<String> = transforms.iter().map(|t| t.kind().to_string()).collect();
        assert_eq!(kinds, vec!["Create", "ParDo", "Flatten", "Combine"]);
        assert_eq!(
            transforms[0].kind(),
            &TransformKind::Create {
                elements: 3,
                element_type: "i64"
            }
        );
    }

    #[test]
    fn test_scope_names() {
        let mut p = Pipeline::new();
        let mut root = p.root();
        let col = root.create(vec![1i64]);
        {
            let mut words = root.scope("words");
            words.par_do(Callable::from_fn(double), &col).unwrap();
        }
        let names: Vec<String> = p
            .transforms()
            .unwrap()
            .iter()
            .map(|t| t.name().to_string())
            .collect();
        assert_eq!(names[0], "root/Create");
        assert_eq!(
            names[1],
            "root/words/ParDo(pipevet::core::graph::tests.double)"
        );
    }

    #[test]
    fn test_collections_do_not_cross_pipelines() {
        let mut a = Pipeline::new();
        let col = a.root().create(vec![1i64]);

        let mut b = Pipeline::new();
        let result = b.root().par_do(Callable::from_fn(double), &col);
        assert!(matches!(result, Err(VetError::Graph(_))));
        assert!(b.is_empty());
    }

    #[test]
    fn test_empty_combine_and_flatten_rejected() {
        let mut p = Pipeline::new();
        let mut root = p.root();
        let col = root.create(vec![1i64]);
        assert!(root.combine(vec![], &col).is_err());
        assert!(root.flatten(&[]).is_err());
        assert_eq!(p.transform_count(), 1);
    }
}
