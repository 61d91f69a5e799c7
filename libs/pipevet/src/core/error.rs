// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use thiserror::Error;

/// Reason a callable cannot receive a generated shim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShimBlocker {
    #[error(
        "anonymous functions cannot be referenced from generated code; declare it as a #[pipevet::func] function"
    )]
    Anonymous,

    #[error("the callable has no backing symbol, so its identity cannot be resolved")]
    UnresolvableIdentity,

    #[error(
        "it is not exported and was not declared with #[pipevet::func], so it cannot be registered by name"
    )]
    UndeclaredSymbol,

    #[error(
        "generic instantiations are reached by path, and its module path is not declared public from the crate root; mark it #[pipevet::func(reachable)] once it is"
    )]
    UnreachablePath,
}

#[derive(Error, Debug)]
pub enum VetError {
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("no pipeline registered for import path '{import_path}'")]
    UnknownPipeline { import_path: String },

    #[error("pipeline construction for code generator failed ({context})")]
    Construction {
        context: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("unresolvable identity for callable `{callable}`")]
    UnresolvableIdentity { callable: String },

    #[error("cannot generate shim for `{callable}`")]
    ShimGeneration {
        callable: String,
        #[source]
        blocker: ShimBlocker,
    },

    #[error("signature mismatch: expected `{expected}`, found `{found}`")]
    SignatureMismatch { expected: String, found: String },

    #[error("no declared function named '{name}' in the symbol table")]
    UnknownSymbol { name: String },

    #[error("argument {position} has the wrong type: expected `{expected}`")]
    ArgumentType {
        position: usize,
        expected: &'static str,
    },

    #[error("expected {expected} arguments, got {found}")]
    Arity { expected: usize, found: usize },

    #[error("Pipeline graph error: {0}")]
    Graph(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid template JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, VetError>;
