// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use super::name::{ItemPath, QualifiedName, Visibility, parse_fn_type_name};
use super::pointer::{FnPointer, PointerToken};
use super::signature::Signature;

/// Declaration facts recorded by `#[pipevet::func]` for a named function.
#[derive(Debug, Clone)]
pub struct DeclSite {
    pub module_path: &'static str,
    pub name: &'static str,
    pub key: Option<&'static str>,
    pub visibility: Visibility,
    /// Declared `#[pipevet::func(reachable)]`: every module on the path is
    /// public from the crate root.
    pub reachable: bool,
    /// `type_name` of each type argument of a generic instantiation.
    pub generic_args: Vec<&'static str>,
}

/// Declaration facts for an `anon!` function inside a `#[pipevet::func]` body.
#[derive(Debug, Clone, Copy)]
pub struct AnonSite {
    pub module_path: &'static str,
    pub scope: &'static str,
    pub ordinal: u32,
    pub key: Option<&'static str>,
}

/// Identity of one callable: name, visibility, signature, and how generated
/// code can reach it.
#[derive(Debug, Clone)]
pub struct FnDecl {
    name: Option<QualifiedName>,
    label: String,
    visibility: Visibility,
    signature: Signature,
    pointer: Option<PointerToken>,
    path: Option<ItemPath>,
    reachable: bool,
}

impl FnDecl {
    /// A named function (or generic instantiation) with its pointer.
    pub fn declared<P: FnPointer>(site: DeclSite, f: P) -> Self {
        let generic_args: Vec<String> = site.generic_args.iter().map(|a| a.to_string()).collect();
        let name = match site.key {
            Some(key) => QualifiedName::keyed(key),
            None => QualifiedName::named(site.module_path, site.name, &generic_args),
        };
        Self {
            label: name.to_string(),
            name: Some(name),
            visibility: site.visibility,
            signature: P::signature(),
            pointer: Some(f.token()),
            path: Some(ItemPath::new(site.module_path, site.name, generic_args)),
            reachable: site.reachable,
        }
    }

    /// An anonymous function nested in a declared scope. Closures may capture
    /// state, so no pointer or path is recorded.
    pub fn anonymous(site: AnonSite, signature: Signature) -> Self {
        let name = match site.key {
            Some(key) => QualifiedName::keyed(key),
            None => QualifiedName::anonymous(site.module_path, site.scope, site.ordinal),
        };
        Self {
            label: name.to_string(),
            name: Some(name),
            visibility: Visibility::Private,
            signature,
            pointer: None,
            path: None,
            reachable: false,
        }
    }

    /// A keyed anonymous function declared outside any `#[pipevet::func]` scope.
    pub fn keyed_closure(key: &str, signature: Signature) -> Self {
        let name = QualifiedName::keyed(key);
        Self {
            label: name.to_string(),
            name: Some(name),
            visibility: Visibility::Private,
            signature,
            pointer: None,
            path: None,
            reachable: false,
        }
    }

    /// Identity recovered from the function's type name alone. Visibility
    /// cannot be observed this way, so the function counts as not exported.
    pub fn introspected(type_name: &'static str, signature: Signature) -> Self {
        match parse_fn_type_name(type_name) {
            Some((name, path)) => Self {
                label: name.to_string(),
                name: Some(name),
                visibility: Visibility::Private,
                signature,
                pointer: None,
                path: Some(path),
                reachable: false,
            },
            None => Self {
                label: type_name.to_string(),
                name: None,
                visibility: Visibility::Private,
                signature,
                pointer: None,
                path: None,
                reachable: false,
            },
        }
    }

    pub fn name(&self) -> Option<&QualifiedName> {
        self.name.as_ref()
    }

    /// Human-readable identification, available even when the name is not.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn pointer(&self) -> Option<PointerToken> {
        self.pointer
    }

    pub fn path(&self) -> Option<&ItemPath> {
        self.path.as_ref()
    }

    /// Whether generated code at the crate root can name [`path`](Self::path).
    /// Only known when declared; a `pub` item may still sit in a private module.
    pub fn is_path_reachable(&self) -> bool {
        self.reachable && self.path.is_some()
    }

    /// Resolved, not anonymous, and visible to a same-crate companion module.
    pub fn is_exported(&self) -> bool {
        self.visibility.is_exported()
            && self.path.is_some()
            && self.name.as_ref().is_some_and(|n| !n.is_anonymous())
    }
}
