// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Rust source generation for direct-call shims.
//!
//! The output is a module meant to be compiled into the crate that owns the
//! pipeline. Each shim is an install function plus an `inventory`
//! registration, so linking the module is enough for [`global_shims`] to
//! pick the shims up.
//!
//! [`global_shims`]: super::global_shims

use sha2::{Digest, Sha256};

use crate::core::error::{Result, ShimBlocker, VetError};
use crate::core::identity::{FnDecl, ItemPath, SymbolTable, render_type_path};

/// First line of every generated file.
pub const GENERATED_HEADER: &str = "// Code generated by pipevet. DO NOT EDIT.";

/// How generated code reaches a callable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShimRoute {
    /// Declared in the symbol table: reconstructed by name, so the module
    /// path never has to be nameable from the generated file.
    ByName,
    /// Generic instantiation declared reachable: referenced by path.
    Direct(ItemPath),
}

/// Decide how a shim for `decl` would be wired, or why it cannot be.
pub fn shim_route(
    decl: &FnDecl,
    symbols: &SymbolTable,
) -> std::result::Result<ShimRoute, ShimBlocker> {
    let Some(name) = decl.name() else {
        return Err(ShimBlocker::UnresolvableIdentity);
    };
    if name.is_anonymous() {
        return Err(ShimBlocker::Anonymous);
    }
    if symbols.contains(name.as_str()) {
        return Ok(ShimRoute::ByName);
    }
    match decl.path() {
        Some(path) if decl.is_exported() && !path.generic_args().is_empty() => {
            if decl.is_path_reachable() {
                Ok(ShimRoute::Direct(path.clone()))
            } else {
                Err(ShimBlocker::UnreachablePath)
            }
        }
        _ => Err(ShimBlocker::UndeclaredSymbol),
    }
}

struct PlannedShim<'d> {
    name: &'d str,
    decl: &'d FnDecl,
    route: ShimRoute,
}

pub struct ShimGenerator<'a> {
    local_crate: String,
    symbols: &'a SymbolTable,
}

impl<'a> ShimGenerator<'a> {
    /// `package` is the crate the generated file is compiled into; `-` is
    /// accepted and normalized to `_`.
    pub fn new(package: &str, symbols: &'a SymbolTable) -> Result<Self> {
        Ok(Self {
            local_crate: normalize_crate_name(package)?,
            symbols,
        })
    }

    pub fn local_crate(&self) -> &str {
        &self.local_crate
    }

    /// Generate shims for every callable in `decls`, in ascending name
    /// order. Fails on the first callable (in that order) that cannot be
    /// shimmed; nothing is silently left out.
    pub fn generate<'d>(&self, decls: impl IntoIterator<Item = &'d FnDecl>) -> Result<String> {
        let mut decls: Vec<&FnDecl> = decls.into_iter().collect();
        decls.sort_by(|a, b| sort_key(a).cmp(sort_key(b)));
        decls.dedup_by(|a, b| sort_key(a) == sort_key(b));

        let mut planned = Vec::with_capacity(decls.len());
        for decl in decls {
            let route = shim_route(decl, self.symbols).map_err(|blocker| {
                VetError::ShimGeneration {
                    callable: sort_key(decl).to_string(),
                    blocker,
                }
            })?;
            planned.push(PlannedShim {
                name: sort_key(decl),
                decl,
                route,
            });
        }

        let mut code = self.header(&planned);
        if planned.is_empty() {
            code.push('\n');
            code.push_str("// Every callable already has a direct-call shim; nothing to register.\n");
            return Ok(code);
        }

        for (index, shim) in planned.iter().enumerate() {
            code.push('\n');
            code.push_str(&self.install_fn(index, shim));
            code.push('\n');
            code.push_str(&format!(
                "::pipevet::inventory::submit! {{\n    ::pipevet::ShimRegistration::generated({:?}, {:?}, __pipevet_install_{})\n}}\n",
                shim.name,
                shim.decl.signature().to_string(),
                index
            ));
        }

        tracing::debug!(
            "Generated {} shim(s) for crate '{}'",
            planned.len(),
            self.local_crate
        );
        Ok(code)
    }

    fn header(&self, planned: &[PlannedShim<'_>]) -> String {
        let mut hasher = Sha256::new();
        for shim in planned {
            hasher.update(shim.name.as_bytes());
            hasher.update(b"\t");
            hasher.update(shim.decl.signature().to_string().as_bytes());
            hasher.update(b"\n");
        }
        let digest: String = hasher
            .finalize()
            .iter()
            .map(|byte| format!("{byte:02x}"))
            .collect();

        format!(
            "{GENERATED_HEADER}\n// crate: {}\n// shims: {}\n// digest: sha256:{}\n",
            self.local_crate,
            planned.len(),
            digest
        )
    }

    fn install_fn(&self, index: usize, shim: &PlannedShim<'_>) -> String {
        let mut code = format!("// {}\n", shim.name.escape_debug());
        code.push_str(&format!(
            "fn __pipevet_install_{index}() -> ::pipevet::Result<::pipevet::Shim> {{\n"
        ));
        match &shim.route {
            ShimRoute::Direct(path) => {
                code.push_str(&format!(
                    "    ::std::result::Result::Ok(::pipevet::Shim::new({:?}, {}))\n",
                    shim.name,
                    path.render(&self.local_crate)
                ));
            }
            ShimRoute::ByName => {
                let pointer_type = shim
                    .decl
                    .signature()
                    .render_with(|ty| render_type_path(ty, &self.local_crate));
                code.push_str(&format!(
                    "    let f: {pointer_type} = ::pipevet::load_symbol({:?})?;\n",
                    shim.name
                ));
                code.push_str(&format!(
                    "    ::std::result::Result::Ok(::pipevet::Shim::new({:?}, f))\n",
                    shim.name
                ));
            }
        }
        code.push_str("}\n");
        code
    }
}

fn sort_key(decl: &FnDecl) -> &str {
    decl.name().map(|n| n.as_str()).unwrap_or_else(|| decl.label())
}

fn normalize_crate_name(package: &str) -> Result<String> {
    let normalized = package.trim().replace('-', "_");
    let mut chars = normalized.chars();
    let valid = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && normalized != "_";
    if !valid {
        return Err(VetError::Configuration(format!(
            "'{package}' is not a valid crate name"
        )));
    }
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::identity::FnPointer;
    use crate::core::identity::{AnonSite, DeclSite, Signature, SymbolEntry, Visibility};

    fn ident(x: i64) -> i64 {
        x
    }

    fn site(module_path: &'static str, name: &'static str, visibility: Visibility) -> DeclSite {
        DeclSite {
            module_path,
            name,
            key: None,
            visibility,
            reachable: false,
            generic_args: vec![],
        }
    }

    fn declared(module_path: &'static str, name: &'static str, visibility: Visibility) -> FnDecl {
        FnDecl::declared(site(module_path, name, visibility), ident as fn(i64) -> i64)
    }

    fn declare_a() -> FnDecl {
        declared("app::pipelines", "a_fn", Visibility::Crate)
    }

    fn declare_b() -> FnDecl {
        declared("app::pipelines", "b_fn", Visibility::Public)
    }

    fn declare_private() -> FnDecl {
        declared("app::pipelines", "plus1", Visibility::Private)
    }

    fn declare_hidden() -> FnDecl {
        declared("app::pipelines::hidden", "tripled", Visibility::Public)
    }

    fn declare_split_key() -> FnDecl {
        let mut site = site("app::pipelines", "split", Visibility::Public);
        site.key = Some("split\nwords");
        FnDecl::declared(site, ident as fn(i64) -> i64)
    }

    fn generic_identity(reachable: bool) -> FnDecl {
        let mut site = site("app::pipelines", "identity", Visibility::Public);
        site.reachable = reachable;
        site.generic_args = vec!["i64"];
        FnDecl::declared(site, ident as fn(i64) -> i64)
    }

    fn int_signature() -> Signature {
        <fn(i64) -> i64 as FnPointer>::signature()
    }

    #[test]
    fn test_stub_for_no_shims() {
        let symbols = SymbolTable::new();
        let code = ShimGenerator::new("app", &symbols)
            .unwrap()
            .generate(std::iter::empty())
            .unwrap();
        assert!(code.starts_with(GENERATED_HEADER));
        assert!(code.contains("// shims: 0"));
        assert!(!code.contains("fn __pipevet_install"));
        assert!(!code.contains("submit!"));
    }

    #[test]
    fn test_declared_shims_sorted_by_name() {
        let symbols =
            SymbolTable::from_entries(&[SymbolEntry::new(declare_b), SymbolEntry::new(declare_a)]);
        let (a, b) = (declare_a(), declare_b());
        let code = ShimGenerator::new("app", &symbols)
            .unwrap()
            .generate([&b, &a])
            .unwrap();

        let first = code.find("\"app::pipelines.a_fn\"").unwrap();
        let second = code.find("\"app::pipelines.b_fn\"").unwrap();
        assert!(first < second);
        assert!(code.contains(
            "let f: fn(i64) -> i64 = ::pipevet::load_symbol(\"app::pipelines.a_fn\")?;"
        ));
        assert!(code.contains(
            "::pipevet::ShimRegistration::generated(\"app::pipelines.b_fn\", \"fn(i64) -> i64\", __pipevet_install_1)"
        ));
        assert!(code.contains("// shims: 2"));
    }

    #[test]
    fn test_private_declared_goes_through_symbol_table() {
        let symbols = SymbolTable::from_entries(&[SymbolEntry::new(declare_private)]);
        let decl = declare_private();
        let code = ShimGenerator::new("app", &symbols)
            .unwrap()
            .generate([&decl])
            .unwrap();
        assert!(code.contains(
            "let f: fn(i64) -> i64 = ::pipevet::load_symbol(\"app::pipelines.plus1\")?;"
        ));
    }

    #[test]
    fn test_public_fn_in_private_module_is_not_named_by_path() {
        let symbols = SymbolTable::from_entries(&[SymbolEntry::new(declare_hidden)]);
        let decl = declare_hidden();
        assert!(decl.is_exported());
        assert_eq!(shim_route(&decl, &symbols), Ok(ShimRoute::ByName));

        let code = ShimGenerator::new("app", &symbols)
            .unwrap()
            .generate([&decl])
            .unwrap();
        assert!(!code.contains("crate::pipelines::hidden"));
        assert!(code.contains("::pipevet::load_symbol(\"app::pipelines::hidden.tripled\")?"));
    }

    #[test]
    fn test_reachable_generic_is_named_by_path() {
        let symbols = SymbolTable::new();
        let decl = generic_identity(true);
        let code = ShimGenerator::new("app", &symbols)
            .unwrap()
            .generate([&decl])
            .unwrap();
        assert!(code.contains(
            "::pipevet::Shim::new(\"app::pipelines.identity[i64]\", crate::pipelines::identity::<i64>)"
        ));
    }

    #[test]
    fn test_generic_without_reachable_path_fails() {
        let symbols = SymbolTable::new();
        let decl = generic_identity(false);
        let err = ShimGenerator::new("app", &symbols)
            .unwrap()
            .generate([&decl])
            .unwrap_err();
        match err {
            VetError::ShimGeneration { callable, blocker } => {
                assert_eq!(callable, "app::pipelines.identity[i64]");
                assert_eq!(blocker, ShimBlocker::UnreachablePath);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_private_undeclared_fails() {
        let symbols = SymbolTable::new();
        let decl = declare_private();
        let err = ShimGenerator::new("app", &symbols)
            .unwrap()
            .generate([&decl])
            .unwrap_err();
        assert!(matches!(
            err,
            VetError::ShimGeneration {
                blocker: ShimBlocker::UndeclaredSymbol,
                ..
            }
        ));
    }

    #[test]
    fn test_control_characters_in_key_stay_inside_comment() {
        let symbols = SymbolTable::from_entries(&[SymbolEntry::new(declare_split_key)]);
        let decl = declare_split_key();
        let code = ShimGenerator::new("app", &symbols)
            .unwrap()
            .generate([&decl])
            .unwrap();
        assert!(code.contains("// split\\nwords\n"));
        assert!(code.contains("::pipevet::load_symbol(\"split\\nwords\")?"));
        assert!(code.lines().all(|line| line != "words"));
    }

    #[test]
    fn test_anonymous_fails_with_its_name() {
        let symbols = SymbolTable::new();
        let anon = FnDecl::anonymous(
            AnonSite {
                module_path: "app::pipelines",
                scope: "anonymous",
                ordinal: 1,
                key: None,
            },
            int_signature(),
        );
        let err = ShimGenerator::new("app", &symbols)
            .unwrap()
            .generate([&anon])
            .unwrap_err();
        match err {
            VetError::ShimGeneration { callable, blocker } => {
                assert_eq!(callable, "app::pipelines.anonymous.func1");
                assert_eq!(blocker, ShimBlocker::Anonymous);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unresolved_fails() {
        let symbols = SymbolTable::new();
        let closure = FnDecl::introspected("app::pipelines::build::{{closure}}", int_signature());
        let err = ShimGenerator::new("app", &symbols)
            .unwrap()
            .generate([&closure])
            .unwrap_err();
        assert!(matches!(
            err,
            VetError::ShimGeneration {
                blocker: ShimBlocker::UnresolvableIdentity,
                ..
            }
        ));
    }

    #[test]
    fn test_output_is_deterministic() {
        let symbols =
            SymbolTable::from_entries(&[SymbolEntry::new(declare_a), SymbolEntry::new(declare_b)]);
        let (a, b) = (declare_a(), declare_b());
        let generator = ShimGenerator::new("app", &symbols).unwrap();
        assert_eq!(
            generator.generate([&a, &b]).unwrap(),
            generator.generate([&b, &a]).unwrap()
        );
    }

    #[test]
    fn test_crate_name_validation() {
        let symbols = SymbolTable::new();
        assert_eq!(
            ShimGenerator::new("my-app", &symbols).unwrap().local_crate(),
            "my_app"
        );
        assert!(matches!(
            ShimGenerator::new("9lives", &symbols),
            Err(VetError::Configuration(_))
        ));
        assert!(ShimGenerator::new("", &symbols).is_err());
        assert!(ShimGenerator::new("a::b", &symbols).is_err());
    }
}
