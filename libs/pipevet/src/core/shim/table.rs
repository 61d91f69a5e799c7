// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use std::collections::HashMap;
use std::sync::OnceLock;

use super::{Shim, ShimRegistration};

/// Load-time table of direct-call shims keyed by qualified name.
#[derive(Default, Debug)]
pub struct ShimTable {
    shims: HashMap<String, Shim>,
}

impl ShimTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run every registration's install function.
    ///
    /// Failed installs and shims that no longer match the name or signature
    /// recorded at generation time are skipped with a warning, so a stale
    /// generated file degrades to the reflection fallback instead of
    /// calling the wrong function.
    pub fn from_registrations<'a>(
        registrations: impl IntoIterator<Item = &'a ShimRegistration>,
    ) -> Self {
        let mut table = Self::new();
        for registration in registrations {
            let shim = match registration.install() {
                Ok(shim) => shim,
                Err(e) => {
                    tracing::warn!("Shim registration failed, skipping: {}", e);
                    continue;
                }
            };
            if let Some((name, signature)) = registration.expected() {
                if shim.name() != name {
                    tracing::warn!(
                        "Generated shim '{}' installed as '{}', skipping",
                        name,
                        shim.name()
                    );
                    continue;
                }
                let installed = shim.signature().to_string();
                if installed != signature {
                    tracing::warn!(
                        "Generated shim '{}' is stale: recorded `{}`, function is now `{}`",
                        name,
                        signature,
                        installed
                    );
                    continue;
                }
            }
            table.insert(shim);
        }
        table
    }

    /// Add a shim. Returns `false` and keeps the existing one when the name
    /// is already registered.
    pub fn insert(&mut self, shim: Shim) -> bool {
        if self.shims.contains_key(shim.name()) {
            tracing::warn!(
                "Shim '{}' is registered more than once, keeping the first",
                shim.name()
            );
            return false;
        }
        tracing::debug!("[register] shim '{}' {}", shim.name(), shim.signature());
        self.shims.insert(shim.name().to_string(), shim);
        true
    }

    pub fn get(&self, name: &str) -> Option<&Shim> {
        self.shims.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.shims.contains_key(name)
    }

    /// Registered names in ascending order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.shims.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.shims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shims.is_empty()
    }
}

static GLOBAL_SHIMS: OnceLock<ShimTable> = OnceLock::new();

/// Shim table built from every registration linked into the binary.
pub fn global_shims() -> &'static ShimTable {
    GLOBAL_SHIMS.get_or_init(|| {
        let table = ShimTable::from_registrations(inventory::iter::<ShimRegistration>);
        tracing::debug!("Collected {} direct-call shims", table.len());
        table
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::{Result, VetError};

    fn install_negate() -> Result<Shim> {
        Ok(Shim::new("app.negate", |x: i64| -x))
    }

    fn install_negate_twice() -> Result<Shim> {
        Ok(Shim::new("app.negate", |x: i64| x))
    }

    fn install_failing() -> Result<Shim> {
        Err(VetError::UnknownSymbol {
            name: "app.gone".to_string(),
        })
    }

    #[test]
    fn test_generated_registration_installs() {
        let registrations = [ShimRegistration::generated(
            "app.negate",
            "fn(i64) -> i64",
            install_negate,
        )];
        let table = ShimTable::from_registrations(&registrations);
        assert!(table.contains("app.negate"));
        assert_eq!(table.names(), vec!["app.negate"]);
    }

    #[test]
    fn test_stale_signature_is_skipped() {
        let registrations = [ShimRegistration::generated(
            "app.negate",
            "fn(i32) -> i32",
            install_negate,
        )];
        let table = ShimTable::from_registrations(&registrations);
        assert!(table.is_empty());
    }

    #[test]
    fn test_renamed_shim_is_skipped() {
        let registrations = [ShimRegistration::generated(
            "app.other",
            "fn(i64) -> i64",
            install_negate,
        )];
        assert!(ShimTable::from_registrations(&registrations).is_empty());
    }

    #[test]
    fn test_failed_install_is_skipped() {
        let registrations = [
            ShimRegistration::manual(install_failing),
            ShimRegistration::manual(install_negate),
        ];
        let table = ShimTable::from_registrations(&registrations);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_duplicate_keeps_first() {
        let registrations = [
            ShimRegistration::manual(install_negate),
            ShimRegistration::manual(install_negate_twice),
        ];
        let table = ShimTable::from_registrations(&registrations);
        let out = table
            .get("app.negate")
            .unwrap()
            .call(vec![crate::core::callable::Datum::new(5i64)])
            .unwrap();
        assert_eq!(out.downcast::<i64>().unwrap(), -5);
    }
}
