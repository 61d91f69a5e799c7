// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Load-time table of declared functions, keyed by qualified name.

use std::collections::HashMap;
use std::sync::OnceLock;

use super::decl::FnDecl;
use super::pointer::FnPointer;
use crate::core::error::{Result, VetError};

/// Registration emitted by `#[pipevet::func]` for every non-generic function.
pub struct SymbolEntry {
    declare: fn() -> FnDecl,
}

impl SymbolEntry {
    pub const fn new(declare: fn() -> FnDecl) -> Self {
        Self { declare }
    }

    pub fn declaration(&self) -> FnDecl {
        (self.declare)()
    }
}

inventory::collect!(SymbolEntry);

#[derive(Default, Debug)]
pub struct SymbolTable {
    symbols: HashMap<String, FnDecl>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a SymbolEntry>) -> Self {
        let mut table = Self::new();
        for entry in entries {
            table.insert(entry.declaration());
        }
        table
    }

    /// Add a declaration. Returns `false` (and keeps the existing entry) when
    /// the name is already taken or the declaration has no name or pointer.
    pub fn insert(&mut self, decl: FnDecl) -> bool {
        let Some(name) = decl.name() else {
            tracing::warn!("Symbol '{}' has no qualified name, skipping", decl.label());
            return false;
        };
        if decl.pointer().is_none() {
            tracing::warn!("Symbol '{}' has no function pointer, skipping", name);
            return false;
        }
        let key = name.to_string();
        if self.symbols.contains_key(&key) {
            tracing::warn!("Symbol '{}' is declared more than once, keeping the first", key);
            return false;
        }
        self.symbols.insert(key, decl);
        true
    }

    pub fn get(&self, name: &str) -> Option<&FnDecl> {
        self.symbols.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    /// Reconstruct the typed function pointer declared under `name`.
    pub fn load<F: FnPointer>(&self, name: &str) -> Result<F> {
        let decl = self.get(name).ok_or_else(|| VetError::UnknownSymbol {
            name: name.to_string(),
        })?;
        let token = decl.pointer().ok_or_else(|| VetError::UnknownSymbol {
            name: name.to_string(),
        })?;
        super::reconstruct::<F>(token, decl.signature())
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

static GLOBAL_SYMBOLS: OnceLock<SymbolTable> = OnceLock::new();

/// Symbol table built from every `#[pipevet::func]` linked into the binary.
pub fn global_symbols() -> &'static SymbolTable {
    GLOBAL_SYMBOLS.get_or_init(|| {
        let table = SymbolTable::from_entries(inventory::iter::<SymbolEntry>);
        tracing::debug!("Collected {} declared transform functions", table.len());
        table
    })
}

/// Look up a declared function by name in the global symbol table.
pub fn load_symbol<F: FnPointer>(name: &str) -> Result<F> {
    global_symbols().load(name)
}
