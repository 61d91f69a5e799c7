// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Qualified names and the Rust paths generated code uses to reach a function.

use std::cmp::Ordering;
use std::fmt;

/// How a qualified name was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameKind {
    /// `<module-path>.<fn>`, optionally with `[generic, args]`.
    Named,
    /// `<module-path>.<enclosing-fn>.funcN`, N counted in source order.
    Anonymous,
    /// Explicit key given at declaration time, used verbatim.
    Keyed,
}

/// Stable identity string of a callable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    text: String,
    kind: NameKind,
}

impl QualifiedName {
    pub fn named(module_path: &str, leaf: &str, generic_args: &[String]) -> Self {
        let mut text = format!("{module_path}.{leaf}");
        if !generic_args.is_empty() {
            text.push('[');
            text.push_str(&generic_args.join(", "));
            text.push(']');
        }
        Self {
            text,
            kind: NameKind::Named,
        }
    }

    pub fn anonymous(module_path: &str, scope: &str, ordinal: u32) -> Self {
        Self {
            text: format!("{module_path}.{scope}.func{ordinal}"),
            kind: NameKind::Anonymous,
        }
    }

    pub fn keyed(key: &str) -> Self {
        Self {
            text: key.to_string(),
            kind: NameKind::Keyed,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> NameKind {
        self.kind
    }

    pub fn is_anonymous(&self) -> bool {
        self.kind == NameKind::Anonymous
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl Ord for QualifiedName {
    fn cmp(&self, other: &Self) -> Ordering {
        self.text.cmp(&other.text)
    }
}

impl PartialOrd for QualifiedName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Declared visibility of a function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    Public,
    /// `pub(crate)`
    Crate,
    /// `pub(super)`, `pub(self)`, `pub(in path)`
    Restricted,
    #[default]
    Private,
}

impl Visibility {
    /// Whether a companion module compiled into the same crate may name the
    /// function directly.
    pub fn is_exported(self) -> bool {
        matches!(self, Visibility::Public | Visibility::Crate)
    }
}

/// Rust path of a function item, as written in `module_path!()` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemPath {
    module_path: String,
    item: String,
    generic_args: Vec<String>,
}

impl ItemPath {
    pub fn new(module_path: &str, item: &str, generic_args: Vec<String>) -> Self {
        Self {
            module_path: module_path.to_string(),
            item: item.to_string(),
            generic_args,
        }
    }

    pub fn module_path(&self) -> &str {
        &self.module_path
    }

    pub fn item(&self) -> &str {
        &self.item
    }

    pub fn generic_args(&self) -> &[String] {
        &self.generic_args
    }

    /// Path expression usable from a module compiled into `local_crate`.
    pub fn render(&self, local_crate: &str) -> String {
        let mut out = render_type_path(&format!("{}::{}", self.module_path, self.item), local_crate);
        if !self.generic_args.is_empty() {
            let args: Vec<String> = self
                .generic_args
                .iter()
                .map(|arg| render_type_path(arg, local_crate))
                .collect();
            out.push_str("::<");
            out.push_str(&args.join(", "));
            out.push('>');
        }
        out
    }
}

/// `type_name` paths whose defining module is private in std.
const STD_REEXPORTS: &[(&str, &str)] = &[
    ("std::collections::hash::map::HashMap", "::std::collections::HashMap"),
    ("std::collections::hash::set::HashSet", "::std::collections::HashSet"),
    ("alloc::collections::btree::map::BTreeMap", "::std::collections::BTreeMap"),
    ("alloc::collections::btree::set::BTreeSet", "::std::collections::BTreeSet"),
    ("alloc::collections::vec_deque::VecDeque", "::std::collections::VecDeque"),
    ("alloc::collections::binary_heap::BinaryHeap", "::std::collections::BinaryHeap"),
    ("alloc::collections::linked_list::LinkedList", "::std::collections::LinkedList"),
];

/// Rewrite every path inside a `type_name`-style string so it resolves from
/// a module of `local_crate`: the local crate becomes `crate`, the standard
/// library crates become `::std`, and other crates get a leading `::`.
pub fn render_type_path(text: &str, local_crate: &str) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    let bytes = text.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i] as char;
        if c.is_ascii_alphabetic() || c == '_' {
            let start = i;
            while i < bytes.len() {
                let ch = bytes[i] as char;
                if ch.is_ascii_alphanumeric() || ch == '_' {
                    i += 1;
                } else if text[i..].starts_with("::")
                    && text[i + 2..]
                        .chars()
                        .next()
                        .is_some_and(|n| n.is_ascii_alphabetic() || n == '_')
                {
                    i += 2;
                } else {
                    break;
                }
            }
            out.push_str(&rewrite_path(&text[start..i], local_crate));
        } else if let Some(ch) = text[i..].chars().next() {
            out.push(ch);
            i += ch.len_utf8();
        } else {
            break;
        }
    }

    out
}

fn rewrite_path(path: &str, local_crate: &str) -> String {
    let Some((first, rest)) = path.split_once("::") else {
        return path.to_string();
    };
    if let Some((_, public)) = STD_REEXPORTS.iter().find(|(private, _)| *private == path) {
        return public.to_string();
    }
    match first {
        _ if first == local_crate => format!("crate::{rest}"),
        "alloc" | "core" | "std" => format!("::std::{rest}"),
        _ => format!("::{path}"),
    }
}

/// Parse the `type_name` of a function item type into a name and path.
///
/// The leaf is the last path segment outside any generic argument list, so
/// methods of generic types (`app::Wrapper<i32>::get`) keep the type's
/// arguments in the module part. Returns `None` for closures and for
/// anything that is not a plain path (trait-qualified methods, function
/// pointer types).
pub fn parse_fn_type_name(type_name: &str) -> Option<(QualifiedName, ItemPath)> {
    if type_name.contains("{{closure}}") || type_name.starts_with('<') || type_name.starts_with("fn(")
    {
        return None;
    }

    let (module_path, leaf) = split_last_segment(type_name)?;
    let (leaf, generic_args) = match leaf.find('<') {
        Some(open) if leaf.ends_with('>') => (
            &leaf[..open],
            split_generic_args(&leaf[open + 1..leaf.len() - 1]),
        ),
        Some(_) => return None,
        None => (leaf, Vec::new()),
    };
    if module_path.is_empty() || leaf.is_empty() {
        return None;
    }

    Some((
        QualifiedName::named(module_path, leaf, &generic_args),
        ItemPath::new(module_path, leaf, generic_args),
    ))
}

/// Split at the last `::` that is not nested in `<..>`, `(..)` or `[..]`.
fn split_last_segment(path: &str) -> Option<(&str, &str)> {
    let bytes = path.as_bytes();
    let mut depth = 0i32;
    let mut split = None;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'<' | b'(' | b'[' => depth += 1,
            b'>' if i > 0 && bytes[i - 1] == b'-' => {}
            b'>' | b')' | b']' => depth -= 1,
            b':' if depth == 0 && bytes.get(i + 1) == Some(&b':') => {
                split = Some(i);
                i += 1;
            }
            _ => {}
        }
        i += 1;
    }
    split.map(|at| (&path[..at], &path[at + 2..]))
}

fn split_generic_args(args: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, c) in args.char_indices() {
        match c {
            '<' | '(' | '[' => depth += 1,
            '>' if i > 0 && args.as_bytes()[i - 1] == b'-' => {}
            '>' | ')' | ']' => depth -= 1,
            ',' if depth == 0 => {
                out.push(args[start..i].trim().to_string());
                start = i + 1;
            }
            _ => {}
        }
    }
    let last = args[start..].trim();
    if !last.is_empty() {
        out.push(last.to_string());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_and_generic_names() {
        let plain = QualifiedName::named("my_crate::pipelines", "ident_int", &[]);
        assert_eq!(plain.as_str(), "my_crate::pipelines.ident_int");

        let generic = QualifiedName::named(
            "my_crate::pipelines",
            "pair",
            &["i64".to_string(), "bool".to_string()],
        );
        assert_eq!(generic.as_str(), "my_crate::pipelines.pair[i64, bool]");
    }

    #[test]
    fn test_anonymous_name() {
        let name = QualifiedName::anonymous("my_crate::pipelines", "construct", 2);
        assert_eq!(name.as_str(), "my_crate::pipelines.construct.func2");
        assert!(name.is_anonymous());
    }

    #[test]
    fn test_names_sort_lexically() {
        let mut names = vec![
            QualifiedName::named("m", "b", &[]),
            QualifiedName::keyed("a.key"),
            QualifiedName::named("m", "a", &[]),
        ];
        names.sort();
        let texts: Vec<&str> = names.iter().map(|n| n.as_str()).collect();
        assert_eq!(texts, vec!["a.key", "m.a", "m.b"]);
    }

    #[test]
    fn test_render_type_path() {
        assert_eq!(render_type_path("i64", "app"), "i64");
        assert_eq!(
            render_type_path("alloc::string::String", "app"),
            "::std::string::String"
        );
        assert_eq!(
            render_type_path("alloc::vec::Vec<app::model::Word>", "app"),
            "::std::vec::Vec<crate::model::Word>"
        );
        assert_eq!(
            render_type_path("std::collections::hash::map::HashMap<i64, other::Thing>", "app"),
            "::std::collections::HashMap<i64, ::other::Thing>"
        );
        assert_eq!(render_type_path("(i64, &'static str)", "app"), "(i64, &'static str)");
    }

    #[test]
    fn test_item_path_render() {
        let path = ItemPath::new("app::pipelines", "identity", vec!["alloc::string::String".into()]);
        assert_eq!(
            path.render("app"),
            "crate::pipelines::identity::<::std::string::String>"
        );
        let root = ItemPath::new("app", "run", vec![]);
        assert_eq!(root.render("app"), "crate::run");
        let foreign = ItemPath::new("lib_fns::text", "upper", vec![]);
        assert_eq!(foreign.render("app"), "::lib_fns::text::upper");
    }

    #[test]
    fn test_parse_fn_type_name() {
        let (name, path) = parse_fn_type_name("app::pipelines::ident_int").unwrap();
        assert_eq!(name.as_str(), "app::pipelines.ident_int");
        assert_eq!(path.module_path(), "app::pipelines");
        assert_eq!(path.item(), "ident_int");

        let (name, path) =
            parse_fn_type_name("app::pipelines::pair<i64, alloc::vec::Vec<u8>>").unwrap();
        assert_eq!(name.as_str(), "app::pipelines.pair[i64, alloc::vec::Vec<u8>]");
        assert_eq!(path.generic_args(), ["i64", "alloc::vec::Vec<u8>"]);
    }

    #[test]
    fn test_parse_method_of_generic_type() {
        let (name, path) = parse_fn_type_name("app::Wrapper<i32>::get").unwrap();
        assert_eq!(name.as_str(), "app::Wrapper<i32>.get");
        assert_eq!(path.module_path(), "app::Wrapper<i32>");
        assert_eq!(path.item(), "get");
        assert!(path.generic_args().is_empty());

        let (name, path) =
            parse_fn_type_name("app::Wrapper<alloc::vec::Vec<u8>>::map<fn(u8) -> u8>").unwrap();
        assert_eq!(name.as_str(), "app::Wrapper<alloc::vec::Vec<u8>>.map[fn(u8) -> u8]");
        assert_eq!(path.generic_args(), ["fn(u8) -> u8"]);
    }

    #[test]
    fn test_parse_rejects_closures_and_pointers() {
        assert!(parse_fn_type_name("app::pipelines::construct::{{closure}}").is_none());
        assert!(parse_fn_type_name("fn(i64) -> i64").is_none());
        assert!(parse_fn_type_name("<app::Thing as app::Trait>::run").is_none());
        assert!(parse_fn_type_name("bare").is_none());
    }

    #[test]
    fn test_visibility_exported() {
        assert!(Visibility::Public.is_exported());
        assert!(Visibility::Crate.is_exported());
        assert!(!Visibility::Restricted.is_exported());
        assert!(!Visibility::Private.is_exported());
    }
}
