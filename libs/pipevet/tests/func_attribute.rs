// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Integration tests for the `#[pipevet::func]` attribute and `anon!`.

use pipevet::identity::{NameKind, global_symbols};
use pipevet::{Callable, Datum, VetError, Visibility, global_shims, identify, load_symbol};

#[pipevet::func]
pub fn ident_int(x: i64) -> i64 {
    x
}

#[pipevet::func]
fn plus1(x: i64) -> i64 {
    x + 1
}

#[pipevet::func(key = "words.count")]
pub(crate) fn count_words(line: String) -> usize {
    line.split_whitespace().count()
}

#[pipevet::func]
pub fn identity<T: Clone>(x: T) -> T {
    x
}

#[pipevet::func]
pub fn shimmed(a: i64, b: i64) -> i64 {
    a * b
}

pipevet::register_shim!(shimmed);

#[pipevet::func]
fn closures() -> Vec<Callable> {
    let scale = 3i64;
    let first = anon!(move |x: i64| x * scale);
    vec![
        first,
        anon!(|x: i64| x - 1),
        anon!(key = "closures.double", |x: i64| x * 2),
    ]
}

mod nested {
    #[pipevet::func]
    pub fn shout(s: String) -> String {
        s.to_uppercase()
    }
}

#[test]
fn test_declared_names() {
    let name = identify(&ident_int::callable()).unwrap();
    assert_eq!(name.as_str(), "func_attribute.ident_int");
    assert_eq!(name.kind(), NameKind::Named);

    let nested = identify(&nested::shout::callable()).unwrap();
    assert_eq!(nested.as_str(), "func_attribute::nested.shout");
}

#[test]
fn test_declared_visibility() {
    assert_eq!(ident_int::declaration().visibility(), Visibility::Public);
    assert!(ident_int::declaration().is_exported());
    assert_eq!(plus1::declaration().visibility(), Visibility::Private);
    assert!(!plus1::declaration().is_exported());
    assert_eq!(count_words::declaration().visibility(), Visibility::Crate);
}

#[test]
fn test_keyed_function() {
    let name = identify(&count_words::callable()).unwrap();
    assert_eq!(name.as_str(), "words.count");
    assert_eq!(name.kind(), NameKind::Keyed);
}

#[test]
fn test_generic_instantiations() {
    let a = identify(&identity::callable::<i64>()).unwrap();
    let b = identify(&identity::callable::<String>()).unwrap();
    assert_eq!(a.as_str(), "func_attribute.identity[i64]");
    assert_eq!(b.as_str(), "func_attribute.identity[alloc::string::String]");
    assert!(!global_symbols().contains("func_attribute.identity"));
}

#[test]
fn test_private_function_loads_by_name() {
    assert!(global_symbols().contains("func_attribute.plus1"));
    let f: fn(i64) -> i64 = load_symbol("func_attribute.plus1").unwrap();
    assert_eq!(f(41), 42);

    let wrong = load_symbol::<fn(i32) -> i32>("func_attribute.plus1");
    assert!(matches!(wrong, Err(VetError::SignatureMismatch { .. })));
}

#[test]
fn test_anonymous_ordinals_follow_source_order() {
    let names: Vec<String> = closures()
        .iter()
        .map(|c| identify(c).unwrap().to_string())
        .collect();
    assert_eq!(
        names,
        vec![
            "func_attribute.closures.func1",
            "func_attribute.closures.func2",
            "closures.double",
        ]
    );
    assert!(!closures()[0].decl().is_exported());
}

#[test]
fn test_anon_outside_declared_scope() {
    let unresolved = pipevet::anon!(|x: i64| x);
    assert!(matches!(
        identify(&unresolved),
        Err(VetError::UnresolvableIdentity { .. })
    ));

    let keyed = pipevet::anon!(key = "outside.key", |x: i64| x);
    assert_eq!(identify(&keyed).unwrap().as_str(), "outside.key");
}

#[test]
fn test_registered_shim_is_used() {
    assert!(global_shims().contains("func_attribute.shimmed"));
    let out = shimmed::callable()
        .invoke(vec![Datum::new(6i64), Datum::new(7i64)])
        .unwrap();
    assert_eq!(out.downcast::<i64>().unwrap(), 42);
}

#[test]
fn test_unshimmed_callable_still_invokes() {
    assert!(!global_shims().contains("func_attribute.plus1"));
    let out = plus1::callable().invoke(vec![Datum::new(1i64)]).unwrap();
    assert_eq!(out.downcast::<i64>().unwrap(), 2);
}
