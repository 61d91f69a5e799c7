// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Fixture pipelines.
//!
//! - [`construct_pipeline`]: shimmed by the checked-in `generated_shims.rs`
//! - [`performant`]: shimmed by hand with `register_shim!`
//! - [`shim_needed`]: exported functions nobody registered
//! - [`anonymous`]: an anonymous function, which cannot be shimmed

use pipevet::Pipeline;

#[pipevet::func]
pub fn ident_int(x: i64) -> i64 {
    x
}

#[pipevet::func]
fn plus1_int(x: i64) -> i64 {
    x + 1
}

#[pipevet::func(reachable)]
pub fn identity<T: Clone>(x: T) -> T {
    x
}

#[pipevet::func(key = "testpipeline.count_chars")]
pub fn count_chars(s: String) -> usize {
    s.chars().count()
}

pub mod nested {
    mod hidden {
        #[pipevet::func]
        pub fn tripled(x: i64) -> i64 {
            x * 3
        }
    }

    /// `tripled` is `pub`, but no path from the crate root reaches it.
    pub fn tripled_int() -> pipevet::Callable {
        hidden::tripled::callable()
    }
}

/// Every callable here is covered by `generated_shims.rs`.
pub fn construct_pipeline() -> anyhow::Result<Pipeline> {
    let mut p = Pipeline::new();
    let mut root = p.root();

    let inputs = root.create(vec![1i64, 2, 3]);
    let same = root.par_do(ident_int::callable(), &inputs)?;
    let plus1 = root.par_do(plus1_int::callable(), &same)?;
    let same = root.par_do(identity::callable::<i64>(), &plus1)?;
    root.par_do(nested::tripled_int(), &same)?;

    let mut words = root.scope("words");
    let lines = words.create(vec!["a b".to_string(), "c".to_string()]);
    words.par_do(count_chars::callable(), &lines)?;

    Ok(p)
}

#[pipevet::func]
pub fn square_int(x: i64) -> i64 {
    x * x
}

#[pipevet::func]
pub fn add_int(a: i64, b: i64) -> i64 {
    a + b
}

pipevet::register_shim!(square_int);
pipevet::register_shim!(add_int);

pub fn performant() -> anyhow::Result<Pipeline> {
    let mut p = Pipeline::new();
    let mut root = p.root();
    let inputs = root.create(vec![1i64, 2, 3]);
    let squares = root.par_do(square_int::callable(), &inputs)?;
    root.combine(vec![add_int::callable()], &squares)?;
    Ok(p)
}

#[pipevet::func]
pub fn double_int(x: i64) -> i64 {
    x * 2
}

#[pipevet::func]
pub fn negate_int(x: i64) -> i64 {
    -x
}

pub fn shim_needed() -> anyhow::Result<Pipeline> {
    let mut p = Pipeline::new();
    let mut root = p.root();
    let inputs = root.create(vec![1i64, 2, 3]);
    let negated = root.par_do(negate_int::callable(), &inputs)?;
    root.par_do(double_int::callable(), &negated)?;
    Ok(p)
}

#[pipevet::func]
pub fn anonymous() -> anyhow::Result<Pipeline> {
    let mut p = Pipeline::new();
    let mut root = p.root();
    let inputs = root.create(vec![1i64, 2, 3]);
    root.par_do(anon!(|x: i64| x + 10), &inputs)?;
    Ok(p)
}
