// Code generated by pipevet. DO NOT EDIT.
// crate: pipevet_testpipeline
// shims: 5
// digest: sha256:559376811aa25558ba1066b7a291111d00f7ec88882840a4fdf8e82a5992a2c6

// pipevet_testpipeline::pipelines.ident_int
fn __pipevet_install_0() -> ::pipevet::Result<::pipevet::Shim> {
    let f: fn(i64) -> i64 = ::pipevet::load_symbol("pipevet_testpipeline::pipelines.ident_int")?;
    ::std::result::Result::Ok(::pipevet::Shim::new("pipevet_testpipeline::pipelines.ident_int", f))
}

::pipevet::inventory::submit! {
    ::pipevet::ShimRegistration::generated("pipevet_testpipeline::pipelines.ident_int", "fn(i64) -> i64", __pipevet_install_0)
}

// pipevet_testpipeline::pipelines.identity[i64]
fn __pipevet_install_1() -> ::pipevet::Result<::pipevet::Shim> {
    ::std::result::Result::Ok(::pipevet::Shim::new("pipevet_testpipeline::pipelines.identity[i64]", crate::pipelines::identity::<i64>))
}

::pipevet::inventory::submit! {
    ::pipevet::ShimRegistration::generated("pipevet_testpipeline::pipelines.identity[i64]", "fn(i64) -> i64", __pipevet_install_1)
}

// pipevet_testpipeline::pipelines.plus1_int
fn __pipevet_install_2() -> ::pipevet::Result<::pipevet::Shim> {
    let f: fn(i64) -> i64 = ::pipevet::load_symbol("pipevet_testpipeline::pipelines.plus1_int")?;
    ::std::result::Result::Ok(::pipevet::Shim::new("pipevet_testpipeline::pipelines.plus1_int", f))
}

::pipevet::inventory::submit! {
    ::pipevet::ShimRegistration::generated("pipevet_testpipeline::pipelines.plus1_int", "fn(i64) -> i64", __pipevet_install_2)
}

// pipevet_testpipeline::pipelines::nested::hidden.tripled
fn __pipevet_install_3() -> ::pipevet::Result<::pipevet::Shim> {
    let f: fn(i64) -> i64 = ::pipevet::load_symbol("pipevet_testpipeline::pipelines::nested::hidden.tripled")?;
    ::std::result::Result::Ok(::pipevet::Shim::new("pipevet_testpipeline::pipelines::nested::hidden.tripled", f))
}

::pipevet::inventory::submit! {
    ::pipevet::ShimRegistration::generated("pipevet_testpipeline::pipelines::nested::hidden.tripled", "fn(i64) -> i64", __pipevet_install_3)
}

// testpipeline.count_chars
fn __pipevet_install_4() -> ::pipevet::Result<::pipevet::Shim> {
    let f: fn(::std::string::String) -> usize = ::pipevet::load_symbol("testpipeline.count_chars")?;
    ::std::result::Result::Ok(::pipevet::Shim::new("testpipeline.count_chars", f))
}

::pipevet::inventory::submit! {
    ::pipevet::ShimRegistration::generated("testpipeline.count_chars", "fn(alloc::string::String) -> usize", __pipevet_install_4)
}
