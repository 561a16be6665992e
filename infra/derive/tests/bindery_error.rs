#[test]
fn bindery_error_ui() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui/bindery_error_pass.rs");
    t.pass("tests/ui/bindery_error_unit_variant.rs");
    t.compile_fail("tests/ui/bindery_error_no_context.rs");
    t.compile_fail("tests/ui/bindery_error_tuple_variant.rs");
    t.compile_fail("tests/ui/bindery_error_bad_context_type.rs");
}
