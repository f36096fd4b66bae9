//! Proc-macro testing using trybuild
//!
//! Each file under `tests/ui-pass` must compile and run.

/// Tests that valid macro usage compiles successfully
#[test]
fn compile_pass_tests() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui-pass/*.rs");
}
