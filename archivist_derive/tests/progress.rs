#[test]
fn tests() {
    let t = trybuild::TestCases::new();
    t.pass("tests/01-parse.rs");
    t.pass("tests/02-rename.rs");
    t.pass("tests/03-validators.rs");
    t.pass("tests/04-generics.rs");
    t.pass("tests/05-text.rs");
    t.pass("tests/06-skip.rs");
    t.compile_fail("tests/compile-fail/*.rs");
}
