//! Snapshot tests for rendered compile failures.
//!
//! Each case compiles a small `main` module and snapshots the three-line plain-text rendering.

use jay::frontend::module::MemoryLocator;
use jay::{CompileFailure, Compiler, Jay};
use miette::Diagnostic as _;

fn fail(text: &str) -> CompileFailure {
    let jay = Jay::new().unwrap();
    let locator = MemoryLocator::new().with_module("main", text);
    Compiler::new(&jay, &locator).compile().unwrap_err()
}

#[test]
fn test_duplicate_symbol_rendering() {
    let failure = fail("var x = \"hi\"\nvar x = \"bye\"\n");
    insta::assert_snapshot!(failure.to_string(), @r#"
error: symbol 'x' already defined here: (main.j:1:5) --> main.j:2:5
    var x = "bye"
        ^
"#);
}

#[test]
fn test_unresolved_symbol_rendering() {
    let failure = fail("func main() {\n  missing()\n}\n");
    insta::assert_snapshot!(failure.to_string(), @r"
error: symbol 'missing' is not defined --> main.j:2:3
      missing()
      ^
");
}

#[test]
fn test_parse_error_rendering() {
    let failure = fail("func main() {\n  var = 1\n}\n");
    insta::assert_snapshot!(failure.to_string(), @r"
error: expected IDENTIFIER, but got EQUALS --> main.j:2:7
      var = 1
          ^
");
}

#[test]
fn test_type_mismatch_rendering() {
    let failure = fail("var x int = \"s\"\n");
    insta::assert_snapshot!(failure.to_string(), @r#"
error: type mismatch. Expected int but got string --> main.j:1:13
    var x int = "s"
                ^
"#);
}

#[test]
fn test_failure_without_location() {
    let jay = Jay::new().unwrap();
    let failure = Compiler::new(&jay, &MemoryLocator::new()).compile().unwrap_err();
    insta::assert_snapshot!(
        failure.to_string(),
        @"error: could not load module 'main': could not locate module (module 'main')"
    );
}

#[test]
fn test_error_codes() {
    let failure = fail("var x = \"hi\"\nvar x = \"bye\"\n");
    let code = failure.error.code().map(|c| c.to_string());
    assert_eq!(code.as_deref(), Some("jay::duplicate_symbol"));

    let failure = fail("func main() {\n  missing()\n}\n");
    let code = failure.error.code().map(|c| c.to_string());
    assert_eq!(code.as_deref(), Some("jay::unresolved_symbol"));
}

#[test]
fn test_failure_source_is_the_compile_error() {
    use std::error::Error as _;

    let failure = fail("func main() {\n  missing()\n}\n");
    let source = failure.source().map(ToString::to_string);
    assert_eq!(source.as_deref(), Some("symbol 'missing' is not defined"));
}

#[test]
fn test_report_labels_the_module_source() {
    let failure = fail("func main() {\n  missing()\n}\n");
    let report = failure.report();
    assert_eq!(report.to_string(), "symbol 'missing' is not defined");
    assert_eq!(report.code().map(|c| c.to_string()).as_deref(), Some("jay::compile"));
    assert!(report.source_code().is_some());
    let offsets: Vec<usize> = report.labels().unwrap().map(|label| label.offset()).collect();
    assert_eq!(offsets, [16]);
}

#[test]
fn test_report_without_source_keeps_error_code() {
    let jay = Jay::new().unwrap();
    let failure = Compiler::new(&jay, &MemoryLocator::new()).compile().unwrap_err();
    assert!(failure.module_source.is_none());
    let report = failure.report();
    assert_eq!(report.code().map(|c| c.to_string()).as_deref(), Some("jay::module_load"));
    assert!(report.labels().is_none());
}
