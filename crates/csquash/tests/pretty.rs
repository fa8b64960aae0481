//! Integration tests for pretty-printed output.
//!
//! Pretty mode writes one statement per line, tab-indents declarations by
//! nesting depth, puts a space after `:`, and breaks selector lists one
//! clause per line.

use csquash::{Diagnostic, WriteOptions, compact_source};

fn pretty(source: &str) -> (String, Vec<Diagnostic>) {
    let mut out = Vec::new();
    let diagnostics = compact_source(
        "test.css",
        source,
        &mut out,
        None,
        None,
        WriteOptions::PRETTY_PRINT,
    )
    .unwrap();
    (String::from_utf8(out).unwrap(), diagnostics)
}

#[test]
fn test_pretty_simple_rule() {
    let (out, diagnostics) = pretty("a{color:red}");
    assert!(diagnostics.is_empty());
    assert_eq!(out, "a {\n\tcolor: red;\n}\n");
}

#[test]
fn test_pretty_selector_list_one_clause_per_line() {
    let (out, _) = pretty(".a, .b, .c { margin:0 }");
    assert_eq!(out, ".a,\n.b,\n.c {\n\tmargin: 0;\n}\n");
}

#[test]
fn test_pretty_multiple_declarations() {
    let (out, _) = pretty("a{color:red;margin:0 auto}");
    assert_eq!(out, "a {\n\tcolor: red;\n\tmargin: 0 auto;\n}\n");
}

#[test]
fn test_pretty_at_rule_without_block() {
    let (out, _) = pretty("@import url(\"x.css\");");
    assert_eq!(out, "@import url(\"x.css\");\n");
}

#[test]
fn test_pretty_media_block_indents_by_depth() {
    let (out, _) = pretty("@media screen{a{color:red}}");
    assert_eq!(out, "@media screen {\n\ta {\n\t\tcolor: red;\n\t}\n}\n");
}

#[test]
fn test_pretty_font_face_declarations_indent() {
    let (out, _) = pretty("@font-face{font-family:X;src:url(y)}");
    assert_eq!(out, "@font-face {\n\tfont-family: X;\n\tsrc: url(y);\n}\n");
}

#[test]
fn test_pretty_statements_are_newline_separated() {
    let (out, _) = pretty("a{b:c}d{e:f}");
    assert_eq!(out, "a {\n\tb: c;\n}\nd {\n\te: f;\n}\n");
}
