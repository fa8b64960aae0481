//! Integration tests for end-to-end compaction.
//!
//! Covers the basic scenarios: whitespace removal, trailing-semicolon
//! normalization, statement ordering, and the compact-twice fixed point.

use csquash::{Diagnostic, WriteOptions, compact_source};

fn compact(source: &str) -> (String, Vec<Diagnostic>) {
    let mut out = Vec::new();
    let diagnostics =
        compact_source("test.css", source, &mut out, None, None, WriteOptions::empty()).unwrap();
    (String::from_utf8(out).unwrap(), diagnostics)
}

// ============================================================================
// BASIC COMPACTION
// ============================================================================

#[test]
fn test_simple_rule() {
    let (out, diagnostics) = compact("a { color: red; }");
    assert!(diagnostics.is_empty());
    insta::assert_snapshot!(out, @"a{color:red;}");
}

#[test]
fn test_missing_trailing_semicolon_is_normalized() {
    let (out, diagnostics) = compact("a{color:red}");
    assert!(diagnostics.is_empty());
    assert_eq!(out, "a{color:red;}");
}

#[test]
fn test_selector_list() {
    let (out, diagnostics) = compact(".a, .b { margin:0 }");
    assert!(diagnostics.is_empty());
    insta::assert_snapshot!(out, @".a,.b{margin:0;}");
}

#[test]
fn test_media_block() {
    let (out, diagnostics) = compact("@media screen { a{color:red} }");
    assert!(diagnostics.is_empty());
    assert_eq!(out, "@media screen{a{color:red;}}");
}

#[test]
fn test_empty_stylesheet() {
    let (out, diagnostics) = compact("");
    assert!(diagnostics.is_empty());
    assert_eq!(out, "");

    let (out, diagnostics) = compact("  \n\t \r\n ");
    assert!(diagnostics.is_empty());
    assert_eq!(out, "");
}

// ============================================================================
// WHITESPACE
// ============================================================================

#[test]
fn test_value_whitespace_collapses() {
    let (out, _) = compact("a { margin: 0\n      auto; }");
    assert_eq!(out, "a{margin:0 auto;}");
}

#[test]
fn test_selector_whitespace_collapses() {
    let (out, _) = compact(".nav   >\n li { color: #333; }");
    assert_eq!(out, ".nav > li{color:#333;}");
}

#[test]
fn test_newline_forms_do_not_leak_into_output() {
    let (out, _) = compact("a{\r\ncolor:red;\u{000C}}");
    assert_eq!(out, "a{color:red;}");
}

// ============================================================================
// STATEMENT ORDERING
// ============================================================================

#[test]
fn test_statement_order_is_preserved() {
    let (out, diagnostics) = compact(
        "@import url(\"reset.css\");\n\
         a { color: red; }\n\
         @media print { a { display: none; } }\n\
         b { font-weight: bold; }",
    );
    assert!(diagnostics.is_empty());
    assert_eq!(
        out,
        "@import url(\"reset.css\");\
         a{color:red;}\
         @media print{a{display:none;}}\
         b{font-weight:bold;}"
    );
}

// ============================================================================
// FIXED POINT
// ============================================================================

#[test]
fn test_compacting_twice_is_a_fixed_point() {
    let source = r#"
        @import url("reset.css");

        a, .nav > li {
            color: #333;
            margin: 0 auto;
        }

        @media screen and (max-width: 600px) {
            .nav { display: none; }
            .nav li { float: left }
        }

        @font-face {
            font-family: "Site";
            src: url(site.woff);
        }
    "#;
    let (once, diagnostics) = compact(source);
    assert!(diagnostics.is_empty());
    let (twice, diagnostics) = compact(&once);
    assert!(diagnostics.is_empty());
    assert_eq!(once, twice);
}

#[test]
fn test_pretty_output_compacts_to_the_same_text() {
    let source = "@media screen { a { color: red; } }\n.b, .c { margin: 0 }";
    let mut pretty = Vec::new();
    compact_source(
        "test.css",
        source,
        &mut pretty,
        None,
        None,
        WriteOptions::PRETTY_PRINT,
    )
    .unwrap();
    let pretty = String::from_utf8(pretty).unwrap();

    let (from_source, _) = compact(source);
    let (from_pretty, _) = compact(&pretty);
    assert_eq!(from_source, from_pretty);
}
