//! Integration tests for error recovery.
//!
//! A malformed construct yields a diagnostic and parsing resumes at the
//! nearest synchronization character; only end-of-source is fatal.

use csquash::{CompactError, Diagnostic, WriteOptions, compact_source};

fn compact(source: &str) -> (String, Vec<Diagnostic>) {
    let mut out = Vec::new();
    let diagnostics =
        compact_source("test.css", source, &mut out, None, None, WriteOptions::empty()).unwrap();
    (String::from_utf8(out).unwrap(), diagnostics)
}

// ============================================================================
// DECLARATION-LEVEL RECOVERY
// ============================================================================

#[test]
fn test_extra_semicolon_yields_a_diagnostic() {
    let (out, diagnostics) = compact("a{color:red;;}");
    assert_eq!(out, "a{color:red;}");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].line, 1);
}

#[test]
fn test_errors_among_declarations_keep_the_valid_ones() {
    // Two malformed declarations among five items: exactly two diagnostics,
    // and the three valid declarations survive in order.
    let (out, diagnostics) = compact("a{one:1;bad;two:2;also bad;three:3}");
    assert_eq!(diagnostics.len(), 2);
    assert_eq!(out, "a{one:1;two:2;three:3;}");
}

#[test]
fn test_missing_colon() {
    let (out, diagnostics) = compact("a{color red}");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(out, "a{}");
}

#[test]
fn test_empty_value() {
    let (out, diagnostics) = compact("a{color:;width:10px}");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(out, "a{width:10px;}");
}

#[test]
fn test_empty_property() {
    let (out, diagnostics) = compact("a{:red;width:10px}");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(out, "a{width:10px;}");
}

// ============================================================================
// SELECTOR-LEVEL RECOVERY
// ============================================================================

#[test]
fn test_empty_selector_clause() {
    let (out, diagnostics) = compact(".a, , .b { margin:0 }");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(out, ".a,.b{margin:0;}");
}

#[test]
fn test_selector_hard_failure_skips_to_the_next_statement() {
    // `;` cannot be recovered inside a selector list; the whole statement
    // is dropped and parsing resumes after the next `}`.
    let (out, diagnostics) = compact("a;{x:y} b{c:d}");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(out, "b{c:d;}");
}

#[test]
fn test_brace_inside_declaration_discards_the_statement() {
    let (out, diagnostics) = compact("a{b:{c:d};e:f} g{h:i}");
    assert_eq!(diagnostics.len(), 2);
    assert_eq!(out, "g{h:i;}");
}

// ============================================================================
// FATAL FAILURES
// ============================================================================

#[test]
fn test_unterminated_rule_set_is_fatal() {
    let mut out = Vec::new();
    let err = compact_source(
        "test.css",
        "a { color: red;",
        &mut out,
        None,
        None,
        WriteOptions::empty(),
    )
    .unwrap_err();
    assert!(matches!(err, CompactError::UnexpectedEof(_)));
    assert!(out.is_empty());
}

#[test]
fn test_unterminated_media_block_is_fatal() {
    let mut out = Vec::new();
    let err = compact_source(
        "test.css",
        "@media screen { a{b:c}",
        &mut out,
        None,
        None,
        WriteOptions::empty(),
    )
    .unwrap_err();
    assert!(matches!(err, CompactError::UnexpectedEof(_)));
}

// ============================================================================
// DIAGNOSTIC SHAPE
// ============================================================================

#[test]
fn test_diagnostic_display_is_compiler_message_shaped() {
    let (_, diagnostics) = compact("a{color:red;;}");
    assert_eq!(
        diagnostics[0].to_string(),
        "test.css(1,13): error CSS0001: unexpected ';'"
    );
}

#[test]
fn test_diagnostic_line_tracks_multi_line_input() {
    let (out, diagnostics) = compact("a {\n  color: red;\n  oops;\n  width: 1px;\n}");
    assert_eq!(out, "a{color:red;width:1px;}");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].line, 3);
}
