//! The compaction facade: I/O preconditions, optional header comment,
//! parse, serialize.
//!
//! Precondition failures (missing input, output collision, same path) are
//! fatal and raised immediately; they never appear in the diagnostics list.
//! Everything recoverable that the parser finds is returned as diagnostics,
//! and the rest of the stylesheet is still compacted. A fatal parse failure
//! (unexpected end of source) produces no output at all.

use std::io;
use std::path::Path;

use crate::error::{CompactError, Diagnostic, Result};
use crate::parser::Parser;
use crate::writer::{WriteCss, WriteOptions};

/// Space added around the longer header line.
const HEADER_MARGIN: usize = 8;
const HEADER_INDENT: &str = "    ";

/// Compact (or pretty-print) the stylesheet at `input` into `output`.
///
/// Preconditions, checked before any parsing:
/// 1. `input` must exist.
/// 2. If `output` exists, [`WriteOptions::OVERWRITE`] must be set.
/// 3. `input` and `output` must not resolve to the same location.
///
/// Returns the diagnostics collected during parsing. A `copyright` and/or a
/// `timestamp_format` (a `chrono` format string) cause a boxed header
/// comment to precede the output.
pub fn compact_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    copyright: Option<&str>,
    timestamp_format: Option<&str>,
    options: WriteOptions,
) -> Result<Vec<Diagnostic>> {
    let input = input.as_ref();
    let output = output.as_ref();

    if !input.exists() {
        return Err(CompactError::NotFound(input.display().to_string()));
    }
    if output.exists() {
        if !options.contains(WriteOptions::OVERWRITE) {
            return Err(CompactError::OutputExists(output.display().to_string()));
        }
        if same_location(input, output) {
            return Err(CompactError::SamePath(input.display().to_string()));
        }
    } else if input == output {
        return Err(CompactError::SamePath(input.display().to_string()));
    }

    let parser = Parser::from_file(input)?;
    let (text, diagnostics) = render(&parser, copyright, timestamp_format, options)?;
    std::fs::write(output, text)?;
    log::debug!(
        "compacted {} -> {} ({} diagnostics)",
        input.display(),
        output.display(),
        diagnostics.len()
    );
    Ok(diagnostics)
}

/// Compact an in-memory stylesheet into a caller-supplied sink.
///
/// `name` is the display name used in diagnostics. The output-collision
/// preconditions do not apply to a sink.
///
/// ```
/// use csquash::{compact_source, WriteOptions};
///
/// let mut out = Vec::new();
/// let diagnostics = compact_source(
///     "demo.css",
///     "a { color: red; }",
///     &mut out,
///     None,
///     None,
///     WriteOptions::empty(),
/// )
/// .unwrap();
/// assert!(diagnostics.is_empty());
/// assert_eq!(out, b"a{color:red;}");
/// ```
pub fn compact_source(
    name: &str,
    text: &str,
    mut sink: impl io::Write,
    copyright: Option<&str>,
    timestamp_format: Option<&str>,
    options: WriteOptions,
) -> Result<Vec<Diagnostic>> {
    let parser = Parser::from_source(name, text);
    let (rendered, diagnostics) = render(&parser, copyright, timestamp_format, options)?;
    sink.write_all(rendered.as_bytes())?;
    Ok(diagnostics)
}

/// Parse, then render the header and tree. Nothing is written anywhere if
/// parsing fails, so a fatal failure leaves no partial output behind.
fn render(
    parser: &Parser,
    copyright: Option<&str>,
    timestamp_format: Option<&str>,
    options: WriteOptions,
) -> Result<(String, Vec<Diagnostic>)> {
    let (sheet, diagnostics) = parser.parse()?;
    let mut out = String::new();
    write_header(&mut out, copyright, timestamp_format);
    sheet.write(&mut out, options, 0);
    Ok((out, diagnostics.to_vec()))
}

/// Append the boxed header comment:
///
/// ```text
/// /*----...----*\
///     <copyright>
///     <timestamp>
/// \*----...----*/
/// ```
///
/// The box width expands to the longer line plus a fixed margin; either line
/// is omitted when not supplied. Literal `*/` sequences are stripped from
/// both lines so they cannot close the comment early.
fn write_header(out: &mut String, copyright: Option<&str>, timestamp_format: Option<&str>) {
    let copyright = copyright
        .map(strip_comment_close)
        .filter(|line| !line.is_empty());
    let timestamp = timestamp_format
        .map(|format| strip_comment_close(&chrono::Local::now().format(format).to_string()))
        .filter(|line| !line.is_empty());
    let lines: Vec<&str> = [copyright.as_deref(), timestamp.as_deref()]
        .into_iter()
        .flatten()
        .collect();
    if lines.is_empty() {
        return;
    }

    let longest = lines.iter().map(|line| line.chars().count()).max().unwrap_or(0);
    let rule = "-".repeat(longest + HEADER_MARGIN);
    out.push_str("/*");
    out.push_str(&rule);
    out.push_str("*\\\n");
    for line in lines {
        out.push_str(HEADER_INDENT);
        out.push_str(line);
        out.push('\n');
    }
    out.push_str("\\*");
    out.push_str(&rule);
    out.push_str("*/\n");
}

fn strip_comment_close(text: &str) -> String {
    text.replace("*/", "")
}

/// Do two paths point at the same file? Both are known to exist here.
fn same_location(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
