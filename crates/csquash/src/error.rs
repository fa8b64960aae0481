//! Error types for stylesheet parsing and compaction.
//!
//! Two kinds of failure exist side by side:
//!
//! - [`Diagnostic`]: a recoverable parse problem, recorded during parsing and
//!   returned to the caller as data. Parsing continues past these.
//! - [`CompactError`]: a fatal failure (missing input, output collision,
//!   unexpected end of source). These abort the whole operation.

use std::fmt;

use thiserror::Error;

/// How serious a diagnostic is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Numeric code for a malformed construct.
const CODE_SYNTAX: u16 = 1;
/// Numeric code for source ending inside an unterminated construct.
const CODE_UNEXPECTED_EOF: u16 = 2;

/// A single problem found while parsing a stylesheet.
///
/// Diagnostics render in compiler-message form, so they can be surfaced by
/// build tooling directly:
///
/// ```
/// use csquash::Diagnostic;
///
/// let diag = Diagnostic::syntax("site.css", 3, 14, "expected ':' in declaration");
/// assert_eq!(
///     diag.to_string(),
///     "site.css(3,14): error CSS0001: expected ':' in declaration"
/// );
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    /// Display name of the source the problem was found in.
    pub source: String,
    /// 1-based line.
    pub line: u32,
    /// 1-based column.
    pub column: u32,
    code: u16,
}

impl Diagnostic {
    /// A recoverable syntax error at the given position.
    pub fn syntax(
        source: impl Into<String>,
        line: u32,
        column: u32,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            source: source.into(),
            line,
            column,
            code: CODE_SYNTAX,
        }
    }

    /// The source ended inside an unterminated construct.
    pub fn unexpected_eof(
        source: impl Into<String>,
        line: u32,
        column: u32,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            source: source.into(),
            line,
            column,
            code: CODE_UNEXPECTED_EOF,
        }
    }

    /// Short code for tool-style output, e.g. `CSS0001`.
    ///
    /// The prefix is derived from the source name's extension, falling back
    /// to `CSS` when the name has none.
    pub fn code(&self) -> String {
        let prefix = match self.source.rsplit_once('.') {
            Some((_, ext)) if !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()) => {
                ext.to_ascii_uppercase()
            }
            _ => "CSS".to_string(),
        };
        format!("{}{:04}", prefix, self.code)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({},{}): {} {}: {}",
            self.source,
            self.line,
            self.column,
            self.severity,
            self.code(),
            self.message
        )
    }
}

/// Fatal failures that abort a compaction.
#[derive(Debug, Error)]
pub enum CompactError {
    /// The input file does not exist.
    #[error("input not found: {0}")]
    NotFound(String),

    /// The output file already exists and overwriting was not requested.
    #[error("output already exists: {0}")]
    OutputExists(String),

    /// Input and output resolve to the same location.
    #[error("input and output are the same file: {0}")]
    SamePath(String),

    /// The source ended inside an unterminated rule, block or comment.
    ///
    /// Parsing cannot resynchronize past the end of the source, so this
    /// aborts the whole operation instead of being collected.
    #[error("{0}")]
    UnexpectedEof(Diagnostic),

    /// An I/O error while reading the input or writing the output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, CompactError>;
