//! Recursive-descent stylesheet parser with error recovery.
//!
//! The parser consumes a [`FilteringReader`] one logical character at a
//! time, so comments and whitespace runs never reach the grammar. Malformed
//! constructs are recorded as [`Diagnostic`]s and parsing resumes at the
//! nearest synchronization character for the failing level:
//!
//! - statement level: scan to the next `}` and resume;
//! - selector level: `,` resumes the selector list, `{` jumps to the
//!   declarations, `;` or `}` escalates to the statement level;
//! - declaration level: `;` resumes with the next declaration, `}` ends the
//!   rule set, `{` escalates.
//!
//! Unexpected end of source is never recoverable: the resynchronization scan
//! exhausts input too, so the failure aborts the remainder of the parse.
//!
//! Token text is not buffered while scanning; the parser remembers raw
//! offsets and materializes text lazily through
//! [`FilteringReader::copy`], which replays the same filtering rules.

pub mod stylesheet;

use std::path::Path;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::error::{CompactError, Diagnostic, Result};
use crate::filter::{FilterTrie, FilteringReader};
use crate::parser::stylesheet::{
    AtRule, Block, Declaration, RuleSet, Selector, Statement, Stylesheet, Value,
};

/// The memoized outcome of one parse: a tree plus the recoverable
/// diagnostics, or the diagnostic describing a fatal end-of-source.
type ParseOutcome = std::result::Result<(Stylesheet, Vec<Diagnostic>), Diagnostic>;

/// A parser instance bound to one source.
///
/// The parse runs lazily and at most once: the first call to
/// [`parse`](Parser::parse) computes the result while holding the cell's
/// initialization lock; concurrent callers block, then observe the cached
/// outcome.
///
/// ```
/// use csquash::Parser;
///
/// let parser = Parser::from_source("demo.css", "a { color: red; }");
/// let (sheet, diagnostics) = parser.parse().unwrap();
/// assert_eq!(sheet.statements.len(), 1);
/// assert!(diagnostics.is_empty());
/// ```
pub struct Parser {
    name: Arc<str>,
    text: String,
    result: OnceCell<ParseOutcome>,
}

impl Parser {
    /// Parser over an in-memory source. `name` is the display name used in
    /// diagnostics.
    pub fn from_source(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into().into(),
            text: text.into(),
            result: OnceCell::new(),
        }
    }

    /// Parser over the contents of `path`.
    ///
    /// A missing file fails here, before any parsing machinery exists, and
    /// is therefore a fatal error rather than a diagnostic.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                CompactError::NotFound(path.display().to_string())
            } else {
                CompactError::Io(err)
            }
        })?;
        Ok(Self::from_source(path.display().to_string(), text))
    }

    /// The parsed tree and the diagnostics collected while building it.
    ///
    /// Fatal end-of-source failures surface as
    /// [`CompactError::UnexpectedEof`]; everything recoverable is in the
    /// diagnostics list instead.
    pub fn parse(&self) -> Result<(&Stylesheet, &[Diagnostic])> {
        match self.result.get_or_init(|| self.run()) {
            Ok((sheet, diagnostics)) => Ok((sheet, diagnostics)),
            Err(diagnostic) => Err(CompactError::UnexpectedEof(diagnostic.clone())),
        }
    }

    fn run(&self) -> ParseOutcome {
        log::debug!("parsing {}", self.name);
        let reader = FilteringReader::new(
            Arc::clone(&self.name),
            &self.text,
            Arc::new(FilterTrie::comments()),
            true,
        );
        let mut session = Session {
            reader,
            diagnostics: Vec::new(),
        };
        match session.parse_statement_list(false) {
            Ok(statements) => {
                log::debug!(
                    "parsed {} statements from {} ({} diagnostics)",
                    statements.len(),
                    self.name,
                    session.diagnostics.len()
                );
                Ok((Stylesheet::new(statements), session.diagnostics))
            }
            Err(ParseError::Eof(diagnostic)) | Err(ParseError::Syntax(diagnostic)) => {
                Err(diagnostic)
            }
        }
    }
}

/// Internal parse failure, split by how far it can be recovered.
enum ParseError {
    /// Malformed construct; recoverable at some enclosing scope.
    Syntax(Diagnostic),
    /// Source ended inside an unterminated construct; aborts the parse.
    Eof(Diagnostic),
}

type Step<T> = std::result::Result<T, ParseError>;

/// How one declaration attempt ended.
enum DeclarationStep {
    /// A declaration was parsed; `true` when `;` terminated it and more may
    /// follow.
    Parsed(Declaration, bool),
    /// Recovered from a malformed declaration; resume with the next one.
    Skipped,
    /// `}` reached; the block is done.
    End,
}

/// One parse run: the reader plus the diagnostics side channel.
struct Session {
    reader: FilteringReader,
    diagnostics: Vec<Diagnostic>,
}

impl Session {
    fn next(&mut self) -> Step<Option<char>> {
        self.reader.read().map_err(ParseError::Eof)
    }

    fn copy(&self, start: usize, end: usize) -> Step<String> {
        self.reader.copy(start, end).map_err(ParseError::Eof)
    }

    fn syntax(&self, message: impl Into<String>) -> ParseError {
        let (line, column) = self.reader.position();
        ParseError::Syntax(Diagnostic::syntax(self.reader.name(), line, column, message))
    }

    fn eof(&self, message: impl Into<String>) -> ParseError {
        let (line, column) = self.reader.position();
        ParseError::Eof(Diagnostic::unexpected_eof(
            self.reader.name(),
            line,
            column,
            message,
        ))
    }

    /// Record a recoverable problem at the current position.
    fn report_syntax(&mut self, message: impl Into<String>) {
        let (line, column) = self.reader.position();
        self.diagnostics
            .push(Diagnostic::syntax(self.reader.name(), line, column, message));
    }

    /// Statements until end of source (top level) or the closing `}` of a
    /// block. Statement failures are recorded here and recovery scans to the
    /// next `}`.
    fn parse_statement_list(&mut self, in_block: bool) -> Step<Vec<Statement>> {
        let mut statements = Vec::new();
        loop {
            let Some(ch) = self.next()? else {
                if in_block {
                    return Err(self.eof("unexpected end of source, expected '}'"));
                }
                break;
            };
            if ch.is_whitespace() {
                continue;
            }
            if ch == '}' {
                if in_block {
                    break;
                }
                // The stray brace is itself the statement-level sync
                // character, so recovery is just: keep going.
                self.report_syntax("unexpected '}'");
                continue;
            }
            let step: Step<Option<Statement>> = match ch {
                '<' if !in_block => self.parse_cdo().map(|()| None),
                '-' if !in_block => self.parse_cdc().map(|()| None),
                '@' => self.parse_at_rule().map(Some),
                _ => {
                    self.reader.put_back();
                    self.parse_rule_set()
                        .map(|rule_set| Some(Statement::RuleSet(rule_set)))
                }
            };
            match step {
                Ok(Some(statement)) => statements.push(statement),
                Ok(None) => {}
                Err(ParseError::Syntax(diagnostic)) => {
                    self.diagnostics.push(diagnostic);
                    self.resync_to_close_brace()?;
                }
                Err(eof @ ParseError::Eof(_)) => return Err(eof),
            }
        }
        Ok(statements)
    }

    /// `<!--`, with the `<` already consumed. Read and discarded.
    fn parse_cdo(&mut self) -> Step<()> {
        self.expect_marker(&['!', '-', '-'], "<!--")
    }

    /// `-->`, with the first `-` already consumed. Read and discarded.
    fn parse_cdc(&mut self) -> Step<()> {
        self.expect_marker(&['-', '>'], "-->")
    }

    fn expect_marker(&mut self, rest: &[char], marker: &str) -> Step<()> {
        for &expected in rest {
            match self.next()? {
                None => return Err(self.eof(format!("unexpected end of source in '{}'", marker))),
                Some(ch) if ch == expected => {}
                Some(ch) => {
                    return Err(self.syntax(format!("unexpected '{}', expected '{}'", ch, marker)));
                }
            }
        }
        Ok(())
    }

    /// An at-rule, with the `@` already consumed.
    ///
    /// The block shape is decided once from the identifier: the
    /// media-grouping at-rule nests whole statements, every other kind holds
    /// flat declarations.
    fn parse_at_rule(&mut self) -> Step<Statement> {
        let mut identifier = String::new();
        loop {
            match self.next()? {
                None => return Err(self.eof("unexpected end of source in at-rule")),
                Some(ch) if ch.is_alphanumeric() || ch == '-' || ch == '_' => identifier.push(ch),
                Some(_) => {
                    self.reader.put_back();
                    break;
                }
            }
        }
        if identifier.is_empty() {
            return Err(self.syntax("expected an identifier after '@'"));
        }

        let mut span: Option<(usize, usize)> = None;
        let delimiter = loop {
            match self.next()? {
                None => return Err(self.eof("unexpected end of source in at-rule")),
                Some(ch @ ('{' | ';')) => break ch,
                Some(_) => self.extend_span(&mut span),
            }
        };
        let value = match span {
            Some((start, end)) => Some(self.copy(start, end)?).filter(|text| !text.is_empty()),
            None => None,
        };

        let block = match delimiter {
            ';' => None,
            _ if AtRule::is_media(&identifier) => {
                Some(Block::Statements(self.parse_statement_list(true)?))
            }
            _ => Some(Block::Declarations(self.parse_declarations()?)),
        };
        Ok(Statement::AtRule(AtRule::new(identifier, value, block)))
    }

    /// A rule set: selector list, then `{`, declarations, `}`.
    fn parse_rule_set(&mut self) -> Step<RuleSet> {
        let mut selectors = Vec::new();
        loop {
            let (selector, delimiter) = self.parse_selector()?;
            match selector {
                Some(selector) => selectors.push(selector),
                // An empty clause is recoverable right here: the delimiter
                // we stopped on is the selector-level sync character.
                None => self.report_syntax("expected a selector"),
            }
            if delimiter == '{' {
                break;
            }
        }
        let declarations = self.parse_declarations()?;
        Ok(RuleSet::new(selectors, declarations))
    }

    /// One selector clause, ending at `,` (more clauses follow) or `{` (the
    /// declaration block starts). `;` and `}` cannot be recovered inside a
    /// selector list and escalate to the statement level.
    fn parse_selector(&mut self) -> Step<(Option<Selector>, char)> {
        let mut span: Option<(usize, usize)> = None;
        let delimiter = loop {
            match self.next()? {
                None => return Err(self.eof("unexpected end of source in selector")),
                Some(ch @ (',' | '{')) => break ch,
                Some(';') => return Err(self.syntax("unexpected ';' in selector")),
                Some('}') => return Err(self.syntax("unexpected '}' in selector")),
                Some(ch) if ch.is_whitespace() && span.is_none() => continue,
                Some(_) => self.extend_span(&mut span),
            }
        };
        let text = match span {
            Some((start, end)) => self.copy(start, end)?,
            None => String::new(),
        };
        let selector = if text.is_empty() {
            None
        } else {
            Some(Selector::new(text))
        };
        Ok((selector, delimiter))
    }

    /// Declarations until the closing `}`.
    fn parse_declarations(&mut self) -> Step<Vec<Declaration>> {
        let mut declarations = Vec::new();
        loop {
            match self.parse_declaration()? {
                DeclarationStep::Parsed(declaration, more) => {
                    declarations.push(declaration);
                    if !more {
                        break;
                    }
                }
                DeclarationStep::Skipped => {}
                DeclarationStep::End => break,
            }
        }
        Ok(declarations)
    }

    /// One `property ':' value` attempt.
    ///
    /// Recoverable problems (stray `;`, missing `:`, empty property or
    /// value) are recorded here and mapped to `Skipped`/`End`; a `{` is a
    /// hard failure that discards the whole statement.
    fn parse_declaration(&mut self) -> Step<DeclarationStep> {
        let mut span: Option<(usize, usize)> = None;
        loop {
            match self.next()? {
                None => return Err(self.eof("unexpected end of source in declaration")),
                Some(ch) if ch.is_whitespace() && span.is_none() => continue,
                Some(':') => break,
                Some('}') => {
                    if span.is_some() {
                        self.report_syntax("expected ':' in declaration");
                    }
                    return Ok(DeclarationStep::End);
                }
                Some(';') => {
                    if span.is_some() {
                        self.report_syntax("expected ':' in declaration");
                    } else {
                        self.report_syntax("unexpected ';'");
                    }
                    return Ok(DeclarationStep::Skipped);
                }
                Some('{') => return Err(self.syntax("unexpected '{' in declaration")),
                Some(_) => self.extend_span(&mut span),
            }
        }
        let property = match span {
            Some((start, end)) => self.copy(start, end)?,
            None => String::new(),
        };
        if property.is_empty() {
            self.report_syntax("expected a property name before ':'");
            return self.skip_declaration_remainder();
        }

        let mut span: Option<(usize, usize)> = None;
        let delimiter = loop {
            match self.next()? {
                None => return Err(self.eof("unexpected end of source in declaration value")),
                Some(ch @ (';' | '}')) => break ch,
                Some('{') => return Err(self.syntax("unexpected '{' in declaration value")),
                Some(_) => self.extend_span(&mut span),
            }
        };
        let value = match span {
            Some((start, end)) => self.copy(start, end)?,
            None => String::new(),
        };
        if value.is_empty() {
            self.report_syntax("expected a value after ':'");
            return Ok(match delimiter {
                ';' => DeclarationStep::Skipped,
                _ => DeclarationStep::End,
            });
        }
        Ok(DeclarationStep::Parsed(
            Declaration::new(property, Value::single(value)),
            delimiter == ';',
        ))
    }

    /// Scan past the rest of a malformed declaration.
    fn skip_declaration_remainder(&mut self) -> Step<DeclarationStep> {
        loop {
            match self.next()? {
                None => return Err(self.eof("unexpected end of source in declaration")),
                Some(';') => return Ok(DeclarationStep::Skipped),
                Some('}') => return Ok(DeclarationStep::End),
                Some('{') => return Err(self.syntax("unexpected '{' in declaration")),
                Some(_) => {}
            }
        }
    }

    /// Statement-level recovery: scan forward to the next `}`.
    fn resync_to_close_brace(&mut self) -> Step<()> {
        loop {
            match self.next()? {
                None => return Err(self.eof("unexpected end of source during error recovery")),
                Some('}') => return Ok(()),
                Some(_) => {}
            }
        }
    }

    /// Grow the pending token span to cover the character just read.
    fn extend_span(&mut self, span: &mut Option<(usize, usize)>) {
        let offset = self.reader.offset() as usize;
        *span = Some(match *span {
            None => (offset, offset),
            Some((start, _)) => (start, offset),
        });
    }
}
