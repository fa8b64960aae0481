//! Comment-filtering character reader with position tracking.
//!
//! Wraps the raw source text and hands out one logical character at a time:
//! spans recognized by the [`FilterTrie`] (comments) are skipped as though
//! they were never present, CR/CRLF/FF are normalized to a single newline,
//! and runs of whitespace optionally collapse to one space. The reader also
//! supports one level of pushback and re-derivation of token text from a
//! pair of absolute offsets.

use std::sync::Arc;

use crate::error::Diagnostic;
use crate::filter::trie::FilterTrie;

/// The last delivered character, remembered for [`FilteringReader::put_back`].
#[derive(Clone, Copy, Debug)]
struct Slot {
    ch: char,
    offset: isize,
    prev_offset: isize,
}

/// A filtering, position-tracking reader over an in-memory source.
///
/// The whole source is materialized at construction; there is no streaming.
#[derive(Clone)]
pub struct FilteringReader {
    source: Arc<[char]>,
    trie: Arc<FilterTrie>,
    name: Arc<str>,
    /// Next raw index to consume.
    next: usize,
    /// Exclusive raw bound; `source.len()` except for `copy()` replays.
    limit: usize,
    /// 1-based line of the consumption point.
    line: u32,
    /// Column of the consumption point; 0 at the start of a line.
    column: u32,
    /// Raw index of the last delivered character, -1 before the first read.
    offset: isize,
    collapse_whitespace: bool,
    /// One-slot pushback buffer.
    pushed: Option<Slot>,
    /// Last delivered character, candidate for pushback.
    last: Option<Slot>,
    eof: bool,
}

impl FilteringReader {
    /// Reader over `text`, filtering spans per `trie`.
    pub fn new(
        name: impl Into<Arc<str>>,
        text: &str,
        trie: Arc<FilterTrie>,
        collapse_whitespace: bool,
    ) -> Self {
        let source: Arc<[char]> = text.chars().collect::<Vec<_>>().into();
        let limit = source.len();
        Self {
            source,
            trie,
            name: name.into(),
            next: 0,
            limit,
            line: 1,
            column: 0,
            offset: -1,
            collapse_whitespace,
            pushed: None,
            last: None,
            eof: false,
        }
    }

    /// Display name of the source, used in diagnostics.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw offset of the last delivered character; -1 before the first read.
    pub fn offset(&self) -> isize {
        self.offset
    }

    /// Current (line, column) of the consumption point.
    pub fn position(&self) -> (u32, u32) {
        (self.line, self.column)
    }

    /// Whether the source has been fully consumed.
    pub fn at_end(&self) -> bool {
        self.eof
    }

    /// Next logical character, or `None` at end of source.
    ///
    /// Never returns characters inside a filtered span. With whitespace
    /// collapsing enabled, a run of whitespace (comments removed) is
    /// delivered as a single space whose offset is the start of the run.
    pub fn read(&mut self) -> Result<Option<char>, Diagnostic> {
        if let Some(slot) = self.pushed.take() {
            self.offset = slot.offset;
            self.last = Some(slot);
            return Ok(Some(slot.ch));
        }

        let Some((ch, idx)) = self.next_filtered()? else {
            self.eof = true;
            self.last = None;
            return Ok(None);
        };

        if self.collapse_whitespace && ch.is_whitespace() {
            // Swallow the rest of the run; the first non-whitespace
            // character goes into the pushback slot.
            let lookahead = loop {
                match self.next_filtered()? {
                    Some((n, _)) if n.is_whitespace() => continue,
                    other => break other,
                }
            };
            self.deliver(' ', idx);
            if let Some((n, nidx)) = lookahead {
                self.pushed = Some(Slot {
                    ch: n,
                    offset: nidx as isize,
                    prev_offset: self.offset,
                });
            }
            return Ok(Some(' '));
        }

        self.deliver(ch, idx);
        Ok(Some(ch))
    }

    /// Filtered one-character lookahead.
    ///
    /// Applies the same filtering as [`read`](Self::read); the probe runs on
    /// a copy of the cursor, so peeking consumes nothing and cannot disturb
    /// the pushback slot.
    pub fn peek(&self) -> Result<Option<char>, Diagnostic> {
        if let Some(slot) = self.pushed {
            return Ok(Some(slot.ch));
        }
        self.clone().read()
    }

    /// Rewind exactly one logical character.
    ///
    /// The next `read` re-delivers the last character. A single-slot buffer
    /// backs this, so calling `put_back` twice without an intervening `read`
    /// is a no-op, and pushback while the slot already holds run lookahead
    /// is ignored.
    pub fn put_back(&mut self) {
        if self.pushed.is_none() {
            if let Some(slot) = self.last.take() {
                self.offset = slot.prev_offset;
                self.pushed = Some(slot);
            }
        }
    }

    /// Reproduce the filtered text between two raw offsets (inclusive),
    /// trimmed of surrounding whitespace.
    ///
    /// The span is replayed through the same `read` implementation as the
    /// main scan, so the two paths cannot disagree on filtering or
    /// normalization rules.
    pub fn copy(&self, start: usize, end: usize) -> Result<String, Diagnostic> {
        let mut sub = Self {
            source: Arc::clone(&self.source),
            trie: Arc::clone(&self.trie),
            name: Arc::clone(&self.name),
            next: start.min(self.source.len()),
            limit: end.saturating_add(1).min(self.source.len()),
            line: 1,
            column: 0,
            offset: -1,
            collapse_whitespace: self.collapse_whitespace,
            pushed: None,
            last: None,
            eof: false,
        };
        let mut out = String::new();
        while let Some(ch) = sub.read()? {
            out.push(ch);
        }
        Ok(out.trim().to_string())
    }

    /// Record a delivered character for offset and pushback bookkeeping.
    fn deliver(&mut self, ch: char, idx: usize) {
        let slot = Slot {
            ch,
            offset: idx as isize,
            prev_offset: self.offset,
        };
        self.offset = slot.offset;
        self.last = Some(slot);
    }

    /// Next character outside any filtered span, with its raw index.
    fn next_filtered(&mut self) -> Result<Option<(char, usize)>, Diagnostic> {
        loop {
            if self.next >= self.limit {
                return Ok(None);
            }
            if let Some((start_len, end_token)) = self.match_filter_start(self.next) {
                self.skip_filtered_span(start_len, &end_token)?;
                continue;
            }
            let idx = self.next;
            let ch = self.advance_raw();
            return Ok(Some((ch, idx)));
        }
    }

    /// Does a filtered-span start token begin at `idx`? Returns the token's
    /// length in characters and the matching end token.
    fn match_filter_start(&self, idx: usize) -> Option<(usize, String)> {
        let mut node = self.trie.root();
        for (len, i) in (idx..self.limit).enumerate() {
            node = node.child(self.source[i])?;
            if let Some(end) = node.end_token() {
                return Some((len + 1, end.to_string()));
            }
        }
        None
    }

    /// Consume a filtered span: the start token, everything up to and
    /// including the end token. Fails if the source ends first.
    fn skip_filtered_span(&mut self, start_len: usize, end_token: &str) -> Result<(), Diagnostic> {
        let (open_line, open_column) = (self.line, self.column + 1);
        for _ in 0..start_len {
            self.advance_raw();
        }
        let end: Vec<char> = end_token.chars().collect();
        loop {
            if self.matches_raw(self.next, &end) {
                for _ in 0..end.len() {
                    self.advance_raw();
                }
                return Ok(());
            }
            if self.next >= self.limit {
                return Err(Diagnostic::unexpected_eof(
                    self.name.to_string(),
                    open_line,
                    open_column,
                    format!("unexpected end of source, expected '{}'", end_token),
                ));
            }
            self.advance_raw();
        }
    }

    /// Raw token comparison at `idx`, no filtering or normalization.
    fn matches_raw(&self, idx: usize, token: &[char]) -> bool {
        idx + token.len() <= self.limit && self.source[idx..idx + token.len()] == *token
    }

    /// Consume one raw character, normalizing CR, CRLF and FF to a single
    /// logical newline and keeping line/column bookkeeping.
    fn advance_raw(&mut self) -> char {
        let ch = self.source[self.next];
        self.next += 1;
        match ch {
            '\r' => {
                if self.next < self.limit && self.source[self.next] == '\n' {
                    self.next += 1;
                }
                self.newline();
                '\n'
            }
            '\n' | '\u{000C}' => {
                self.newline();
                '\n'
            }
            _ => {
                self.column += 1;
                ch
            }
        }
    }

    fn newline(&mut self) {
        self.line += 1;
        self.column = 0;
    }
}
