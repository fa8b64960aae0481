//! # csquash - Stylesheet Parser and Compactor
//!
//! A self-contained stylesheet compactor: it reads CSS source, builds a
//! structural tree of its statements, and re-emits that tree minified or
//! pretty-printed, tolerating and reporting malformed input without
//! aborting the whole operation. This crate provides:
//!
//! - **Parsing**: Convert stylesheet text into a structured
//!   [`Stylesheet`](parser::stylesheet::Stylesheet) tree
//! - **Serialization**: Write the tree back out compact or pretty-printed
//! - **Diagnostics**: Recoverable parse errors are collected, not thrown
//!
//! ## Quick Start
//!
//! ```rust
//! use csquash::{compact_source, WriteOptions};
//!
//! let source = r#"
//!     /* palette */
//!     a, a:visited {
//!         color: red
//!     }
//! "#;
//!
//! let mut out = Vec::new();
//! let diagnostics =
//!     compact_source("site.css", source, &mut out, None, None, WriteOptions::empty())
//!         .expect("valid stylesheet");
//! assert!(diagnostics.is_empty());
//! assert_eq!(out, b"a,a:visited{color:red;}");
//! ```
//!
//! ## Error recovery
//!
//! A malformed construct is recorded as a [`Diagnostic`] and parsing resumes
//! at the next synchronization character, so one bad rule does not prevent
//! compaction of the rest of the file. Only an unexpected end of source (an
//! unterminated rule, block or comment) is fatal.
//!
//! ## Limits
//!
//! Selectors and property values are treated as opaque text: this is a
//! compactor, not a CSS validator. The whole source is materialized in
//! memory; there is no streaming.
//!
//! ## Modules
//!
//! - [`compactor`]: The `compact_file`/`compact_source` facade
//! - [`parser`]: Recursive-descent parsing and the syntax tree
//! - [`filter`]: Comment-filtering reader and the token trie beneath it
//! - [`writer`]: Compact/pretty serialization
//! - [`error`]: Diagnostics and fatal error types

pub mod compactor;
pub mod error;
pub mod filter;
pub mod parser;
pub mod writer;

pub use compactor::{compact_file, compact_source};
pub use error::{CompactError, Diagnostic, Result, Severity};
pub use parser::Parser;
pub use parser::stylesheet::{
    AtRule, Block, Declaration, RuleSet, Selector, Statement, Stylesheet, Value,
};
pub use writer::{WriteCss, WriteOptions};
