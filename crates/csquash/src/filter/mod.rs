//! The comment-filtering input layer: a prefix trie of filtered-span tokens
//! and the position-tracking reader built on top of it.

mod reader;
mod trie;

pub use reader::FilteringReader;
pub use trie::{FilterTrie, TrieNode};
