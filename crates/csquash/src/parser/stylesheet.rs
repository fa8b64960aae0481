//! Syntax tree for a parsed stylesheet.
//!
//! Every node is owned exclusively by its parent; the tree is built once per
//! parse and only read afterwards. There are exactly two statement kinds and
//! two block shapes, so both are closed enums rather than trait objects.

/// A complete parsed stylesheet: an ordered sequence of statements.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Stylesheet {
    pub statements: Vec<Statement>,
}

impl Stylesheet {
    pub fn new(statements: Vec<Statement>) -> Self {
        Self { statements }
    }
}

/// One top-level (or media-nested) statement. Order is significant and
/// preserved in output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Statement {
    AtRule(AtRule),
    RuleSet(RuleSet),
}

/// An at-rule: `@identifier value;` or `@identifier value { ... }`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AtRule {
    /// The at-keyword text, without the leading `@`.
    pub identifier: String,
    /// Raw text between the identifier and the block or `;`, if any.
    pub value: Option<String>,
    pub block: Option<Block>,
}

impl AtRule {
    pub fn new(identifier: impl Into<String>, value: Option<String>, block: Option<Block>) -> Self {
        Self {
            identifier: identifier.into(),
            value,
            block,
        }
    }

    /// Whether this identifier denotes the media-grouping at-rule, whose
    /// block nests whole statements rather than flat declarations.
    pub fn is_media(identifier: &str) -> bool {
        identifier.eq_ignore_ascii_case("media")
    }
}

/// The body of an at-rule.
///
/// A block is homogeneous: the media-grouping at-rule holds nested
/// statements, every other at-rule kind holds flat declarations. Encoding
/// the two shapes as variants makes a mixed block unrepresentable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Block {
    Statements(Vec<Statement>),
    Declarations(Vec<Declaration>),
}

/// A selector list paired with a declaration block.
///
/// The selector list can be empty after error recovery.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RuleSet {
    pub selectors: Vec<Selector>,
    pub declarations: Vec<Declaration>,
}

impl RuleSet {
    pub fn new(selectors: Vec<Selector>, declarations: Vec<Declaration>) -> Self {
        Self {
            selectors,
            declarations,
        }
    }
}

/// Raw, whitespace-trimmed text of one comma-separated selector clause.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selector {
    pub text: String,
}

impl Selector {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// A property/value pair inside a rule set or at-rule block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Declaration {
    pub property: String,
    pub value: Value,
}

impl Declaration {
    pub fn new(property: impl Into<String>, value: Value) -> Self {
        Self {
            property: property.into(),
            value,
        }
    }
}

/// A declaration value: one or more opaque text parts.
///
/// The parser currently always produces exactly one part spanning the whole
/// value; multiple parts are a representational capability, not a promise of
/// decomposition.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Value {
    pub parts: Vec<String>,
}

impl Value {
    /// A value made of a single opaque text part.
    pub fn single(text: impl Into<String>) -> Self {
        Self {
            parts: vec![text.into()],
        }
    }
}
