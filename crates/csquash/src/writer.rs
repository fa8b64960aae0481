//! Dual-mode serialization of the syntax tree.
//!
//! Every node implements [`WriteCss`] and renders itself either compact (no
//! whitespace beyond what the grammar requires) or pretty-printed (newline
//! per statement, tab indentation, one selector per line). Output is
//! normalized, not round-tripped: declarations always terminate with `;`
//! even when the source omitted the one before `}`.

use bitflags::bitflags;

use crate::parser::stylesheet::{
    AtRule, Block, Declaration, RuleSet, Selector, Statement, Stylesheet, Value,
};

bitflags! {
    /// Output options.
    ///
    /// `OVERWRITE` is consumed by the facade's output-collision check only;
    /// nodes ignore it.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct WriteOptions: u8 {
        const PRETTY_PRINT = 0b0000_0001;
        const OVERWRITE = 0b0000_0010;
    }
}

/// Serialize a node into an output sink.
pub trait WriteCss {
    /// Append this node's rendering to `out`. `depth` is the block nesting
    /// level, used for pretty-print indentation.
    fn write(&self, out: &mut String, options: WriteOptions, depth: usize);
}

fn push_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push('\t');
    }
}

impl Stylesheet {
    /// Render the whole tree to a string with the given options.
    pub fn to_css(&self, options: WriteOptions) -> String {
        let mut out = String::new();
        self.write(&mut out, options, 0);
        out
    }
}

impl WriteCss for Stylesheet {
    fn write(&self, out: &mut String, options: WriteOptions, depth: usize) {
        for statement in &self.statements {
            statement.write(out, options, depth);
        }
    }
}

impl WriteCss for Statement {
    fn write(&self, out: &mut String, options: WriteOptions, depth: usize) {
        match self {
            Statement::AtRule(at_rule) => at_rule.write(out, options, depth),
            Statement::RuleSet(rule_set) => rule_set.write(out, options, depth),
        }
    }
}

impl WriteCss for AtRule {
    fn write(&self, out: &mut String, options: WriteOptions, depth: usize) {
        let pretty = options.contains(WriteOptions::PRETTY_PRINT);
        if pretty {
            push_indent(out, depth);
        }
        out.push('@');
        out.push_str(&self.identifier);
        if let Some(value) = &self.value {
            out.push(' ');
            out.push_str(value);
        }
        match &self.block {
            None => {
                out.push(';');
                if pretty {
                    out.push('\n');
                }
            }
            Some(block) => {
                out.push_str(if pretty { " {\n" } else { "{" });
                block.write(out, options, depth + 1);
                if pretty {
                    push_indent(out, depth);
                    out.push_str("}\n");
                } else {
                    out.push('}');
                }
            }
        }
    }
}

impl WriteCss for Block {
    fn write(&self, out: &mut String, options: WriteOptions, depth: usize) {
        match self {
            Block::Statements(statements) => {
                for statement in statements {
                    statement.write(out, options, depth);
                }
            }
            Block::Declarations(declarations) => {
                for declaration in declarations {
                    declaration.write(out, options, depth);
                }
            }
        }
    }
}

impl WriteCss for RuleSet {
    fn write(&self, out: &mut String, options: WriteOptions, depth: usize) {
        let pretty = options.contains(WriteOptions::PRETTY_PRINT);
        if pretty {
            if self.selectors.is_empty() {
                push_indent(out, depth);
            }
            for (i, selector) in self.selectors.iter().enumerate() {
                push_indent(out, depth);
                selector.write(out, options, depth);
                if i + 1 < self.selectors.len() {
                    out.push_str(",\n");
                } else {
                    out.push(' ');
                }
            }
            out.push_str("{\n");
        } else {
            for (i, selector) in self.selectors.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                selector.write(out, options, depth);
            }
            out.push('{');
        }
        for declaration in &self.declarations {
            declaration.write(out, options, depth + 1);
        }
        if pretty {
            push_indent(out, depth);
            out.push_str("}\n");
        } else {
            out.push('}');
        }
    }
}

impl WriteCss for Selector {
    fn write(&self, out: &mut String, _options: WriteOptions, _depth: usize) {
        out.push_str(&self.text);
    }
}

impl WriteCss for Declaration {
    fn write(&self, out: &mut String, options: WriteOptions, depth: usize) {
        let pretty = options.contains(WriteOptions::PRETTY_PRINT);
        if pretty {
            push_indent(out, depth);
        }
        out.push_str(&self.property);
        out.push_str(if pretty { ": " } else { ":" });
        self.value.write(out, options, depth);
        out.push(';');
        if pretty {
            out.push('\n');
        }
    }
}

impl WriteCss for Value {
    fn write(&self, out: &mut String, _options: WriteOptions, _depth: usize) {
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            out.push_str(part);
        }
    }
}
