//! Stylesheet tree model and text printer.
//!
//! The tree is deliberately raw: selectors, at-rule params and declaration
//! values are kept as strings, so passes that rewrite declarations do not
//! need a typed value model. Parsing lives in [`parse`].

#![forbid(unsafe_code)]

use core::fmt;
use cssparser::SourceLocation;

mod parse;

pub use parse::parse_stylesheet;

/// A 1-based line/column pair pointing into the source text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl From<SourceLocation> for Position {
    #[inline]
    fn from(location: SourceLocation) -> Self {
        // cssparser lines are 0-based, columns already 1-based.
        Self {
            line: location.line + 1,
            column: location.column,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}:{}", self.line, self.column)
    }
}

/// A single CSS declaration (property: value [!important]).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Declaration {
    /// Lowercased property name.
    pub name: String,
    /// Raw value text (without trailing !important).
    pub value: String,
    /// Whether the declaration was marked as `!important`.
    pub important: bool,
}

/// A single style rule with a raw selector and parsed declarations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rule {
    /// Raw selector text.
    pub selector: String,
    /// Declarations within the rule block, in source order.
    pub declarations: Vec<Declaration>,
    /// Source position of the selector start.
    pub position: Position,
}

/// An at-rule such as `@media`, holding one level of nested style rules.
/// Bodyless at-rules (`@import …;`) carry an empty rule list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AtRule {
    /// At-keyword name without the leading `@`, lowercased.
    pub name: String,
    /// Raw prelude text between the name and the block.
    pub params: String,
    /// Style rules within the block.
    pub rules: Vec<Rule>,
}

/// A top-level stylesheet node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Rule(Rule),
    AtRule(AtRule),
}

/// A parsed stylesheet: top-level rules and at-rules in source order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Stylesheet {
    pub nodes: Vec<Node>,
}

impl Stylesheet {
    /// Serialize the tree back to CSS text with normalized formatting:
    /// two-space indentation, one declaration per line, nodes separated by a
    /// blank line, trailing newline.
    pub fn to_css_string(&self) -> String {
        let mut out = String::new();
        for (index, node) in self.nodes.iter().enumerate() {
            if index > 0 {
                out.push_str("\n\n");
            }
            out.push_str(&node.to_string());
        }
        if !self.nodes.is_empty() {
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.important {
            write!(formatter, "{}: {} !important", self.name, self.value)
        } else {
            write!(formatter, "{}: {}", self.name, self.value)
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(formatter, "{} {{", self.selector)?;
        for declaration in &self.declarations {
            writeln!(formatter, "  {declaration};")?;
        }
        write!(formatter, "}}")
    }
}

impl fmt::Display for AtRule {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rules.is_empty() {
            return if self.params.is_empty() {
                write!(formatter, "@{};", self.name)
            } else {
                write!(formatter, "@{} {};", self.name, self.params)
            };
        }
        writeln!(formatter, "@{} {} {{", self.name, self.params)?;
        for rule in &self.rules {
            let rendered = rule.to_string();
            for line in rendered.lines() {
                writeln!(formatter, "  {line}")?;
            }
        }
        write!(formatter, "}}")
    }
}

impl fmt::Display for Node {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rule(rule) => rule.fmt(formatter),
            Self::AtRule(at_rule) => at_rule.fmt(formatter),
        }
    }
}
