//! Declaration value trees.
//!
//! A declaration value such as `url("a.png") #FFEE99 48px bottom` is parsed
//! into a [`ListNode`] whose items are leaves (numbers, strings, words,
//! comments) and function calls. Separators between items (commas and
//! whitespace) are kept as raw text, so an untouched tree serializes back to
//! exactly the string it was parsed from.
//!
//! This module contains:
//! - The tokenizer (`tokenizer`)
//! - The tree builder, loose and strict (`parser`)
//! - A visitor over the node set (`visitor`)
//! - Serialization back to text (`serialize`)

mod parser;
mod serialize;
mod tokenizer;
mod visitor;

pub use parser::{parse, parse_strict};
pub use serialize::{ToCss, format_number};
pub use tokenizer::{Spanned, Token, Tokenizer};
pub use visitor::Visitor;

/// A node in a value tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Number(NumberNode),
    String(StringNode),
    Word(WordNode),
    Comment(CommentNode),
    Function(FunctionNode),
}

/// A numeric literal with an optional unit, e.g. `48px`, `-.5em`, `0.8`.
///
/// The value and unit may be rewritten; as long as both still equal what was
/// parsed, the node serializes as its original text.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberNode {
    value: f64,
    unit: Option<String>,
    original_text: String,
    original_value: f64,
    /// Byte offset of the unit within `original_text` (its length if unitless).
    unit_start: usize,
}

impl NumberNode {
    /// Build a number from its source text, split at `unit_start`.
    ///
    /// Returns `None` if the numeric part does not parse.
    pub fn from_source(text: &str, unit_start: usize) -> Option<Self> {
        let number = text.get(..unit_start)?;
        let value: f64 = number.parse().ok()?;
        let unit = &text[unit_start..];
        Some(Self {
            value,
            unit: (!unit.is_empty()).then(|| unit.to_string()),
            original_text: text.to_string(),
            original_value: value,
            unit_start,
        })
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn set_value(&mut self, value: f64) {
        self.value = value;
    }

    /// The unit suffix, or `None` for a unitless number.
    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    pub fn set_unit(&mut self, unit: impl Into<String>) {
        self.unit = Some(unit.into());
    }

    /// The exact text this number was parsed from.
    pub fn original_text(&self) -> &str {
        &self.original_text
    }

    /// The unit as parsed, regardless of later rewrites.
    pub fn original_unit(&self) -> Option<&str> {
        let unit = &self.original_text[self.unit_start..];
        (!unit.is_empty()).then_some(unit)
    }

    /// Whether the value or unit differs from what was parsed.
    pub fn is_modified(&self) -> bool {
        self.value != self.original_value || self.unit() != self.original_unit()
    }
}

/// A quoted string, kept verbatim including its quotes and escapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringNode {
    raw: String,
    terminated: bool,
}

impl StringNode {
    pub fn new(raw: impl Into<String>, terminated: bool) -> Self {
        Self {
            raw: raw.into(),
            terminated,
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Whether the closing quote was present in the source.
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }
}

/// An identifier, keyword, hex color, operator or any other opaque run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordNode {
    raw: String,
}

impl WordNode {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }
}

/// A `/* ... */` comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentNode {
    raw: String,
    terminated: bool,
}

impl CommentNode {
    pub fn new(raw: impl Into<String>, terminated: bool) -> Self {
        Self {
            raw: raw.into(),
            terminated,
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }
}

/// A function call such as `rgba(0,255,255,0)`.
///
/// A parenthesized group with no name (as inside `calc()`) is a function whose
/// name is empty.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionNode {
    pub(crate) name: String,
    pub(crate) arguments: Vec<Node>,
    pub(crate) separators: Vec<String>,
    pub(crate) closed: bool,
}

impl FunctionNode {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arguments(&self) -> &[Node] {
        &self.arguments
    }

    pub fn arguments_mut(&mut self) -> &mut [Node] {
        &mut self.arguments
    }

    /// Raw separator text around the arguments: one before the first
    /// argument, one between each pair, one after the last.
    pub fn separators(&self) -> &[String] {
        &self.separators
    }

    /// Whether the closing `)` was present in the source.
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

/// The root of a parsed declaration value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListNode {
    pub(crate) items: Vec<Node>,
    pub(crate) separators: Vec<String>,
}

impl ListNode {
    pub fn items(&self) -> &[Node] {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut [Node] {
        &mut self.items
    }

    /// Raw separator text around the items, laid out like
    /// [`FunctionNode::separators`].
    pub fn separators(&self) -> &[String] {
        &self.separators
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.separators.is_empty()
    }

    /// Every number in the tree, pre-order, left to right.
    pub fn numbers(&self) -> Vec<&NumberNode> {
        let mut out = Vec::new();
        collect_numbers(&self.items, &mut out);
        out
    }
}

fn collect_numbers<'a>(nodes: &'a [Node], out: &mut Vec<&'a NumberNode>) {
    for node in nodes {
        match node {
            Node::Number(number) => out.push(number),
            Node::Function(function) => collect_numbers(&function.arguments, out),
            Node::String(_) | Node::Word(_) | Node::Comment(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_from_source() {
        let number = NumberNode::from_source("-2.5em", 4).unwrap();
        assert_eq!(number.value(), -2.5);
        assert_eq!(number.unit(), Some("em"));
        assert_eq!(number.original_text(), "-2.5em");
        assert!(!number.is_modified());
    }

    #[test]
    fn test_unitless_number() {
        let number = NumberNode::from_source("0.5", 3).unwrap();
        assert_eq!(number.unit(), None);
        assert_eq!(number.original_unit(), None);
    }

    #[test]
    fn test_modification_tracking() {
        let mut number = NumberNode::from_source("48px", 2).unwrap();
        number.set_value(48.0);
        number.set_unit("px");
        assert!(!number.is_modified());

        number.set_unit("rem");
        assert!(number.is_modified());
        assert_eq!(number.original_unit(), Some("px"));
    }

    #[test]
    fn test_string_keeps_raw_text() {
        let string = StringNode::new("'a\\'b'", true);
        assert_eq!(string.raw(), "'a\\'b'");
        assert!(string.is_terminated());

        let open = StringNode::new("\"abc", false);
        assert_eq!(open.raw(), "\"abc");
        assert!(!open.is_terminated());
    }
}
