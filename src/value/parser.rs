//! Tree builder.
//!
//! Consumes the token stream and assembles a [`ListNode`]. Commas and
//! whitespace between items are recorded verbatim as separators. In loose
//! mode (the default) nothing is an error: an unmatched `)` becomes a word,
//! an unclosed function is closed at end of input without inventing a `)`.

use std::iter::Peekable;
use std::mem;

use super::tokenizer::{Spanned, Token, Tokenizer};
use super::{CommentNode, FunctionNode, ListNode, Node, NumberNode, StringNode, WordNode};
use crate::error::{Error, Result};

/// Parse a value, never failing.
pub fn parse(input: &str) -> ListNode {
    let mut builder = TreeBuilder::new(input);
    builder.run();
    builder.finish_loose()
}

/// Parse a value, failing on unbalanced parentheses, unterminated strings and
/// unterminated comments.
pub fn parse_strict(input: &str) -> Result<ListNode> {
    let mut builder = TreeBuilder::new(input);
    builder.run();
    builder.finish_strict()
}

/// An open container: the root list or a function awaiting its `)`.
struct Frame {
    name: String,
    items: Vec<Node>,
    separators: Vec<String>,
    pending: String,
}

impl Frame {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            items: Vec::new(),
            separators: Vec::new(),
            pending: String::new(),
        }
    }

    fn push_item(&mut self, node: Node) {
        self.separators.push(mem::take(&mut self.pending));
        self.items.push(node);
    }

    fn push_separator(&mut self, text: &str) {
        self.pending.push_str(text);
    }

    /// Close the sequence: the trailing separator is kept whenever there is
    /// anything to keep, so separator-only content still round-trips.
    fn into_parts(mut self) -> (String, Vec<Node>, Vec<String>) {
        if !self.items.is_empty() || !self.pending.is_empty() {
            self.separators.push(self.pending);
        }
        (self.name, self.items, self.separators)
    }

    fn into_function(self, closed: bool) -> FunctionNode {
        let (name, arguments, separators) = self.into_parts();
        FunctionNode {
            name,
            arguments,
            separators,
            closed,
        }
    }
}

/// Builds the tree the same way in both modes, remembering the first
/// malformed token so strict parsing can report it.
struct TreeBuilder<'a> {
    input: &'a str,
    tokens: Peekable<Tokenizer<'a>>,
    root: Frame,
    open: Vec<Frame>,
    malformed: Option<Error>,
}

impl<'a> TreeBuilder<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            tokens: Tokenizer::new(input).peekable(),
            root: Frame::new(""),
            open: Vec::new(),
            malformed: None,
        }
    }

    fn reject(&mut self, offset: usize, token: &str) {
        if self.malformed.is_none() {
            self.malformed = Some(malformed(offset, token));
        }
    }

    fn current(&mut self) -> &mut Frame {
        self.open.last_mut().unwrap_or(&mut self.root)
    }

    fn run(&mut self) {
        while let Some(Spanned { offset, token }) = self.tokens.next() {
            match token {
                Token::Space(text) => self.current().push_separator(text),
                Token::Comma => self.current().push_separator(","),
                Token::Word(name)
                    if matches!(
                        self.tokens.peek(),
                        Some(Spanned {
                            token: Token::OpenParen,
                            ..
                        })
                    ) =>
                {
                    self.tokens.next();
                    self.open.push(Frame::new(name));
                }
                Token::OpenParen => self.open.push(Frame::new("")),
                Token::CloseParen => match self.open.pop() {
                    Some(frame) => {
                        let function = frame.into_function(true);
                        self.current().push_item(Node::Function(function));
                    }
                    None => {
                        self.reject(offset, ")");
                        self.current().push_item(Node::Word(WordNode::new(")")));
                    }
                },
                Token::Number { text, unit_start } => {
                    let node = match NumberNode::from_source(text, unit_start) {
                        Some(number) => Node::Number(number),
                        None => Node::Word(WordNode::new(text)),
                    };
                    self.current().push_item(node);
                }
                Token::String { text, terminated } => {
                    let string = StringNode::new(text, terminated);
                    if !string.is_terminated() {
                        self.reject(offset, string.raw());
                    }
                    self.current().push_item(Node::String(string));
                }
                Token::Comment { text, terminated } => {
                    let comment = CommentNode::new(text, terminated);
                    if !comment.is_terminated() {
                        self.reject(offset, comment.raw());
                    }
                    self.current().push_item(Node::Comment(comment));
                }
                Token::Word(text) | Token::Operator(text) => {
                    self.current().push_item(Node::Word(WordNode::new(text)));
                }
            }
        }
    }

    fn finish_strict(mut self) -> Result<ListNode> {
        if let Some(error) = self.malformed.take() {
            return Err(error);
        }
        if let Some(frame) = self.open.pop() {
            return Err(malformed(self.input.len(), &format!("{}(", frame.name)));
        }
        Ok(self.into_list())
    }

    fn finish_loose(mut self) -> ListNode {
        while let Some(frame) = self.open.pop() {
            let function = frame.into_function(false);
            self.current().push_item(Node::Function(function));
        }
        self.into_list()
    }

    fn into_list(self) -> ListNode {
        let (_, items, separators) = self.root.into_parts();
        ListNode { items, separators }
    }
}

fn malformed(offset: usize, token: &str) -> Error {
    Error::MalformedValue {
        offset,
        token: token.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ToCss;

    fn function(node: &Node) -> &FunctionNode {
        match node {
            Node::Function(function) => function,
            other => panic!("expected function, got {other:?}"),
        }
    }

    #[test]
    fn test_separators_are_preserved() {
        let list = parse("48px 2.4px,36px , 24px");
        assert_eq!(list.items().len(), 4);
        assert_eq!(list.separators(), ["", " ", ",", " , ", ""]);
    }

    #[test]
    fn test_function_arguments() {
        let list = parse("translate3d(48px, 36px, 18px)");
        assert_eq!(list.items().len(), 1);
        let translate = function(&list.items()[0]);
        assert_eq!(translate.name(), "translate3d");
        assert_eq!(translate.arguments().len(), 3);
        assert_eq!(translate.separators(), ["", ", ", ", ", ""]);
        assert!(translate.is_closed());
    }

    #[test]
    fn test_nested_functions() {
        let list = parse("linear-gradient(top, rgba(0,255,255,0) 18px)");
        let gradient = function(&list.items()[0]);
        assert_eq!(gradient.arguments().len(), 3);
        let rgba = function(&gradient.arguments()[1]);
        assert_eq!(rgba.name(), "rgba");
        assert_eq!(rgba.arguments().len(), 4);
        assert_eq!(list.numbers().len(), 5);
    }

    #[test]
    fn test_word_before_space_is_not_a_function() {
        let list = parse("calc (1px)");
        assert_eq!(list.items().len(), 2);
        assert!(matches!(&list.items()[0], Node::Word(w) if w.raw() == "calc"));
        assert_eq!(function(&list.items()[1]).name(), "");
    }

    #[test]
    fn test_empty_function() {
        let list = parse("foo()");
        let foo = function(&list.items()[0]);
        assert!(foo.arguments().is_empty());
        assert!(foo.separators().is_empty());
    }

    #[test]
    fn test_separator_only_function_body() {
        let list = parse("foo( )");
        let foo = function(&list.items()[0]);
        assert!(foo.arguments().is_empty());
        assert_eq!(foo.separators(), [" "]);
    }

    #[test]
    fn test_empty_input() {
        assert!(parse("").is_empty());
        assert_eq!(parse("  ").separators(), ["  "]);
    }

    #[test]
    fn test_loose_unmatched_close_paren() {
        let list = parse("48px) 2px");
        assert_eq!(list.items().len(), 3);
        assert!(matches!(&list.items()[1], Node::Word(w) if w.raw() == ")"));
    }

    #[test]
    fn test_loose_unclosed_function() {
        let list = parse("rgba(1, 2");
        let rgba = function(&list.items()[0]);
        assert!(!rgba.is_closed());
        assert_eq!(rgba.arguments().len(), 2);
    }

    #[test]
    fn test_strict_unmatched_close_paren() {
        let err = parse_strict("48px) 2px").unwrap_err();
        assert!(matches!(err, Error::MalformedValue { offset: 4, ref token } if token == ")"));
    }

    #[test]
    fn test_strict_unclosed_function() {
        let err = parse_strict("a rgba(1, 2").unwrap_err();
        assert!(
            matches!(err, Error::MalformedValue { offset: 11, ref token } if token == "rgba(")
        );
    }

    #[test]
    fn test_strict_unterminated_string() {
        let err = parse_strict("url('a.png)").unwrap_err();
        assert!(matches!(err, Error::MalformedValue { offset: 4, .. }));
    }

    #[test]
    fn test_strict_unterminated_comment() {
        let err = parse_strict("1px /* note").unwrap_err();
        assert!(matches!(err, Error::MalformedValue { offset: 4, .. }));
    }

    #[test]
    fn test_strict_reports_first_problem() {
        let err = parse_strict("'a) /* b").unwrap_err();
        assert!(matches!(err, Error::MalformedValue { offset: 0, ref token } if token == "'a) /* b"));

        let err = parse_strict("1px) 'b").unwrap_err();
        assert!(matches!(err, Error::MalformedValue { offset: 3, ref token } if token == ")"));
    }

    #[test]
    fn test_loose_keeps_unterminated_leaves() {
        let list = parse("1px 'abc");
        assert!(matches!(&list.items()[1], Node::String(s) if !s.is_terminated() && s.raw() == "'abc"));
        assert_eq!(list.to_css_string(), "1px 'abc");

        let list = parse("1px /* abc");
        assert!(matches!(&list.items()[1], Node::Comment(c) if !c.is_terminated()));
    }

    #[test]
    fn test_strict_accepts_well_formed_value() {
        let list = parse_strict("rgba(0, 0, 0, .5) 'x' /* c */").unwrap();
        assert_eq!(list, parse("rgba(0, 0, 0, .5) 'x' /* c */"));
    }
}
