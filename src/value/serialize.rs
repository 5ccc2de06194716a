//! Serialization of value trees back to text.

use std::fmt;

use super::{CommentNode, FunctionNode, ListNode, Node, NumberNode, StringNode, WordNode};

pub trait ToCss {
    /// Write this value as CSS to the buffer.
    fn to_css(&self, buf: &mut String);

    /// Convert to a CSS string (convenience method).
    fn to_css_string(&self) -> String {
        let mut buf = String::new();
        self.to_css(&mut buf);
        buf
    }
}

impl ToCss for Node {
    fn to_css(&self, buf: &mut String) {
        match self {
            Node::Number(number) => number.to_css(buf),
            Node::String(string) => string.to_css(buf),
            Node::Word(word) => word.to_css(buf),
            Node::Comment(comment) => comment.to_css(buf),
            Node::Function(function) => function.to_css(buf),
        }
    }
}

impl ToCss for NumberNode {
    fn to_css(&self, buf: &mut String) {
        if !self.is_modified() {
            buf.push_str(self.original_text());
            return;
        }
        buf.push_str(&format_number(self.value()));
        if let Some(unit) = self.unit() {
            buf.push_str(unit);
        }
    }
}

impl ToCss for StringNode {
    fn to_css(&self, buf: &mut String) {
        buf.push_str(self.raw());
    }
}

impl ToCss for WordNode {
    fn to_css(&self, buf: &mut String) {
        buf.push_str(self.raw());
    }
}

impl ToCss for CommentNode {
    fn to_css(&self, buf: &mut String) {
        buf.push_str(self.raw());
    }
}

impl ToCss for FunctionNode {
    fn to_css(&self, buf: &mut String) {
        buf.push_str(&self.name);
        buf.push('(');
        write_sequence(&self.arguments, &self.separators, buf);
        if self.closed {
            buf.push(')');
        }
    }
}

impl ToCss for ListNode {
    fn to_css(&self, buf: &mut String) {
        write_sequence(&self.items, &self.separators, buf);
    }
}

impl fmt::Display for ListNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css_string())
    }
}

/// Interleave nodes with the separators recorded around them.
fn write_sequence(nodes: &[Node], separators: &[String], buf: &mut String) {
    for (i, node) in nodes.iter().enumerate() {
        if let Some(sep) = separators.get(i) {
            buf.push_str(sep);
        }
        node.to_css(buf);
    }
    for sep in separators.iter().skip(nodes.len()) {
        buf.push_str(sep);
    }
}

/// Render a number the way converted measurements are written: shortest
/// round-trip decimal, no exponent, no trailing zeros, no `-0`.
///
/// Non-finite values saturate to the largest finite magnitude.
pub fn format_number(v: f64) -> String {
    if v == 0.0 || v.is_nan() {
        return "0".to_string();
    }
    if v.is_infinite() {
        return f64::MAX.copysign(v).to_string();
    }
    v.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::parse;
    use proptest::prelude::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(2.0), "2");
        assert_eq!(format_number(1.45), "1.45");
        assert_eq!(format_number(-0.75), "-0.75");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(0.0000001), "0.0000001");
        assert_eq!(format_number(f64::INFINITY), f64::MAX.to_string());
    }

    #[test]
    fn test_unmodified_number_keeps_original_text() {
        let list = parse("+048.50px");
        assert_eq!(list.to_css_string(), "+048.50px");
    }

    #[test]
    fn test_modified_number_is_canonical() {
        let mut list = parse("+048.50px");
        if let Node::Number(number) = &mut list.items_mut()[0] {
            number.set_unit("apx");
        }
        assert_eq!(list.to_css_string(), "48.5apx");
    }

    #[test]
    fn test_unclosed_function_round_trips() {
        assert_eq!(parse("rgba(1, 2").to_css_string(), "rgba(1, 2");
        assert_eq!(parse("a ( b").to_css_string(), "a ( b");
    }

    #[test]
    fn test_display() {
        assert_eq!(parse("a ,b").to_string(), "a ,b");
    }

    #[test]
    fn test_round_trip_examples() {
        for input in [
            "",
            "   ",
            "foo( )",
            "foo(,)",
            "url(\"https://developer.mozilla.org/samples/cssref/images/startransparent.gif\") #FFEE99 48px bottom no-repeat",
            "48px 2.4px,36px.24px!important",
            "-webkit-linear-gradient(top, rgba(0,255,255,0), rgba(255,255,0,1) 18px)",
            "calc( (100% - 48px) / 3 )",
            "'unterminated",
            "/* open comment",
            ")) ((",
            "\t48px\n,\r\n36px ",
        ] {
            assert_eq!(parse(input).to_css_string(), input);
        }
    }

    proptest! {
        #[test]
        fn prop_round_trip(input in ".{0,64}") {
            prop_assert_eq!(parse(&input).to_css_string(), input);
        }

        #[test]
        fn prop_round_trip_css_like(input in r#"[a-z0-9 .,+\-/*()'"%#!]{0,48}"#) {
            prop_assert_eq!(parse(&input).to_css_string(), input);
        }
    }
}
