//! Value tokenizer.
//!
//! Splits a declaration value into tokens that cover the input exactly:
//! concatenating the text of every token reproduces the input. The tokenizer
//! never fails; anything it does not recognize becomes a word.

use memchr::{memchr2, memmem};

/// A token and the byte offset where it starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spanned<'a> {
    pub offset: usize,
    pub token: Token<'a>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token<'a> {
    /// `48px`, `-.5`, `1e3em`. `unit_start` is the byte offset of the unit
    /// within `text` (equal to `text.len()` when there is no unit).
    Number { text: &'a str, unit_start: usize },
    /// A quoted string including its quotes.
    String { text: &'a str, terminated: bool },
    Comment { text: &'a str, terminated: bool },
    Word(&'a str),
    /// `/`, `*`, `+`, `!important` and other separators that are not
    /// whitespace or commas.
    Operator(&'a str),
    OpenParen,
    CloseParen,
    Comma,
    Space(&'a str),
}

impl<'a> Token<'a> {
    /// The exact source text of this token.
    pub fn text(&self) -> &'a str {
        match *self {
            Token::Number { text, .. }
            | Token::String { text, .. }
            | Token::Comment { text, .. }
            | Token::Word(text)
            | Token::Operator(text)
            | Token::Space(text) => text,
            Token::OpenParen => "(",
            Token::CloseParen => ")",
            Token::Comma => ",",
        }
    }
}

/// Iterator over the tokens of a value.
pub struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
    /// Set after `url` is emitted directly before a `(`.
    url_pending: bool,
    /// Set after the `(` of `url(`; the next token may be an unquoted body.
    url_body: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            url_pending: false,
            url_body: false,
        }
    }

    fn bytes(&self) -> &'a [u8] {
        self.input.as_bytes()
    }

    fn peek(&self, ahead: usize) -> Option<u8> {
        self.bytes().get(self.pos + ahead).copied()
    }

    fn slice_from(&self, start: usize) -> &'a str {
        &self.input[start..self.pos]
    }

    fn consume_whitespace(&mut self) -> &'a str {
        let start = self.pos;
        while self.peek(0).is_some_and(is_whitespace) {
            self.pos += 1;
        }
        self.slice_from(start)
    }

    fn consume_string(&mut self, quote: u8) -> Token<'a> {
        let start = self.pos;
        self.pos += 1;
        let bytes = self.bytes();
        loop {
            match memchr2(quote, b'\\', &bytes[self.pos..]) {
                Some(i) if bytes[self.pos + i] == b'\\' => {
                    self.pos = (self.pos + i + 2).min(bytes.len());
                }
                Some(i) => {
                    self.pos += i + 1;
                    return Token::String {
                        text: self.slice_from(start),
                        terminated: true,
                    };
                }
                None => {
                    self.pos = bytes.len();
                    return Token::String {
                        text: self.slice_from(start),
                        terminated: false,
                    };
                }
            }
        }
    }

    fn consume_comment(&mut self) -> Token<'a> {
        let start = self.pos;
        let body = &self.bytes()[start + 2..];
        let terminated = match memmem::find(body, b"*/") {
            Some(i) => {
                self.pos = start + 2 + i + 2;
                true
            }
            None => {
                self.pos = self.input.len();
                false
            }
        };
        Token::Comment {
            text: self.slice_from(start),
            terminated,
        }
    }

    fn consume_number(&mut self) -> Token<'a> {
        let start = self.pos;
        if matches!(self.peek(0), Some(b'+' | b'-')) {
            self.pos += 1;
        }
        self.consume_digits();
        if self.peek(0) == Some(b'.') && self.peek(1).is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
            self.consume_digits();
        }
        if matches!(self.peek(0), Some(b'e' | b'E')) {
            let sign = usize::from(matches!(self.peek(1), Some(b'+' | b'-')));
            if self.peek(1 + sign).is_some_and(|b| b.is_ascii_digit()) {
                self.pos += 1 + sign;
                self.consume_digits();
            }
        }
        let unit_start = self.pos - start;
        if self.peek(0) == Some(b'%') {
            self.pos += 1;
        } else if self.at_ident_start() {
            self.consume_ident_chars();
        }
        Token::Number {
            text: self.slice_from(start),
            unit_start,
        }
    }

    fn consume_digits(&mut self) {
        while self.peek(0).is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
    }

    /// A unit starts with a letter, `_`, a non-ASCII character or an escape.
    fn at_ident_start(&self) -> bool {
        match self.peek(0) {
            Some(b) if b.is_ascii_alphabetic() || b == b'_' || b >= 0x80 => true,
            Some(b'\\') => self.peek(1).is_some(),
            _ => false,
        }
    }

    fn consume_ident_chars(&mut self) {
        while let Some(b) = self.peek(0) {
            if b.is_ascii_alphanumeric() || b == b'_' || b == b'-' || b >= 0x80 {
                self.pos += 1;
            } else if b == b'\\' && self.peek(1).is_some() {
                self.pos += 2;
            } else {
                break;
            }
        }
        self.realign();
    }

    fn consume_word(&mut self) -> &'a str {
        let start = self.pos;
        while let Some(b) = self.peek(0) {
            if b == b'\\' {
                self.pos = (self.pos + 2).min(self.input.len());
            } else if ends_word(b) {
                break;
            } else {
                self.pos += 1;
            }
        }
        self.realign();
        self.slice_from(start)
    }

    /// An escape may have stepped into the middle of a multi-byte character;
    /// move forward to the next character boundary.
    fn realign(&mut self) {
        while !self.input.is_char_boundary(self.pos) {
            self.pos += 1;
        }
    }

    /// The unquoted body of `url(...)`, up to (not including) the closing `)`.
    fn consume_url_body(&mut self) -> Option<&'a str> {
        let rest = &self.bytes()[self.pos..];
        let first = rest.iter().position(|&b| !is_whitespace(b))?;
        if matches!(rest[first], b'"' | b'\'' | b')') {
            return None;
        }
        let start = self.pos;
        loop {
            match memchr2(b')', b'\\', &self.bytes()[self.pos..]) {
                Some(i) if self.bytes()[self.pos + i] == b'\\' => {
                    self.pos = (self.pos + i + 2).min(self.input.len());
                }
                Some(i) => {
                    self.pos += i;
                    break;
                }
                None => {
                    self.pos = self.input.len();
                    break;
                }
            }
        }
        self.realign();
        Some(self.slice_from(start))
    }

    fn at_number_start(&self) -> bool {
        let digit = |ahead| self.peek(ahead).is_some_and(|b: u8| b.is_ascii_digit());
        match self.peek(0) {
            Some(b'0'..=b'9') => true,
            Some(b'.') => digit(1),
            Some(b'+' | b'-') => digit(1) || (self.peek(1) == Some(b'.') && digit(2)),
            _ => false,
        }
    }

    /// `-` followed by a letter, `-`, `_` or non-ASCII starts a word
    /// (`-webkit-box`, `--custom`).
    fn at_dashed_word(&self) -> bool {
        self.peek(0) == Some(b'-')
            && self
                .peek(1)
                .is_some_and(|b| b.is_ascii_alphabetic() || b == b'-' || b == b'_' || b >= 0x80)
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Spanned<'a>;

    fn next(&mut self) -> Option<Spanned<'a>> {
        let offset = self.pos;
        let first = self.peek(0)?;

        if std::mem::take(&mut self.url_body)
            && let Some(body) = self.consume_url_body()
        {
            return Some(Spanned {
                offset,
                token: Token::Word(body),
            });
        }

        let token = match first {
            b if is_whitespace(b) => Token::Space(self.consume_whitespace()),
            b'"' | b'\'' => self.consume_string(first),
            b'/' if self.peek(1) == Some(b'*') => self.consume_comment(),
            b'(' => {
                self.pos += 1;
                self.url_body = std::mem::take(&mut self.url_pending);
                Token::OpenParen
            }
            b')' => {
                self.pos += 1;
                Token::CloseParen
            }
            b',' => {
                self.pos += 1;
                Token::Comma
            }
            b'!' => {
                self.pos += 1;
                self.consume_ident_chars();
                Token::Operator(self.slice_from(offset))
            }
            _ if self.at_number_start() => self.consume_number(),
            _ if self.at_dashed_word() => Token::Word(self.consume_word()),
            b'/' | b'*' | b'+' | b'-' | b'=' | b'<' | b'>' | b':' | b';' => {
                self.pos += 1;
                Token::Operator(self.slice_from(offset))
            }
            _ => Token::Word(self.consume_word()),
        };

        if let Token::Word(word) = token {
            self.url_pending = word.eq_ignore_ascii_case("url") && self.peek(0) == Some(b'(');
        }

        Some(Spanned { offset, token })
    }
}

fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b'\x0C')
}

/// `+` and `-` stay inside words (`no-repeat`, `U+0025-00FF`); the other
/// single-character operators end them.
fn ends_word(b: u8) -> bool {
    is_whitespace(b)
        || matches!(
            b,
            b'"' | b'\'' | b'(' | b')' | b',' | b'/' | b'!' | b'*' | b'=' | b'<' | b'>' | b':' | b';'
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn tokens(input: &str) -> Vec<Token<'_>> {
        Tokenizer::new(input).map(|s| s.token).collect()
    }

    fn texts(input: &str) -> Vec<&str> {
        Tokenizer::new(input).map(|s| s.token.text()).collect()
    }

    #[test]
    fn test_numbers_and_units() {
        assert_eq!(
            tokens("48px -2.4em .5 +3% 0"),
            vec![
                Token::Number { text: "48px", unit_start: 2 },
                Token::Space(" "),
                Token::Number { text: "-2.4em", unit_start: 4 },
                Token::Space(" "),
                Token::Number { text: ".5", unit_start: 2 },
                Token::Space(" "),
                Token::Number { text: "+3%", unit_start: 2 },
                Token::Space(" "),
                Token::Number { text: "0", unit_start: 1 },
            ]
        );
    }

    #[test]
    fn test_exponent_versus_unit() {
        assert_eq!(
            tokens("1e3px"),
            vec![Token::Number { text: "1e3px", unit_start: 3 }]
        );
        assert_eq!(tokens("2em"), vec![Token::Number { text: "2em", unit_start: 1 }]);
        assert_eq!(
            tokens("2.5E-2px"),
            vec![Token::Number { text: "2.5E-2px", unit_start: 6 }]
        );
    }

    #[test]
    fn test_unit_is_an_identifier() {
        assert_eq!(
            tokens("48px-banner"),
            vec![Token::Number { text: "48px-banner", unit_start: 2 }]
        );
        assert_eq!(texts("36px.24px"), vec!["36px", ".24px"]);
    }

    #[test]
    fn test_strings_are_opaque() {
        assert_eq!(
            tokens(r#""images/48px-banner.png" 'it\'s'"#),
            vec![
                Token::String { text: r#""images/48px-banner.png""#, terminated: true },
                Token::Space(" "),
                Token::String { text: r"'it\'s'", terminated: true },
            ]
        );
    }

    #[test]
    fn test_unterminated_string() {
        assert_eq!(
            tokens("'abc 48px"),
            vec![Token::String { text: "'abc 48px", terminated: false }]
        );
    }

    #[test]
    fn test_comment() {
        assert_eq!(
            tokens("/* 48px */48px"),
            vec![
                Token::Comment { text: "/* 48px */", terminated: true },
                Token::Number { text: "48px", unit_start: 2 },
            ]
        );
    }

    #[test]
    fn test_functions_and_punctuation() {
        assert_eq!(
            tokens("rgba(0,1)"),
            vec![
                Token::Word("rgba"),
                Token::OpenParen,
                Token::Number { text: "0", unit_start: 1 },
                Token::Comma,
                Token::Number { text: "1", unit_start: 1 },
                Token::CloseParen,
            ]
        );
    }

    #[test]
    fn test_words() {
        assert_eq!(
            texts("#FFEE99 no-repeat -webkit-linear-gradient --gap U+0025-00FF"),
            vec![
                "#FFEE99",
                " ",
                "no-repeat",
                " ",
                "-webkit-linear-gradient",
                " ",
                "--gap",
                " ",
                "U+0025-00FF",
            ]
        );
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            tokens("12px/1.5 !important"),
            vec![
                Token::Number { text: "12px", unit_start: 2 },
                Token::Operator("/"),
                Token::Number { text: "1.5", unit_start: 3 },
                Token::Space(" "),
                Token::Operator("!important"),
            ]
        );
        assert_eq!(texts("100% - 48px"), vec!["100%", " ", "-", " ", "48px"]);
    }

    #[test]
    fn test_operators_end_words() {
        assert_eq!(
            tokens("pi*48px"),
            vec![
                Token::Word("pi"),
                Token::Operator("*"),
                Token::Number { text: "48px", unit_start: 2 },
            ]
        );
        assert_eq!(texts("a=b<c>d:e;f"), vec!["a", "=", "b", "<", "c", ">", "d", ":", "e", ";", "f"]);
        assert_eq!(texts("no-repeat+x"), vec!["no-repeat+x"]);
    }

    #[test]
    fn test_unquoted_url_body() {
        assert_eq!(
            tokens("url(/img/48px.png)"),
            vec![
                Token::Word("url"),
                Token::OpenParen,
                Token::Word("/img/48px.png"),
                Token::CloseParen,
            ]
        );
    }

    #[test]
    fn test_quoted_url_body() {
        assert_eq!(
            tokens("URL( 'a.png')"),
            vec![
                Token::Word("URL"),
                Token::OpenParen,
                Token::Space(" "),
                Token::String { text: "'a.png'", terminated: true },
                Token::CloseParen,
            ]
        );
    }

    #[test]
    fn test_escapes_in_words() {
        assert_eq!(texts(r"a\(b c"), vec![r"a\(b", " ", "c"]);
    }

    #[test]
    fn test_offsets() {
        let offsets: Vec<usize> = Tokenizer::new("a 48px").map(|s| s.offset).collect();
        assert_eq!(offsets, vec![0, 1, 2]);
    }

    proptest! {
        #[test]
        fn prop_tokens_cover_input(input in ".{0,64}") {
            let joined: String = Tokenizer::new(&input).map(|s| s.token.text()).collect();
            prop_assert_eq!(joined, input);
        }

        #[test]
        fn prop_tokens_cover_css_like_input(input in r#"[a-z0-9 .,+\-/*()'"%#!\\]{0,48}"#) {
            let joined: String = Tokenizer::new(&input).map(|s| s.token.text()).collect();
            prop_assert_eq!(joined, input);
        }
    }
}
