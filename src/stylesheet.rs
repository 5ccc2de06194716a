//! Style sheet walking.
//!
//! Finds the raw text of every declaration value in a style sheet (style
//! rules, nested rules, conditional group rules, `@font-face`, `@page`, ...),
//! converts it, and splices the result back. Everything outside declaration
//! values is copied through unchanged.

use std::ops::Range;

use cssparser::{
    AtRuleParser, CowRcStr, DeclarationParser, ParseError, Parser, ParserInput, ParserState,
    QualifiedRuleParser, RuleBodyItemParser, RuleBodyParser, StyleSheetParser, Token,
};

use crate::error;
use crate::transform::Processor;

/// The location of one declaration value in its source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationValue {
    /// Property name as written.
    pub property: String,
    /// Byte range of the value: after the `:`, up to the `;` or `}`.
    /// Includes surrounding whitespace and any `!important`.
    pub range: Range<usize>,
}

/// Counts gathered while processing a style sheet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StylesheetReport {
    /// Declarations found.
    pub declarations: usize,
    /// Declarations whose value changed.
    pub rewritten: usize,
}

/// Convert every declaration value in a style sheet.
pub fn process_stylesheet(css: &str, processor: &Processor) -> error::Result<String> {
    process_stylesheet_with_report(css, processor).map(|(out, _)| out)
}

/// Like [`process_stylesheet`], also returning what was done.
pub fn process_stylesheet_with_report(
    css: &str,
    processor: &Processor,
) -> error::Result<(String, StylesheetReport)> {
    let declarations = stylesheet_declarations(css);
    splice(css, &declarations, processor)
}

/// Convert every declaration value in a bare declaration list
/// (`width: 48px; margin: 0 2px`).
pub fn process_declaration_list(css: &str, processor: &Processor) -> error::Result<String> {
    let declarations = declaration_list_declarations(css);
    splice(css, &declarations, processor).map(|(out, _)| out)
}

/// Locate every declaration value in a style sheet, in source order.
pub fn stylesheet_declarations(css: &str) -> Vec<DeclarationValue> {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    let mut collector = DeclarationCollector::default();

    for result in StyleSheetParser::new(&mut parser, &mut collector) {
        // Ignore errors - lenient parsing
        let _ = result;
    }

    collector.declarations
}

/// Locate every declaration value in a declaration list, in source order.
pub fn declaration_list_declarations(css: &str) -> Vec<DeclarationValue> {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    let mut collector = DeclarationCollector::default();
    collector.collect_body(&mut parser);
    collector.declarations
}

fn splice(
    css: &str,
    declarations: &[DeclarationValue],
    processor: &Processor,
) -> error::Result<(String, StylesheetReport)> {
    let mut out = String::with_capacity(css.len());
    let mut report = StylesheetReport::default();
    let mut last = 0;

    for decl in declarations {
        let Some(value) = css.get(decl.range.clone()) else {
            continue;
        };
        if decl.range.start < last {
            continue;
        }
        report.declarations += 1;

        let converted = processor
            .transform_value(value)
            .map_err(|e| e.offset_by(decl.range.start))?;
        if converted == value {
            continue;
        }

        report.rewritten += 1;
        out.push_str(&css[last..decl.range.start]);
        out.push_str(&converted);
        last = decl.range.end;
    }
    out.push_str(&css[last..]);

    log::debug!(
        "{} declarations, {} rewritten",
        report.declarations,
        report.rewritten
    );
    Ok((out, report))
}

/// Records declaration value ranges; accepts every rule it is offered so that
/// nested blocks are always entered.
#[derive(Default)]
struct DeclarationCollector {
    declarations: Vec<DeclarationValue>,
}

impl DeclarationCollector {
    fn collect_body(&mut self, input: &mut Parser<'_, '_>) {
        for result in RuleBodyParser::new(input, self) {
            // Ignore errors - lenient parsing
            let _ = result;
        }
    }
}

fn skip_prelude(input: &mut Parser<'_, '_>) {
    while input.next().is_ok() {}
}

impl<'i> AtRuleParser<'i> for DeclarationCollector {
    type Prelude = ();
    type AtRule = ();
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        _name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        skip_prelude(input);
        Ok(())
    }

    fn rule_without_block(
        &mut self,
        _prelude: Self::Prelude,
        _start: &ParserState,
    ) -> Result<Self::AtRule, ()> {
        Ok(())
    }

    fn parse_block<'t>(
        &mut self,
        _prelude: Self::Prelude,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::AtRule, ParseError<'i, Self::Error>> {
        self.collect_body(input);
        Ok(())
    }
}

impl<'i> QualifiedRuleParser<'i> for DeclarationCollector {
    type Prelude = ();
    type QualifiedRule = ();
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        skip_prelude(input);
        Ok(())
    }

    fn parse_block<'t>(
        &mut self,
        _prelude: Self::Prelude,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::QualifiedRule, ParseError<'i, Self::Error>> {
        self.collect_body(input);
        Ok(())
    }
}

impl<'i> DeclarationParser<'i> for DeclarationCollector {
    type Declaration = ();
    type Error = ();

    fn parse_value<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
        _start: &ParserState,
    ) -> Result<Self::Declaration, ParseError<'i, Self::Error>> {
        let start = input.position().byte_index();
        loop {
            match input.next_including_whitespace_and_comments() {
                // A `{}` block means this was a nested rule such as
                // `a:hover { ... }`; let it be parsed as one.
                Ok(Token::CurlyBracketBlock) => return Err(input.new_custom_error(())),
                Ok(_) => {}
                Err(_) => break,
            }
        }
        let end = input.position().byte_index();

        self.declarations.push(DeclarationValue {
            property: name.to_string(),
            range: start..end,
        });
        Ok(())
    }
}

impl<'i> RuleBodyItemParser<'i, (), ()> for DeclarationCollector {
    fn parse_declarations(&self) -> bool {
        true
    }
    fn parse_qualified(&self) -> bool {
        true
    }
}
