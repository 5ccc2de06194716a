//! Unit conversion over value trees.
//!
//! Every number whose unit is the configured `unit` is converted to
//! `ri_unit` (or clamped when it would shrink below `min_unit_size` at the
//! smallest supported resolution); every number in `absolute_unit` is
//! relabeled to `unit`. Nothing else in the value changes.

use crate::error::Result;
use crate::options::ConversionRules;
use crate::stylesheet;
use crate::value::{self, ListNode, NumberNode, ToCss, Visitor};

/// Convert the numbers in a declaration value.
///
/// Never fails: malformed input is handled on a best-effort basis and
/// returned with only its eligible numbers rewritten.
pub fn transform(value: &str, rules: &ConversionRules) -> String {
    let mut tree = value::parse(value);
    if transform_tree(&mut tree, rules) == 0 {
        return value.to_string();
    }
    tree.to_css_string()
}

/// Like [`transform`], but rejects unbalanced parentheses and unterminated
/// strings or comments with [`Error::MalformedValue`](crate::Error::MalformedValue).
pub fn transform_strict(value: &str, rules: &ConversionRules) -> Result<String> {
    let mut tree = value::parse_strict(value)?;
    if transform_tree(&mut tree, rules) == 0 {
        return Ok(value.to_string());
    }
    Ok(tree.to_css_string())
}

/// Rewrite every eligible number in `tree` in place.
///
/// Returns the number of numbers that changed.
pub fn transform_tree(tree: &mut ListNode, rules: &ConversionRules) -> usize {
    let mut transformer = UnitTransformer::new(rules);
    tree.visit(&mut transformer);
    transformer.rewritten()
}

/// The visitor that applies [`ConversionRules`] to each number.
pub struct UnitTransformer<'r> {
    rules: &'r ConversionRules,
    rewritten: usize,
}

impl<'r> UnitTransformer<'r> {
    pub fn new(rules: &'r ConversionRules) -> Self {
        Self {
            rules,
            rewritten: 0,
        }
    }

    pub fn rewritten(&self) -> usize {
        self.rewritten
    }
}

impl Visitor for UnitTransformer<'_> {
    fn visit_number(&mut self, number: &mut NumberNode) {
        if convert_number(number, self.rules) {
            self.rewritten += 1;
            log::trace!(
                "{} -> {}",
                number.original_text(),
                number.to_css_string()
            );
        }
    }
}

enum Eligibility {
    Scale,
    Relabel,
}

/// Apply the conversion rules to one number. Returns whether it changed.
fn convert_number(number: &mut NumberNode, rules: &ConversionRules) -> bool {
    let eligibility = match number.unit() {
        Some(unit) if unit == rules.unit() => Eligibility::Scale,
        Some(unit) if unit == rules.absolute_unit() => Eligibility::Relabel,
        _ => return false,
    };

    let value = number.value();
    match eligibility {
        Eligibility::Scale => {
            let min_unit_size = rules.min_unit_size();
            let scaled = (value * rules.min_scale_factor()).abs();
            if scaled != 0.0 && scaled <= min_unit_size {
                // Too small to shrink any further: hold at the floor, or
                // leave alone if already below it.
                if value.abs() >= min_unit_size {
                    let sign = if value < 0.0 { -1.0 } else { 1.0 };
                    number.set_value(min_unit_size * sign);
                }
            } else {
                let converted = saturate(value / rules.base_size());
                number.set_value(round_to_precision(converted, rules.precision()));
                number.set_unit(rules.ri_unit());
            }
        }
        Eligibility::Relabel => number.set_unit(rules.unit()),
    }

    number.is_modified()
}

/// Round half away from zero to `precision` fractional digits.
///
/// Values too large to scale are returned as they are.
pub(crate) fn round_to_precision(value: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(i32::try_from(precision).unwrap_or(i32::MAX));
    let scaled = value * factor;
    if !factor.is_finite() || !scaled.is_finite() {
        return value;
    }
    let rounded = scaled.round() / factor;
    if rounded.is_finite() { rounded } else { value }
}

fn saturate(value: f64) -> f64 {
    if value.is_infinite() {
        f64::MAX.copysign(value)
    } else {
        value
    }
}

/// Conversion rules bundled with a parse mode.
///
/// Holds no mutable state, so one processor can be shared by many threads.
#[derive(Debug, Clone, Default)]
pub struct Processor {
    rules: ConversionRules,
    strict: bool,
}

impl Processor {
    pub fn new(rules: ConversionRules) -> Self {
        Self {
            rules,
            strict: false,
        }
    }

    /// Fail on malformed values instead of passing them through.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn rules(&self) -> &ConversionRules {
        &self.rules
    }

    /// Convert one declaration value.
    pub fn transform_value(&self, value: &str) -> Result<String> {
        if self.strict {
            transform_strict(value, &self.rules)
        } else {
            Ok(transform(value, &self.rules))
        }
    }

    /// Convert every declaration value in a style sheet.
    pub fn process_stylesheet(&self, css: &str) -> Result<String> {
        stylesheet::process_stylesheet(css, self)
    }

    /// Convert every declaration value in a declaration list such as the
    /// contents of a `style` attribute.
    pub fn process_declarations(&self, css: &str) -> Result<String> {
        stylesheet::process_declaration_list(css, self)
    }
}
