//! Conversion options and validated conversion rules.
//!
//! [`Options`] is the raw, user-facing option set (the same shape as the
//! style-sheet plugin option object). [`ConversionRules`] is built from it once,
//! validated, and then shared read-only by every conversion.

use crate::error::{Error, Result};

/// Raw conversion options. Every field has a default.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(default, rename_all = "camelCase", deny_unknown_fields)
)]
pub struct Options {
    /// Root font size all conversions are based on.
    pub base_size: f64,
    /// Unit emitted for resolution-independent measurements.
    pub ri_unit: String,
    /// Unit converted to `ri_unit`.
    pub unit: String,
    /// Unit relabeled 1:1 to `unit` instead of being scaled.
    pub absolute_unit: String,
    /// Smallest magnitude (in `unit`) a measurement may shrink to at the
    /// lowest supported resolution.
    pub min_unit_size: f64,
    /// Root font size at the lowest supported resolution.
    pub min_size: f64,
    /// Maximum number of fractional digits in converted output.
    pub precision: i64,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            base_size: 24.0,
            ri_unit: "rem".to_string(),
            unit: "px".to_string(),
            absolute_unit: "apx".to_string(),
            min_unit_size: 1.0,
            min_size: 16.0,
            precision: 5,
        }
    }
}

impl Options {
    pub fn with_base_size(mut self, base_size: f64) -> Self {
        self.base_size = base_size;
        self
    }

    pub fn with_ri_unit(mut self, ri_unit: impl Into<String>) -> Self {
        self.ri_unit = ri_unit.into();
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    pub fn with_absolute_unit(mut self, absolute_unit: impl Into<String>) -> Self {
        self.absolute_unit = absolute_unit.into();
        self
    }

    pub fn with_min_unit_size(mut self, min_unit_size: f64) -> Self {
        self.min_unit_size = min_unit_size;
        self
    }

    pub fn with_min_size(mut self, min_size: f64) -> Self {
        self.min_size = min_size;
        self
    }

    pub fn with_precision(mut self, precision: i64) -> Self {
        self.precision = precision;
        self
    }

    /// Validate these options into [`ConversionRules`].
    pub fn into_rules(self) -> Result<ConversionRules> {
        ConversionRules::new(self)
    }
}

/// Validated, immutable conversion rules.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRules {
    base_size: f64,
    ri_unit: String,
    unit: String,
    absolute_unit: String,
    min_unit_size: f64,
    min_size: f64,
    precision: u32,
    min_scale_factor: f64,
}

impl ConversionRules {
    /// Validate `options` and derive the minimum scale factor.
    pub fn new(options: Options) -> Result<Self> {
        let Options {
            base_size,
            min_unit_size,
            min_size,
            precision,
            ..
        } = options;

        if !base_size.is_finite() || base_size <= 0.0 {
            return Err(invalid(format!("baseSize must be > 0, got {base_size}")));
        }
        if !min_size.is_finite() || min_size <= 0.0 {
            return Err(invalid(format!("minSize must be > 0, got {min_size}")));
        }
        if !min_unit_size.is_finite() || min_unit_size < 0.0 {
            return Err(invalid(format!(
                "minUnitSize must be >= 0, got {min_unit_size}"
            )));
        }
        let precision = u32::try_from(precision)
            .map_err(|_| invalid(format!("precision must be >= 0, got {precision}")))?;

        for (name, value) in [
            ("riUnit", &options.ri_unit),
            ("unit", &options.unit),
            ("absoluteUnit", &options.absolute_unit),
        ] {
            if value.is_empty() {
                return Err(invalid(format!("{name} must not be empty")));
            }
        }

        Ok(Self::from_parts(options, precision))
    }

    /// Assemble rules from options already known to be valid.
    fn from_parts(options: Options, precision: u32) -> Self {
        Self {
            min_scale_factor: options.min_size / options.base_size,
            base_size: options.base_size,
            ri_unit: options.ri_unit,
            unit: options.unit,
            absolute_unit: options.absolute_unit,
            min_unit_size: options.min_unit_size,
            min_size: options.min_size,
            precision,
        }
    }

    pub fn base_size(&self) -> f64 {
        self.base_size
    }

    pub fn ri_unit(&self) -> &str {
        &self.ri_unit
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn absolute_unit(&self) -> &str {
        &self.absolute_unit
    }

    pub fn min_unit_size(&self) -> f64 {
        self.min_unit_size
    }

    pub fn min_size(&self) -> f64 {
        self.min_size
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    /// `min_size / base_size`: how much a measurement shrinks at the lowest
    /// supported resolution.
    pub fn min_scale_factor(&self) -> f64 {
        self.min_scale_factor
    }
}

impl Default for ConversionRules {
    fn default() -> Self {
        let options = Options::default();
        let precision = u32::try_from(options.precision).unwrap_or_default();
        Self::from_parts(options, precision)
    }
}

impl TryFrom<Options> for ConversionRules {
    type Error = Error;

    fn try_from(options: Options) -> Result<Self> {
        Self::new(options)
    }
}

fn invalid(msg: String) -> Error {
    Error::InvalidConfiguration(msg)
}
