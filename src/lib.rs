//! # resolution-independence
//!
//! Converts pixel measurements inside CSS declaration values into
//! resolution-independent units, leaving every other byte of the value
//! untouched.
//!
//! ## Features
//!
//! - Converts `px` (or any configured unit) to `rem` (or any configured unit)
//!   relative to a base root font size
//! - Holds small measurements at a minimum size instead of scaling them away
//! - Relabels an "absolute" marker unit (`apx`) to plain `px`
//! - Finds numbers inside nested functions (`translate3d`, gradients, `calc`)
//!   while never looking inside strings, URLs or comments
//! - Walks whole style sheets, including nested rules and at-rules
//!
//! ## Quick Start
//!
//! ```
//! use resolution_independence::{ConversionRules, transform};
//!
//! let rules = ConversionRules::default();
//! assert_eq!(transform("translate3d(48px, 36px, 18px)", &rules), "translate3d(2rem, 1.5rem, 0.75rem)");
//! assert_eq!(transform("url(\"48px.png\") 10apx", &rules), "url(\"48px.png\") 10px");
//! ```
//!
//! ## Configuration
//!
//! ```
//! use resolution_independence::{Options, Processor};
//!
//! let rules = Options::default()
//!     .with_base_size(32.0)
//!     .with_ri_unit("vh")
//!     .into_rules()
//!     .unwrap();
//!
//! let processor = Processor::new(rules);
//! let css = processor.process_stylesheet("a { width: 48px; opacity: 0.5 }").unwrap();
//! assert_eq!(css, "a { width: 1.5vh; opacity: 0.5 }");
//! ```

pub mod error;
pub mod options;
pub mod stylesheet;
pub mod transform;
pub mod util;
pub mod value;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::{Error, Result};
pub use options::{ConversionRules, Options};
pub use stylesheet::{StylesheetReport, process_stylesheet};
pub use transform::{Processor, transform, transform_strict, transform_tree};
pub use value::{ListNode, Node, ToCss};
