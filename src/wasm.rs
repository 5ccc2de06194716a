//! WASM bindings for running conversions from JavaScript.
//!
//! Options are passed as the same JSON object the style-sheet plugin accepts
//! (`{"baseSize": 24, "riUnit": "rem", ...}`); omit it for the defaults.

use wasm_bindgen::prelude::*;

use crate::error::Error;
use crate::options::Options;
use crate::transform::Processor;

/// Initialize panic hook for better error messages in the browser console.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Convert one declaration value.
#[wasm_bindgen(js_name = transformValue)]
pub fn transform_value(value: &str, options: Option<String>) -> Result<String, JsValue> {
    let processor = processor(options.as_deref())?;
    processor.transform_value(value).map_err(to_js)
}

/// Convert every declaration value in a style sheet.
#[wasm_bindgen(js_name = processCss)]
pub fn process_css(css: &str, options: Option<String>) -> Result<String, JsValue> {
    let processor = processor(options.as_deref())?;
    processor.process_stylesheet(css).map_err(to_js)
}

fn processor(options: Option<&str>) -> Result<Processor, JsValue> {
    let options = match options {
        Some(json) => {
            serde_json::from_str::<Options>(json).map_err(|e| to_js(Error::Config(e.to_string())))?
        }
        None => Options::default(),
    };
    let rules = options.into_rules().map_err(to_js)?;
    Ok(Processor::new(rules))
}

fn to_js(e: Error) -> JsValue {
    JsValue::from_str(&e.to_string())
}
