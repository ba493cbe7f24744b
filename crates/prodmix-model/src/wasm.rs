//! WASM bindings for prodmix
//!
//! A web form collects the inputs, calls [`solve`] on every change and, when the
//! report says the solve succeeded, [`plot`] for the feasible-region image.

use wasm_bindgen::prelude::*;

use crate::adapter::solve_production_mix;
use crate::params::MixInputs;
use crate::plot::render_svg;
use crate::report::Report;

/// The documented default inputs, as a template for the form
#[wasm_bindgen]
pub fn default_inputs() -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&MixInputs::default()).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Solve and return the report as JSON
#[wasm_bindgen]
pub fn solve(inputs: JsValue) -> Result<JsValue, JsValue> {
    let inputs: MixInputs = serde_wasm_bindgen::from_value(inputs).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let solution = solve_production_mix(&inputs).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let report = Report::new(&inputs, &solution);
    serde_wasm_bindgen::to_value(&report).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Solve and return the feasible-region plot as an SVG document
#[wasm_bindgen]
pub fn plot(inputs: JsValue) -> Result<String, JsValue> {
    let inputs: MixInputs = serde_wasm_bindgen::from_value(inputs).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let solution = solve_production_mix(&inputs).map_err(|e| JsValue::from_str(&e.to_string()))?;
    render_svg(&inputs, &solution).map_err(|e| JsValue::from_str(&e.to_string()))
}
