//! WASM bindings for pachyderm-dag.
//!
//! Exposes `renderDag` to JavaScript via wasm-bindgen.

use wasm_bindgen::prelude::*;

use crate::config::RenderConfig;

/// Render the `dag` endpoint's JSON body to an SVG string sized
/// `width × height`.
#[wasm_bindgen(js_name = "renderDag")]
pub fn render_dag(json: &str, width: f64, height: f64) -> Result<String, JsError> {
    let config = RenderConfig::new().with_size(width, height);
    crate::render_dag_json(json, &config).map_err(|e| JsError::new(&e.to_string()))
}
