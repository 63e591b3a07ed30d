//! Browser bindings for the logistic growth dashboard.
//!
//! The served page fetches figures from the server's JSON endpoint. These
//! bindings run the same computation in-process for pages that embed the
//! module instead.

mod dashboard;
mod inputs;

pub use dashboard::WasmDashboard;

use dashboard::figure_to_js;
use inputs::raw_params_from_js;
use logistic_core::{recompute, DashboardConfig};
use wasm_bindgen::prelude::*;

/// Recomputes the chart with the built-in grid and solver settings.
#[wasm_bindgen]
pub fn recompute_default(
    r_sac: JsValue,
    k_sac: JsValue,
    r_sch: JsValue,
    k_sch: JsValue,
) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();
    let raw = raw_params_from_js(&r_sac, &k_sac, &r_sch, &k_sch);
    figure_to_js(&recompute(&raw, &DashboardConfig::default()))
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::wasm_bindgen_test;

    #[wasm_bindgen_test]
    fn recompute_default_returns_four_traces() {
        let figure = recompute_default(
            JsValue::from_f64(0.2),
            JsValue::from_str("13"),
            JsValue::UNDEFINED,
            JsValue::from_str("abc"),
        )
        .expect("figure");
        let data = js_sys::Reflect::get(&figure, &JsValue::from_str("data"))
            .expect("data field")
            .dyn_into::<js_sys::Array>()
            .expect("array");
        assert_eq!(data.length(), 4);
    }
}
