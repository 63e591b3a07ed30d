//! Dashboard object exposed to the page.

use crate::inputs::raw_params_from_js;
use js_sys::Float64Array;
use logistic_core::chart::Figure;
use logistic_core::params::RawParams;
use logistic_core::reference;
use logistic_core::{Dashboard, DashboardConfig};
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct WasmDashboard {
    dashboard: Dashboard,
}

pub(crate) fn figure_to_js(figure: &Figure) -> Result<JsValue, JsValue> {
    to_value(figure).map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

#[wasm_bindgen]
impl WasmDashboard {
    /// `config` may be `undefined` to use the built-in grid and solver.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<WasmDashboard, JsValue> {
        console_error_panic_hook::set_once();

        let config: DashboardConfig = if config.is_undefined() || config.is_null() {
            DashboardConfig::default()
        } else {
            from_value(config).map_err(|e| JsValue::from_str(&format!("Invalid config: {}", e)))?
        };
        Self::from_config(config).map_err(|e| JsValue::from_str(&e))
    }

    pub fn recompute(
        &self,
        r_sac: JsValue,
        k_sac: JsValue,
        r_sch: JsValue,
        k_sch: JsValue,
    ) -> Result<JsValue, JsValue> {
        let raw = raw_params_from_js(&r_sac, &k_sac, &r_sch, &k_sch);
        figure_to_js(&self.figure_for(&raw))
    }

    pub fn sample_times(&self) -> Float64Array {
        Float64Array::from(self.dashboard.sample_times().as_slice())
    }

    pub fn reference(&self) -> Result<JsValue, JsValue> {
        to_value(&reference::ALL)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }
}

impl WasmDashboard {
    pub(crate) fn from_config(config: DashboardConfig) -> Result<WasmDashboard, String> {
        config.grid.validate().map_err(|e| e.to_string())?;
        config.solver.validate().map_err(|e| e.to_string())?;
        Ok(WasmDashboard {
            dashboard: Dashboard::new(config),
        })
    }

    pub(crate) fn figure_for(&self, raw: &RawParams) -> Figure {
        self.dashboard.recompute(raw)
    }
}
