//! Conversion of page input values into raw parameters.

use logistic_core::params::{RawParams, RawValue};
use wasm_bindgen::prelude::*;

/// `undefined`/`null` mean the field is empty; numbers and strings pass
/// through; any other JS value is treated as text that does not parse.
pub(crate) fn raw_from_js(value: &JsValue) -> Option<RawValue> {
    let empty = value.is_undefined() || value.is_null();
    classify(empty, value.as_f64(), value.as_string())
}

fn classify(empty: bool, number: Option<f64>, text: Option<String>) -> Option<RawValue> {
    if empty {
        return None;
    }
    match number {
        Some(number) => Some(RawValue::Number(number)),
        None => Some(RawValue::Text(text.unwrap_or_default())),
    }
}

pub(crate) fn raw_params_from_js(
    r_sac: &JsValue,
    k_sac: &JsValue,
    r_sch: &JsValue,
    k_sch: &JsValue,
) -> RawParams {
    RawParams {
        r_sac: raw_from_js(r_sac),
        k_sac: raw_from_js(k_sac),
        r_sch: raw_from_js(r_sch),
        k_sch: raw_from_js(k_sch),
    }
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::wasm_bindgen_test;

    #[wasm_bindgen_test]
    fn empty_values_are_missing() {
        assert_eq!(raw_from_js(&JsValue::UNDEFINED), None);
        assert_eq!(raw_from_js(&JsValue::NULL), None);
    }

    #[wasm_bindgen_test]
    fn numbers_and_strings_pass_through() {
        assert_eq!(
            raw_from_js(&JsValue::from_f64(0.2)),
            Some(RawValue::Number(0.2))
        );
        assert_eq!(
            raw_from_js(&JsValue::from_str("13")),
            Some(RawValue::Text("13".to_string()))
        );
    }

    #[wasm_bindgen_test]
    fn other_values_are_unparseable_text() {
        assert_eq!(
            raw_from_js(&JsValue::from_bool(true)),
            Some(RawValue::Text(String::new()))
        );
    }

    #[wasm_bindgen_test]
    fn raw_params_keep_field_order() {
        let raw = raw_params_from_js(
            &JsValue::from_f64(0.2),
            &JsValue::UNDEFINED,
            &JsValue::from_str("x"),
            &JsValue::from_f64(6.0),
        );
        assert_eq!(raw.r_sac, Some(RawValue::Number(0.2)));
        assert_eq!(raw.k_sac, None);
        assert_eq!(raw.r_sch, Some(RawValue::Text("x".to_string())));
        assert_eq!(raw.k_sch, Some(RawValue::Number(6.0)));
    }
}
