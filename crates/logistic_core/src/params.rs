//! Ingestion of the four user-editable model parameters.
//!
//! Input never fails: a missing value and an unparseable value are each
//! replaced by a fixed per-field default. For the two growth rates those
//! defaults differ (0 when missing, 0.1 / 0.05 when unparseable). The
//! asymmetry is kept as observed since its intent is unknown.

use crate::error::ParamError;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The two fallback values a field can take.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldDefaults {
    pub missing: f64,
    pub unparseable: f64,
}

pub const R_SAC_DEFAULTS: FieldDefaults = FieldDefaults {
    missing: 0.0,
    unparseable: 0.1,
};
pub const K_SAC_DEFAULTS: FieldDefaults = FieldDefaults {
    missing: 3.14,
    unparseable: 3.14,
};
pub const R_SCH_DEFAULTS: FieldDefaults = FieldDefaults {
    missing: 0.0,
    unparseable: 0.05,
};
pub const K_SCH_DEFAULTS: FieldDefaults = FieldDefaults {
    missing: 2.48,
    unparseable: 2.48,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamField {
    RSac,
    KSac,
    RSch,
    KSch,
}

impl ParamField {
    pub const ALL: [ParamField; 4] = [
        ParamField::RSac,
        ParamField::KSac,
        ParamField::RSch,
        ParamField::KSch,
    ];

    /// Stable identifier shared with the page inputs and query strings.
    pub fn name(self) -> &'static str {
        match self {
            ParamField::RSac => "r_sac",
            ParamField::KSac => "k_sac",
            ParamField::RSch => "r_sch",
            ParamField::KSch => "k_sch",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.name() == name)
    }

    pub fn defaults(self) -> FieldDefaults {
        match self {
            ParamField::RSac => R_SAC_DEFAULTS,
            ParamField::KSac => K_SAC_DEFAULTS,
            ParamField::RSch => R_SCH_DEFAULTS,
            ParamField::KSch => K_SCH_DEFAULTS,
        }
    }
}

/// A value as it arrives from the page: a number or free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

/// The four raw inputs; `None` means the field was left empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawParams {
    #[serde(default)]
    pub r_sac: Option<RawValue>,
    #[serde(default)]
    pub k_sac: Option<RawValue>,
    #[serde(default)]
    pub r_sch: Option<RawValue>,
    #[serde(default)]
    pub k_sch: Option<RawValue>,
}

impl RawParams {
    pub fn get(&self, field: ParamField) -> Option<&RawValue> {
        match field {
            ParamField::RSac => self.r_sac.as_ref(),
            ParamField::KSac => self.k_sac.as_ref(),
            ParamField::RSch => self.r_sch.as_ref(),
            ParamField::KSch => self.k_sch.as_ref(),
        }
    }

    pub fn set(&mut self, field: ParamField, value: Option<RawValue>) {
        match field {
            ParamField::RSac => self.r_sac = value,
            ParamField::KSac => self.k_sac = value,
            ParamField::RSch => self.r_sch = value,
            ParamField::KSch => self.k_sch = value,
        }
    }
}

impl From<ParamSet> for RawParams {
    fn from(params: ParamSet) -> Self {
        Self {
            r_sac: Some(RawValue::Number(params.r_sac)),
            k_sac: Some(RawValue::Number(params.k_sac)),
            r_sch: Some(RawValue::Number(params.r_sch)),
            k_sch: Some(RawValue::Number(params.k_sch)),
        }
    }
}

/// Parameters ready for integration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParamSet {
    pub r_sac: f64,
    pub k_sac: f64,
    pub r_sch: f64,
    pub k_sch: f64,
}

impl ParamSet {
    pub fn get(&self, field: ParamField) -> f64 {
        match field {
            ParamField::RSac => self.r_sac,
            ParamField::KSac => self.k_sac,
            ParamField::RSch => self.r_sch,
            ParamField::KSch => self.k_sch,
        }
    }
}

impl Default for ParamSet {
    /// The values the page inputs start with.
    fn default() -> Self {
        ingest(&RawParams::default())
    }
}

/// Converts text the way a float literal parser would: surrounding
/// whitespace is ignored and `inf` / `nan` spellings are accepted.
fn parse_text(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Strict conversion of one raw value.
pub fn parse_field(field: ParamField, raw: Option<&RawValue>) -> Result<f64, ParamError> {
    match raw {
        None => Err(ParamError::Missing {
            field: field.name(),
        }),
        Some(RawValue::Number(value)) => Ok(*value),
        Some(RawValue::Text(text)) => parse_text(text).ok_or_else(|| ParamError::Unparseable {
            field: field.name(),
            raw: text.clone(),
        }),
    }
}

/// Converts one raw value, substituting the field's fallback on failure.
pub fn ingest_field(field: ParamField, raw: Option<&RawValue>) -> f64 {
    match parse_field(field, raw) {
        Ok(value) => value,
        Err(err) => {
            let defaults = field.defaults();
            let value = match err {
                ParamError::Missing { .. } => defaults.missing,
                ParamError::Unparseable { .. } => defaults.unparseable,
            };
            debug!(%err, value, "parameter fallback");
            value
        }
    }
}

pub fn ingest(raw: &RawParams) -> ParamSet {
    ParamSet {
        r_sac: ingest_field(ParamField::RSac, raw.r_sac.as_ref()),
        k_sac: ingest_field(ParamField::KSac, raw.k_sac.as_ref()),
        r_sch: ingest_field(ParamField::RSch, raw.r_sch.as_ref()),
        k_sch: ingest_field(ParamField::KSch, raw.k_sch.as_ref()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> Option<RawValue> {
        Some(RawValue::from(value))
    }

    #[test]
    fn missing_capacity_and_unparseable_capacity_agree() {
        assert_eq!(ingest_field(ParamField::KSac, None), 3.14);
        assert_eq!(ingest_field(ParamField::KSac, text("abc").as_ref()), 3.14);
        assert_eq!(ingest_field(ParamField::KSch, None), 2.48);
        assert_eq!(ingest_field(ParamField::KSch, text("abc").as_ref()), 2.48);
    }

    #[test]
    fn missing_rate_and_unparseable_rate_disagree() {
        assert_eq!(ingest_field(ParamField::RSac, None), 0.0);
        assert_eq!(ingest_field(ParamField::RSac, text("abc").as_ref()), 0.1);
        assert_eq!(ingest_field(ParamField::RSch, None), 0.0);
        assert_eq!(ingest_field(ParamField::RSch, text("abc").as_ref()), 0.05);
    }

    #[test]
    fn ingesting_a_valid_float_is_idempotent() {
        for value in [0.0, 0.2, 13.0, -4.5, 1e-9, 123456.789] {
            let raw = Some(RawValue::Number(value));
            let once = ingest_field(ParamField::RSac, raw.as_ref());
            assert_eq!(once, value);
            let twice = ingest_field(ParamField::RSac, Some(&RawValue::Number(once)));
            assert_eq!(twice, once);

            let rendered = text(&once.to_string());
            assert_eq!(ingest_field(ParamField::KSch, rendered.as_ref()), value);
        }
    }

    #[test]
    fn text_parsing_follows_float_literals() {
        assert_eq!(ingest_field(ParamField::RSac, text(" 0.25 ").as_ref()), 0.25);
        assert_eq!(ingest_field(ParamField::RSac, text("1e-1").as_ref()), 0.1);
        assert!(ingest_field(ParamField::KSac, text("inf").as_ref()).is_infinite());
        assert!(ingest_field(ParamField::KSac, text("nan").as_ref()).is_nan());
        assert_eq!(ingest_field(ParamField::RSac, text("").as_ref()), 0.1);
        assert_eq!(ingest_field(ParamField::RSac, text("   ").as_ref()), 0.1);
        assert_eq!(ingest_field(ParamField::RSac, text("1,5").as_ref()), 0.1);
    }

    #[test]
    fn parse_field_reports_reason() {
        assert_eq!(
            parse_field(ParamField::RSch, None),
            Err(ParamError::Missing { field: "r_sch" })
        );
        let err = parse_field(ParamField::KSac, text("x").as_ref()).expect_err("unparseable");
        assert_eq!(err.to_string(), "value \"x\" for k_sac is not a number");
    }

    #[test]
    fn ingest_fills_every_field() {
        let raw = RawParams {
            r_sac: Some(RawValue::Number(0.2)),
            k_sac: text("13"),
            r_sch: text("oops"),
            k_sch: None,
        };
        assert_eq!(
            ingest(&raw),
            ParamSet {
                r_sac: 0.2,
                k_sac: 13.0,
                r_sch: 0.05,
                k_sch: 2.48,
            }
        );
    }

    #[test]
    fn default_param_set_matches_initial_inputs() {
        assert_eq!(
            ParamSet::default(),
            ParamSet {
                r_sac: 0.0,
                k_sac: 3.14,
                r_sch: 0.0,
                k_sch: 2.48,
            }
        );
    }

    #[test]
    fn field_names_round_trip() {
        for field in ParamField::ALL {
            assert_eq!(ParamField::from_name(field.name()), Some(field));
        }
        assert_eq!(ParamField::from_name("r"), None);
    }

    #[test]
    fn raw_params_deserialize_numbers_strings_and_gaps() {
        let raw: RawParams =
            serde_json::from_str(r#"{"r_sac": 0.2, "k_sac": "13", "r_sch": null}"#)
                .expect("valid json");
        assert_eq!(raw.r_sac, Some(RawValue::Number(0.2)));
        assert_eq!(raw.k_sac, text("13"));
        assert_eq!(raw.r_sch, None);
        assert_eq!(raw.k_sch, None);
    }

    #[test]
    fn raw_params_get_and_set_by_field() {
        let mut raw = RawParams::default();
        raw.set(ParamField::KSch, text("7"));
        assert_eq!(raw.get(ParamField::KSch), text("7").as_ref());
        assert_eq!(raw.get(ParamField::RSac), None);
        assert_eq!(ingest(&raw).get(ParamField::KSch), 7.0);
    }
}
