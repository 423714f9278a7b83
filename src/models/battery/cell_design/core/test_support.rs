use serde_json::Value;

use crate::support::catalog::Catalog;

use super::{CellDesign, FormFactor, Overrides};

/// The unvalidated default design of a form factor.
pub(crate) fn default_design(form_factor: FormFactor) -> CellDesign {
    CellDesign::defaults(form_factor, Catalog::standard())
        .expect("standard catalog holds every default")
}

/// Builds an override map from a `json!` object literal.
pub(crate) fn overrides(value: Value) -> Overrides {
    match value {
        Value::Object(map) => map,
        other => panic!("overrides must be a JSON object, got {other}"),
    }
}
