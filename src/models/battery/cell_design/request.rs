//! Design requests as they arrive from an outer tool layer.
//!
//! A request is stricter than [`CellDesign::from_overrides`]: its keys come
//! from a fixed allow-list, the form factor and both formulations must be
//! named, and an optional capacity target must be met within 1%.

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;
use uom::si::{electric_charge::ampere_hour, f64::ElectricCharge};

use crate::support::{
    catalog::Catalog,
    constraint::StrictlyPositive,
    formulation::FormulationFields,
};

use super::core::{
    CAPACITY_TOLERANCE, CellDesign, DesignConfig, DesignError, Field, Overrides,
    Side, TargetCapacityConfig, Violation, assemble, mass_loading_limits,
};

/// Top-level keys a request may set. Every other input keeps its default.
const ALLOWED_FIELDS: [Field; 27] = [
    Field::FormFactor,
    Field::PositiveMassLoading,
    Field::PositiveSheetCount,
    Field::PositiveCoatingThickness,
    Field::PositiveFoilThickness,
    Field::NegativeMassLoading,
    Field::NegativeCoatingThickness,
    Field::NegativeFoilThickness,
    Field::NegativeFormulation,
    Field::PositiveFormulation,
    Field::SeparatorThickness,
    Field::SeparatorArealDensity,
    Field::CellHeight,
    Field::CellDiameter,
    Field::CellWidth,
    Field::CellThickness,
    Field::VolumePackingRatio,
    Field::ElectrodeOverhang,
    Field::CasingThickness,
    Field::CasingMaterial,
    Field::ThermalResistance,
    Field::CoolingArc,
    Field::CoolingChannelHeight,
    Field::JellyRollInnerDiameter,
    Field::JellyRollCount,
    Field::UpperVoltageCutoff,
    Field::LowerVoltageCutoff,
];

/// Keys a request may carry that no design field reads.
const IGNORED_KEYS: [&str; 1] = ["Cell mass packing ratio"];

/// Dotted sub-keys a request may set on nested records.
const DOTTED_KEYS: [(Field, &[&str]); 3] = [
    (
        Field::PositiveFormulation,
        &[
            FormulationFields::PRIMARY_BINDER,
            FormulationFields::PRIMARY_ACTIVE_MATERIAL,
            "Primary conductive agent",
            FormulationFields::PRIMARY_BINDER_MASS_FRACTION,
            FormulationFields::SPECIFIC_CAPACITY,
            FormulationFields::PRIMARY_ACTIVE_MATERIAL_MASS_FRACTION,
            "Primary conductive agent mass fraction",
        ],
    ),
    (
        Field::NegativeFormulation,
        &[
            FormulationFields::PRIMARY_BINDER,
            "Secondary binder",
            FormulationFields::PRIMARY_ACTIVE_MATERIAL,
            FormulationFields::PRIMARY_BINDER_MASS_FRACTION,
            "Secondary binder mass fraction",
            FormulationFields::SPECIFIC_CAPACITY,
            FormulationFields::PRIMARY_ACTIVE_MATERIAL_MASS_FRACTION,
        ],
    ),
    (
        Field::CasingMaterial,
        &[
            "Name",
            "Density [g.cm-3]",
            "Thermal conductivity [W.m-1.K-1]",
            "Specific heat [J.g-1.K-1]",
        ],
    ),
];

/// Cut-offs and positive mass loading used for LFP cathodes unless the
/// request sets them.
const LFP_PRESETS: [(Field, f64); 3] = [
    (Field::UpperVoltageCutoff, 3.65),
    (Field::LowerVoltageCutoff, 2.5),
    (Field::PositiveMassLoading, 20.0),
];

/// A design request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DesignRequest {
    /// Alias-keyed design parameters.
    pub parameters: Overrides,

    /// Capacity the design must reach, in A·h.
    #[serde(default)]
    pub target_capacity_ah: Option<f64>,

    #[serde(default)]
    pub config: DesignConfig,
}

/// A validated design and its serialized forms.
#[derive(Debug, Clone, PartialEq)]
pub struct DesignOutcome {
    pub design: CellDesign,

    /// Every applicable field keyed by alias.
    pub dump: Map<String, Value>,

    /// Compact sorted JSON of `dump`, for content hashing by the caller.
    pub canonical_json: String,

    /// One-line summary, e.g. "Cell design with Pouch form factor, LFP
    /// cathode, Graphite anode, 66.3Ah capacity".
    pub description: String,
}

fn is_allowed(key: &str) -> bool {
    if IGNORED_KEYS.iter().any(|ignored| *ignored == key) {
        return true;
    }
    if let Some(field) = Field::from_alias(key) {
        return ALLOWED_FIELDS.contains(&field);
    }
    key.split_once('.').is_some_and(|(base, sub)| {
        DOTTED_KEYS
            .iter()
            .any(|(field, subs)| field.alias() == base && subs.iter().any(|s| *s == sub))
    })
}

fn require(parameters: &Overrides, field: Field, message: &str) -> Result<(), DesignError> {
    if parameters.get(field.alias()).is_some_and(|v| !v.is_null()) {
        Ok(())
    } else {
        Err(Violation::new(field.alias(), message).into())
    }
}

/// Builds and validates the design a request describes.
///
/// # Errors
///
/// Returns [`DesignError::UnrecognizedParameter`] for keys off the
/// allow-list, [`DesignError::InvalidDesign`] when a required key is
/// missing or the capacity target is missed, and otherwise whatever
/// [`CellDesign::from_overrides`] returns.
pub fn get_cell_design(
    catalog: &Catalog,
    request: &DesignRequest,
) -> Result<DesignOutcome, DesignError> {
    let mut parameters = request.parameters.clone();

    if let Some(key) = parameters.keys().find(|key| !is_allowed(key)) {
        return Err(DesignError::UnrecognizedParameter { key: key.clone() });
    }
    for key in IGNORED_KEYS {
        if parameters.remove(key).is_some() {
            debug!(key, "ignoring parameter with no design field");
        }
    }
    require(
        &parameters,
        Field::FormFactor,
        "Form factor:Prismatic, Pouch, or Cylindrical must be specified in cell design parameters.",
    )?;
    require(
        &parameters,
        Field::PositiveFormulation,
        "Positive electrode formulation must be specified in the format: Positive electrode formulation: 'LFP', 'NMC811', etc.",
    )?;
    require(
        &parameters,
        Field::NegativeFormulation,
        "Negative electrode formulation must be specified in the format: Negative electrode formulation: 'Graphite', 'Si', etc.",
    )?;

    if has_lfp_cathode(catalog, &parameters)? {
        for (field, value) in LFP_PRESETS {
            if !parameters.contains_key(field.alias()) {
                debug!(alias = field.alias(), value, "applying LFP preset");
                parameters.insert(field.alias().into(), Value::from(value));
            }
        }
    }

    let design = CellDesign::from_overrides(catalog, &parameters, &request.config)?;

    if let Some(target) = request.target_capacity_ah {
        check_capacity(&design, target, &request.config)?;
    }

    let dump = design.dump_by_alias();
    let canonical_json = design.canonical_json();
    let description = describe(&design);
    Ok(DesignOutcome {
        design,
        dump,
        canonical_json,
        description,
    })
}

fn has_lfp_cathode(catalog: &Catalog, parameters: &Overrides) -> Result<bool, DesignError> {
    let design = assemble(catalog, parameters)?;
    let material = design.positive().formulation.primary_active_material();
    Ok(catalog
        .materials()
        .resolve(material)
        .is_ok_and(|name| name == "LFP"))
}

fn describe(design: &CellDesign) -> String {
    format!(
        "Cell design with {} form factor, {} cathode, {} anode, {:.1}Ah capacity",
        design.form_factor(),
        design.positive().formulation.primary_active_material(),
        design.negative().formulation.primary_active_material(),
        design.nominal_capacity(),
    )
}

fn check_capacity(
    design: &CellDesign,
    target: f64,
    config: &DesignConfig,
) -> Result<(), DesignError> {
    let alias = Field::NominalCapacity.alias();
    let target_charge = StrictlyPositive::new(ElectricCharge::new::<ampere_hour>(target))
        .map_err(|_| Violation::new(alias, format!("Target capacity must be positive, got {target}")))?;

    let capacity = design.nominal_capacity();
    if (capacity - target).abs() < CAPACITY_TOLERANCE * target {
        return Ok(());
    }

    let hint = match design.match_capacity(target_charge, TargetCapacityConfig::default(), config) {
        Ok(found) => format!(
            "Consider changing the positive electrode mass loading, which is {}, to {:.2} to meet the target.",
            design.positive().mass_loading,
            found.mass_loading,
        ),
        Err(err) => {
            debug!(%err, "no mass loading within limits meets the target");
            out_of_reach_hint(design, target)
        }
    };
    let hint = match sheet_count_hint(design, target) {
        Some(sheets) => format!("{hint} {sheets}"),
        None => hint,
    };

    Err(Violation::new(
        alias,
        format!(
            "Design capacity is {capacity:.1}Ah, which is not within 1% tolerance of the target capacity of {target}Ah. {hint}"
        ),
    )
    .with_value(capacity)
    .into())
}

/// Linear estimate clamped to the mass loading limits, with the active
/// material fraction that would make up the rest.
fn out_of_reach_hint(design: &CellDesign, target: f64) -> String {
    let limits = mass_loading_limits(Side::Positive);
    let current = design.positive().mass_loading;
    let fraction = design
        .positive()
        .formulation
        .primary_active_material_mass_fraction();
    let wanted = target / design.nominal_capacity() * current;

    if wanted <= limits.min() {
        let needed = wanted * fraction / limits.min();
        format!(
            "Consider changing the positive electrode mass loading, which is {current}, to {} and positive electrode active material mass fraction, which is {fraction}, below {needed:.3} to meet the target.",
            limits.min(),
        )
    } else if wanted >= limits.max() {
        let needed = wanted * fraction / limits.max();
        if needed > 0.98 {
            format!(
                "Consider changing the positive electrode mass loading, which is {current}, to {}, positive electrode active material mass fraction, which is {fraction}, to 0.98 and cell volume packing ratio above {} to meet the target.",
                limits.max(),
                design.volume_packing_ratio(),
            )
        } else {
            format!(
                "Consider changing the positive electrode mass loading, which is {current}, to {} and positive electrode active material mass fraction, which is {fraction}, above {needed:.3} to meet the target.",
                limits.max(),
            )
        }
    } else {
        format!(
            "Consider changing the positive electrode mass loading, which is {current}, to {wanted:.2} to meet the target."
        )
    }
}

/// Proportional sheet count for stacked cells, when it differs.
fn sheet_count_hint(design: &CellDesign, target: f64) -> Option<String> {
    if !design.form_factor().is_stacked() {
        return None;
    }
    let sheets = design.positive_sheet_count();
    let scaled = (target / design.nominal_capacity() * f64::from(sheets)).trunc();
    (scaled != f64::from(sheets)).then(|| {
        format!(
            "Alternatively, adjust the positive electrode sheet count, which is {sheets}, to {scaled} to meet the target."
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use serde_json::json;

    fn request(parameters: Value, target_capacity_ah: Option<f64>) -> DesignRequest {
        let Value::Object(parameters) = parameters else {
            panic!("parameters must be an object");
        };
        DesignRequest {
            parameters,
            target_capacity_ah,
            config: DesignConfig::default(),
        }
    }

    fn violation(err: DesignError) -> Violation {
        match err {
            DesignError::InvalidDesign(violation) => violation,
            other => panic!("expected a design violation, got {other:?}"),
        }
    }

    #[test]
    fn lfp_pouch_uses_lfp_presets() -> Result<(), DesignError> {
        let outcome = get_cell_design(
            Catalog::standard(),
            &request(
                json!({
                    "Form factor": "Pouch",
                    "Positive electrode formulation": "LFP",
                    "Negative electrode formulation": "Graphite",
                }),
                None,
            ),
        )?;

        assert_eq!(outcome.dump["Upper voltage cut-off [V]"], json!(3.65));
        assert_eq!(outcome.dump["Lower voltage cut-off [V]"], json!(2.5));
        assert_relative_eq!(outcome.design.positive().mass_loading, 20.0);
        assert!(outcome.design.nominal_capacity() > 0.0);
        assert_eq!(
            outcome.description,
            "Cell design with Pouch form factor, LFP cathode, Graphite anode, 66.3Ah capacity"
        );
        assert_eq!(outcome.canonical_json, outcome.design.canonical_json());
        Ok(())
    }

    #[test]
    fn explicit_values_beat_lfp_presets() -> Result<(), DesignError> {
        let outcome = get_cell_design(
            Catalog::standard(),
            &request(
                json!({
                    "Form factor": "Pouch",
                    "Positive electrode formulation": "LFP",
                    "Negative electrode formulation": "Graphite",
                    "Upper voltage cut-off [V]": 3.6,
                }),
                None,
            ),
        )?;
        assert_eq!(outcome.dump["Upper voltage cut-off [V]"], json!(3.6));
        assert_eq!(outcome.dump["Lower voltage cut-off [V]"], json!(2.5));
        Ok(())
    }

    #[test]
    fn keys_off_the_allow_list_are_rejected() {
        for key in [
            "Cell colour",
            "Cell nominal capacity [A.h]",
            "Positive electrode formulation.Secondary binder",
            "Separator porosity",
            "Electrolyte composition",
            "Positive electrode foil density [g.cm-3]",
        ] {
            let mut parameters = json!({
                "Form factor": "Prismatic",
                "Positive electrode formulation": "NMC811",
                "Negative electrode formulation": "Graphite",
            });
            parameters[key] = json!(1.0);
            let err = get_cell_design(Catalog::standard(), &request(parameters, None)).unwrap_err();
            assert_eq!(err, DesignError::UnrecognizedParameter { key: key.into() });
        }
    }

    #[test]
    fn allow_list_covers_dotted_and_thickness_keys() {
        assert!(is_allowed("Cell thickness [mm]"));
        assert!(is_allowed("Negative electrode formulation.Secondary binder"));
        assert!(is_allowed("Cell casing material.Density [g.cm-3]"));
        assert!(is_allowed("Cell mass packing ratio"));
        assert!(!is_allowed("Negative current collector thickness [m]"));
        assert!(!is_allowed("Cell casing material.Colour"));
    }

    #[test]
    fn mass_packing_ratio_is_accepted_and_ignored() -> Result<(), DesignError> {
        let parameters = json!({
            "Form factor": "Prismatic",
            "Positive electrode formulation": "NMC811",
            "Negative electrode formulation": "Graphite",
        });
        let plain = get_cell_design(Catalog::standard(), &request(parameters.clone(), None))?;

        let mut with_ratio = parameters;
        with_ratio["Cell mass packing ratio"] = json!(0.8);
        let outcome = get_cell_design(Catalog::standard(), &request(with_ratio, None))?;
        assert_eq!(outcome.canonical_json, plain.canonical_json);
        assert!(!outcome.dump.contains_key("Cell mass packing ratio"));
        Ok(())
    }

    #[test]
    fn form_factor_and_formulations_are_required() {
        let err = get_cell_design(
            Catalog::standard(),
            &request(json!({"Positive electrode formulation": "NMC811"}), None),
        )
        .unwrap_err();
        assert_eq!(
            violation(err).message,
            "Form factor:Prismatic, Pouch, or Cylindrical must be specified in cell design parameters."
        );

        let err = get_cell_design(
            Catalog::standard(),
            &request(
                json!({"Form factor": "Cylindrical", "Positive electrode formulation": "NMC811"}),
                None,
            ),
        )
        .unwrap_err();
        assert!(violation(err).message.starts_with("Negative electrode formulation must be specified"));
    }

    #[test]
    fn unknown_form_factor_is_invalid() {
        let err = get_cell_design(
            Catalog::standard(),
            &request(
                json!({
                    "Form factor": "Coin",
                    "Positive electrode formulation": "NMC811",
                    "Negative electrode formulation": "Graphite",
                }),
                None,
            ),
        )
        .unwrap_err();
        assert_eq!(
            violation(err).message,
            "Form factor must be either 'Prismatic', 'Cylindrical', or 'Pouch'."
        );
    }

    #[test]
    fn capacity_within_tolerance_is_accepted() {
        let parameters = json!({
            "Form factor": "Prismatic",
            "Positive electrode formulation": "NMC811",
            "Negative electrode formulation": "Graphite",
        });
        // The default prismatic design holds 92.374 Ah.
        assert!(get_cell_design(Catalog::standard(), &request(parameters, Some(92.0))).is_ok());
    }

    #[test]
    fn missed_capacity_suggests_mass_loading_and_sheets() {
        let parameters = json!({
            "Form factor": "Prismatic",
            "Positive electrode formulation": "NMC811",
            "Negative electrode formulation": "Graphite",
        });
        let err =
            get_cell_design(Catalog::standard(), &request(parameters, Some(100.0))).unwrap_err();
        let message = violation(err).message;

        assert!(message.starts_with(
            "Design capacity is 92.4Ah, which is not within 1% tolerance of the target capacity of 100Ah. \
             Consider changing the positive electrode mass loading, which is 15, to 16.24 to meet the target."
        ), "{message}");
        assert!(message.ends_with(
            "Alternatively, adjust the positive electrode sheet count, which is 80, to 86 to meet the target."
        ), "{message}");
    }

    #[test]
    fn unreachable_capacity_suggests_active_fraction() {
        let parameters = json!({
            "Form factor": "Cylindrical",
            "Positive electrode formulation": "NMC811",
            "Negative electrode formulation": "Graphite",
        });
        let err =
            get_cell_design(Catalog::standard(), &request(parameters, Some(2.0))).unwrap_err();
        let message = violation(err).message;
        assert!(message.contains("to 15 and positive electrode active material mass fraction, which is 0.98, below"), "{message}");
    }
}
