//! Applying alias-keyed overrides to a default design.
//!
//! Overrides may address a sub-field of a nested record with a dotted key,
//! e.g. `Positive electrode formulation.Primary binder`. Dotted keys are
//! folded into their record before anything else happens. A key is only
//! dotted if the part before the first `.` is a nested record alias, so
//! unit labels like `[mg.cm-2]` are left alone.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::support::{
    catalog::Catalog,
    electrolyte::ElectrolyteComposition,
    formulation::{ElectrodeFormulation, FormulationFields},
    materials::Material,
};

use super::{CellDesign, DesignError, Field, FieldKind, FormFactor, Geometry, Side, Violation};

/// Alias-keyed design overrides.
pub type Overrides = Map<String, Value>;

/// Fields holding records that dotted keys may reach into, with the key
/// that names the record.
const NESTED: [(Field, &str); 4] = [
    (Field::PositiveFormulation, FormulationFields::NAME),
    (Field::NegativeFormulation, FormulationFields::NAME),
    (Field::CasingMaterial, "Name"),
    (Field::ElectrolyteComposition, "name"),
];

fn name_key(field: Field) -> Option<&'static str> {
    NESTED
        .iter()
        .find(|(nested, _)| *nested == field)
        .map(|(_, key)| *key)
}

fn split_dotted(key: &str) -> Option<(Field, &str)> {
    let (base, sub) = key.split_once('.')?;
    if base.contains('[') {
        return None;
    }
    let field = Field::from_alias(base)?;
    name_key(field).map(|_| (field, sub))
}

/// Folds dotted keys into their nested records.
///
/// A record given by name becomes `{name: ..}` so the dotted values overlay
/// it. When a dotted key changes a formulation's composition but not its
/// density, the density is cleared so it is derived again.
#[must_use]
pub fn expand_dotted(overrides: &Overrides) -> Overrides {
    let mut expanded = Map::new();
    let mut dotted = Vec::new();
    for (key, value) in overrides {
        match split_dotted(key) {
            Some((field, sub)) => dotted.push((field, sub, value)),
            None => {
                expanded.insert(key.clone(), value.clone());
            }
        }
    }

    for &(field, sub, value) in &dotted {
        let Some(name_key) = name_key(field) else {
            continue;
        };
        let entry = expanded
            .entry(field.alias())
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::String(name) = entry {
            let mut record = Map::new();
            record.insert(name_key.to_string(), Value::String(name.clone()));
            *entry = Value::Object(record);
        } else if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        if let Value::Object(record) = entry {
            record.insert(sub.to_string(), value.clone());
        }
    }

    for field in [Field::PositiveFormulation, Field::NegativeFormulation] {
        let subs: Vec<&str> = dotted
            .iter()
            .filter(|(f, ..)| *f == field)
            .map(|(_, sub, _)| *sub)
            .collect();
        let recomposed = subs
            .iter()
            .any(|sub| FormulationFields::COMPOSITION_KEYS.iter().any(|key| key == sub));
        if recomposed && !subs.contains(&FormulationFields::DENSITY) {
            if let Some(Value::Object(record)) = expanded.get_mut(field.alias()) {
                record.insert(FormulationFields::DENSITY.to_string(), Value::Null);
            }
        }
    }

    expanded
}

/// Reads the form factor, defaulting to prismatic when absent.
///
/// # Errors
///
/// Returns [`DesignError::InvalidDesign`] for anything but one of the three
/// names.
pub fn form_factor(overrides: &Overrides) -> Result<FormFactor, DesignError> {
    let alias = Field::FormFactor.alias();
    match overrides.get(alias) {
        None | Some(Value::Null) => Ok(FormFactor::default()),
        Some(Value::String(name)) => name
            .parse()
            .map_err(|err: super::UnknownFormFactor| Violation::new(alias, err.to_string()).into()),
        Some(other) => Err(Violation::new(
            alias,
            format!("Form factor must be either 'Prismatic', 'Cylindrical', or 'Pouch', got {other}"),
        )
        .into()),
    }
}

/// Builds a design from the form factor's defaults and the overrides,
/// without checking any design rule.
///
/// Derived aliases are accepted and ignored, so a dump can be fed back.
/// Aliases that do not apply to the form factor are ignored with a warning,
/// and `Null` values leave the default in place.
///
/// # Errors
///
/// Returns [`DesignError::UnrecognizedParameter`] for unknown keys, and
/// otherwise whatever building a formulation, material or electrolyte
/// raises.
pub fn assemble(catalog: &Catalog, overrides: &Overrides) -> Result<CellDesign, DesignError> {
    let overrides = expand_dotted(overrides);
    let form_factor = form_factor(&overrides)?;
    debug!(%form_factor, overrides = overrides.len(), "assembling cell design");

    let mut design = CellDesign::defaults(form_factor, catalog)?;
    for (key, value) in &overrides {
        let field = Field::from_alias(key)
            .ok_or_else(|| DesignError::UnrecognizedParameter { key: key.clone() })?;
        if field == Field::FormFactor || value.is_null() {
            continue;
        }
        if field.kind() == FieldKind::Derived {
            debug!(alias = key.as_str(), "ignoring derived field");
            continue;
        }
        if !field.applies_to(form_factor) {
            warn!(alias = key.as_str(), %form_factor, "ignoring field that does not apply");
            continue;
        }
        apply(&mut design, field, value, catalog)?;
    }
    Ok(design)
}

fn apply(
    design: &mut CellDesign,
    field: Field,
    value: &Value,
    catalog: &Catalog,
) -> Result<(), DesignError> {
    match field {
        Field::CellHeight => design.height = number(field, value)?,
        Field::CellWidth => {
            if let Geometry::Prismatic { width } | Geometry::Pouch { width } = &mut design.geometry {
                *width = number(field, value)?;
            }
        }
        Field::CellDiameter
        | Field::CoolingArc
        | Field::CoolingChannelHeight
        | Field::JellyRollInnerDiameter => {
            if let Geometry::Cylindrical {
                diameter,
                cooling_arc,
                cooling_channel_height,
                jelly_roll_inner_diameter,
            } = &mut design.geometry
            {
                let slot = match field {
                    Field::CellDiameter => diameter,
                    Field::CoolingArc => cooling_arc,
                    Field::CoolingChannelHeight => cooling_channel_height,
                    _ => jelly_roll_inner_diameter,
                };
                *slot = number(field, value)?;
            }
        }
        Field::VolumePackingRatio => design.volume_packing_ratio = number(field, value)?,
        Field::CasingThickness => design.casing_thickness = number(field, value)?,
        Field::CasingMaterial => {
            design.casing_material = casing_material(catalog, &design.casing_material, value)?;
        }
        Field::ThermalResistance => design.thermal_resistance = number(field, value)?,
        Field::ElectrodeOverhang => design.electrode_overhang = number(field, value)?,
        Field::UpperVoltageCutoff => design.upper_voltage_cutoff = number(field, value)?,
        Field::LowerVoltageCutoff => design.lower_voltage_cutoff = number(field, value)?,
        Field::JellyRollCount => design.jelly_roll_count = count(field, value)?,
        Field::PositiveSheetCount => design.positive_sheet_count = count(field, value)?,
        Field::NegativeCurrentCollectorThickness => {
            design.negative_current_collector_thickness = number(field, value)?;
        }
        Field::PositiveFormulation | Field::NegativeFormulation => {
            let side = if field == Field::PositiveFormulation {
                Side::Positive
            } else {
                Side::Negative
            };
            let electrode = design.electrode_mut(side);
            electrode.formulation = formulation(catalog, &electrode.formulation, value)?;
        }
        Field::PositiveMassLoading => design.positive.mass_loading = number(field, value)?,
        Field::PositiveCoatingThickness => {
            design.positive.coating_thickness = number(field, value)?;
        }
        Field::PositiveFoilThickness => design.positive.foil_thickness = number(field, value)?,
        Field::PositiveFoilDensity => design.positive.foil_density = number(field, value)?,
        Field::NegativeMassLoading => design.negative.mass_loading = number(field, value)?,
        Field::NegativeCoatingThickness => {
            design.negative.coating_thickness = number(field, value)?;
        }
        Field::NegativeFoilThickness => design.negative.foil_thickness = number(field, value)?,
        Field::NegativeFoilDensity => design.negative.foil_density = number(field, value)?,
        Field::SeparatorComposition => design.separator.composition = text(field, value)?,
        Field::SeparatorThickness => design.separator.thickness = number(field, value)?,
        Field::SeparatorArealDensity => design.separator.areal_density = number(field, value)?,
        Field::SeparatorPorosity => design.separator.porosity = number(field, value)?,
        Field::ElectrolyteComposition => {
            design.electrolyte = ElectrolyteComposition::from_value(value)?;
        }
        // The form factor picks the defaults and derived fields are computed.
        _ => {}
    }
    Ok(())
}

/// A record without a name overlays the current formulation. Changing its
/// composition without giving a density clears the density.
fn formulation(
    catalog: &Catalog,
    current: &ElectrodeFormulation,
    value: &Value,
) -> Result<ElectrodeFormulation, DesignError> {
    let Value::Object(record) = value else {
        return Ok(catalog.formulation(value)?);
    };
    if record
        .get(FormulationFields::NAME)
        .is_some_and(|name| !name.is_null())
    {
        return Ok(catalog.formulation(value)?);
    }

    let partial = FormulationFields::from_map(record)?;
    let recomposed = FormulationFields::COMPOSITION_KEYS
        .iter()
        .any(|key| record.get(*key).is_some_and(|v| !v.is_null()));
    let density_given = partial.density.is_some();

    let mut merged = current.to_fields().overlay(partial);
    if recomposed && !density_given {
        merged.density = None;
    }
    Ok(catalog.formulation(&Value::Object(merged.to_map()))?)
}

/// A property record without a name overlays the current casing material.
fn casing_material(
    catalog: &Catalog,
    current: &Material,
    value: &Value,
) -> Result<Material, DesignError> {
    match value {
        Value::Object(record) if !record.get("Name").is_some_and(|name| !name.is_null()) => {
            let mut record = record.clone();
            record.insert("Name".into(), Value::from(current.name()));
            Ok(catalog.material(&Value::Object(record))?)
        }
        _ => Ok(catalog.material(value)?),
    }
}

fn number(field: Field, value: &Value) -> Result<f64, Violation> {
    value.as_f64().filter(|v| v.is_finite()).ok_or_else(|| {
        Violation::new(
            field.alias(),
            format!("{} must be a number, got {value}", field.alias()),
        )
    })
}

/// Integral JSON numbers only; `80.0` is accepted, `80.5` and `"80"` are not.
fn count(field: Field, value: &Value) -> Result<u32, Violation> {
    let whole = match value.as_u64() {
        Some(n) => u32::try_from(n).ok(),
        None => value
            .as_f64()
            .filter(|v| v.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(v))
            // Checked integral and in range above.
            .map(|v| {
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let n = v as u32;
                n
            }),
    };
    whole.ok_or_else(|| {
        Violation::new(
            field.alias(),
            format!("{} must be a whole number, got {value}", field.alias()),
        )
    })
}

fn text(field: Field, value: &Value) -> Result<String, Violation> {
    value.as_str().map(String::from).ok_or_else(|| {
        Violation::new(
            field.alias(),
            format!("{} must be a string, got {value}", field.alias()),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use serde_json::json;

    use crate::models::battery::cell_design::core::test_support::overrides;

    fn catalog() -> &'static Catalog {
        Catalog::standard()
    }

    #[test]
    fn dotted_keys_fold_into_named_record() {
        let expanded = expand_dotted(&overrides(json!({
            "Positive electrode formulation": "LFP",
            "Positive electrode formulation.Primary binder mass fraction": 0.04,
            "Positive electrode mass loading [mg.cm-2]": 18.0,
        })));
        assert_eq!(
            expanded["Positive electrode formulation"],
            json!({
                "Name": "LFP",
                "Primary binder mass fraction": 0.04,
                "Electrode formulation density [g.cm-3]": null,
            })
        );
        assert_eq!(expanded["Positive electrode mass loading [mg.cm-2]"], json!(18.0));
    }

    #[test]
    fn dotted_density_is_kept() {
        let expanded = expand_dotted(&overrides(json!({
            "Negative electrode formulation.Primary binder": "PVDF",
            "Negative electrode formulation.Electrode formulation density [g.cm-3]": 2.1,
        })));
        assert_eq!(
            expanded["Negative electrode formulation"]["Electrode formulation density [g.cm-3]"],
            json!(2.1)
        );
    }

    #[test]
    fn unit_labels_are_not_dotted() {
        assert_eq!(split_dotted("Cell nominal capacity [A.h]"), None);
        assert_eq!(split_dotted("Cell height.mm"), None);
        assert_eq!(
            split_dotted("Cell casing material.Density [g.cm-3]"),
            Some((Field::CasingMaterial, "Density [g.cm-3]"))
        );
    }

    #[test]
    fn form_factor_defaults_to_prismatic() -> Result<(), DesignError> {
        assert_eq!(form_factor(&Overrides::new())?, FormFactor::Prismatic);
        assert_eq!(
            form_factor(&overrides(json!({"Form factor": "pouch"})))?,
            FormFactor::Pouch
        );
        assert!(matches!(
            form_factor(&overrides(json!({"Form factor": "Coin"}))),
            Err(DesignError::InvalidDesign(_))
        ));
        Ok(())
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = assemble(catalog(), &overrides(json!({"Cell hieght [mm]": 90.0}))).unwrap_err();
        assert_eq!(
            err,
            DesignError::UnrecognizedParameter {
                key: "Cell hieght [mm]".into()
            }
        );
    }

    #[test]
    fn derived_and_foreign_fields_are_ignored() -> Result<(), DesignError> {
        let design = assemble(
            catalog(),
            &overrides(json!({
                "Form factor": "Cylindrical",
                "Cell width [mm]": 300.0,
                "Cell nominal capacity [A.h]": 1000.0,
                "Cell diameter [mm]": 18.0,
            })),
        )?;
        assert_relative_eq!(design.width(), 18.0);
        assert!(design.nominal_capacity() < 1000.0);
        Ok(())
    }

    #[test]
    fn counts_must_be_whole() -> Result<(), DesignError> {
        let design = assemble(
            catalog(),
            &overrides(json!({"Positive electrode sheet count": 60.0})),
        )?;
        assert_eq!(design.positive_sheet_count(), 60);
        assert!(matches!(
            assemble(catalog(), &overrides(json!({"Positive electrode sheet count": 60.5}))),
            Err(DesignError::InvalidDesign(_))
        ));
        Ok(())
    }

    #[test]
    fn nameless_formulation_overlays_current() -> Result<(), DesignError> {
        let design = assemble(
            catalog(),
            &overrides(json!({
                "Positive electrode formulation.Primary active material mass fraction": 0.96,
                "Positive electrode formulation.Primary binder mass fraction": 0.02,
                "Positive electrode formulation.Primary conductive agent mass fraction": 0.02,
            })),
        )?;
        let formulation = &design.positive().formulation;
        assert_eq!(formulation.name(), "NMC811");
        assert_relative_eq!(formulation.primary_active_material_mass_fraction(), 0.96);
        assert!(formulation.density_g_cm3() < 4.666);
        Ok(())
    }

    #[test]
    fn casing_properties_overlay_default_material() -> Result<(), DesignError> {
        let design = assemble(
            catalog(),
            &overrides(json!({"Cell casing material.Density [g.cm-3]": 2.8})),
        )?;
        assert_eq!(design.casing_material().name(), "Aluminum");
        assert_relative_eq!(design.casing_material().density_g_cm3(), 2.8);
        Ok(())
    }

    #[test]
    fn unknown_formulation_material_is_unknown_material() {
        let err = assemble(
            catalog(),
            &overrides(json!({
                "Positive electrode formulation": {
                    "Name": "Mystery",
                    "Primary active material": "Unobtainium",
                    "Primary binder": "PVDF",
                    "Primary active material mass fraction": 0.95,
                    "Primary binder mass fraction": 0.05,
                    "Electrode specific capacity [mAh.g-1]": 150.0,
                    "Electrode nominal voltage [V]": 3.5,
                }
            })),
        )
        .unwrap_err();
        assert!(matches!(err, DesignError::UnknownMaterial(_)));
    }
}
