//! Electrode formulations.
//!
//! An [`ElectrodeFormulation`] is the validated recipe of one electrode
//! coating: up to two active materials, binders and conductive agents with
//! their mass fractions, plus the specific capacity, nominal voltage and the
//! density of the dry mix. Formulations are built by a
//! [`FormulationRegistry`], which knows the standard named recipes and
//! resolves component materials through a [`MaterialRegistry`].
//!
//! Building a formulation runs these steps:
//!
//! 1. A partial record with no fractions for binders or conductive agents
//!    gets the remainder split between them ([`distribute`]).
//! 2. A two-material blend is checked against its stated ratio and
//!    reordered so the larger fraction is primary ([`blend`]).
//! 3. Every fraction is range-checked and the fractions must sum to one.
//! 4. A missing specific capacity or voltage is taken from the standard
//!    formulation with the same primary active material.
//! 5. Unless given, the density is derived from the component densities
//!    ([`density`]).

mod blend;
mod density;
mod distribute;
mod fields;
mod registry;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::support::{
    constraint::UnitInterval,
    materials::{MaterialError, MaterialRegistry},
};

pub use fields::FormulationFields;
pub use registry::{FormulationRegistry, Polarity};

/// Absolute tolerance on the sum of mass fractions.
const MASS_FRACTION_SUM_TOL: f64 = 1e-6;

/// Errors raised while building an electrode formulation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormulationError {
    /// A formulation was requested by a name that is not registered.
    #[error("{}", unknown_formulation_message(.name, .suggestions, .cathodes, .anodes))]
    UnknownFormulation {
        name: String,
        suggestions: Vec<String>,
        cathodes: Vec<String>,
        anodes: Vec<String>,
    },

    #[error("Electrode formulation is missing required field '{field}'")]
    MissingField { field: &'static str },

    /// The record has unrecognized keys or values of the wrong type.
    #[error("Invalid electrode formulation: {reason}")]
    Malformed { reason: String },

    #[error("Mass fractions must sum to exactly 1.0, but got {total:.6}. Breakdown: {breakdown}")]
    MassFractionSum { total: f64, breakdown: String },

    #[error("{component} mass fraction must be in {range}, but got {value}")]
    FractionOutOfRange {
        component: &'static str,
        value: f64,
        range: &'static str,
    },

    #[error("Primary and secondary active materials cannot be the same in a blend ('{material}')")]
    SameBlendMaterials { material: String },

    #[error(
        "Blend of '{primary}' and '{secondary}' must specify the secondary to primary active material mass ratio"
    )]
    MissingBlendRatio { primary: String, secondary: String },

    #[error(
        "Invalid secondary to primary active material mass ratio '{ratio}', expected 'secondary:primary' such as '5:95'"
    )]
    InvalidBlendRatio { ratio: String },

    #[error(
        "Active material mass fractions (primary {primary}, secondary {secondary}) do not match the secondary to primary ratio '{ratio}'"
    )]
    BlendRatioMismatch {
        ratio: String,
        primary: f64,
        secondary: f64,
    },

    #[error("Total component volume is zero, so the formulation density is undefined")]
    DensityUndefined,

    #[error("Electrode formulation density must be greater than 1.5 g.cm-3, but got {density:.3}")]
    DensityTooLow { density: f64 },

    /// Capacity or voltage is absent and no standard formulation supplies it.
    #[error(
        "'{field}' was not provided and no standard formulation uses primary active material '{material}'"
    )]
    NoReferenceValue {
        field: &'static str,
        material: String,
    },

    #[error(transparent)]
    Material(#[from] MaterialError),
}

fn unknown_formulation_message(
    name: &str,
    suggestions: &[String],
    cathodes: &[String],
    anodes: &[String],
) -> String {
    let mut message = format!("Unknown formulation '{name}'.");
    if !suggestions.is_empty() {
        message.push_str(&format!("\n\nDid you mean: {}?", suggestions.join(", ")));
    }
    message.push_str(&format!(
        "\n\nAvailable formulations:\nCathode materials: {}\nAnode materials: {}",
        cathodes.join(", "),
        anodes.join(", ")
    ));
    message
}

/// A validated electrode formulation.
///
/// Mass fractions of absent components are zero. Fractions always sum to
/// one within `1e-6`, and the primary active material fraction is at least
/// the secondary one.
#[derive(Debug, Clone, PartialEq)]
pub struct ElectrodeFormulation {
    name: String,
    primary_active_material: String,
    secondary_active_material: Option<String>,
    active_material_ratio: Option<String>,
    primary_binder: String,
    secondary_binder: Option<String>,
    primary_conductive_agent: Option<String>,
    secondary_conductive_agent: Option<String>,
    primary_active_material_mass_fraction: f64,
    secondary_active_material_mass_fraction: Option<f64>,
    primary_binder_mass_fraction: f64,
    secondary_binder_mass_fraction: Option<f64>,
    primary_conductive_agent_mass_fraction: Option<f64>,
    secondary_conductive_agent_mass_fraction: Option<f64>,
    specific_capacity: f64,
    density: f64,
    nominal_voltage: f64,

    /// Density of the primary active material in g/cm³.
    active_material_density: f64,
}

impl ElectrodeFormulation {
    /// Validates a complete record. Partial records go through
    /// [`FormulationRegistry::build`] instead, which fills gaps first.
    fn from_fields(
        fields: FormulationFields,
        known: &FormulationRegistry,
        materials: &MaterialRegistry,
    ) -> Result<Self, FormulationError> {
        let required = |value: Option<String>, field| value.ok_or(FormulationError::MissingField { field });
        let required_fraction =
            |value: Option<f64>, field| value.ok_or(FormulationError::MissingField { field });

        let name = required(fields.name, FormulationFields::NAME)?;
        let primary_binder = required(fields.primary_binder, FormulationFields::PRIMARY_BINDER)?;
        let mut primary_active_material = required(
            fields.primary_active_material,
            FormulationFields::PRIMARY_ACTIVE_MATERIAL,
        )?;
        let mut primary_active_material_mass_fraction = required_fraction(
            fields.primary_active_material_mass_fraction,
            FormulationFields::PRIMARY_ACTIVE_MATERIAL_MASS_FRACTION,
        )?;
        let primary_binder_mass_fraction = required_fraction(
            fields.primary_binder_mass_fraction,
            FormulationFields::PRIMARY_BINDER_MASS_FRACTION,
        )?;

        let mut secondary_active_material = fields.secondary_active_material;
        let mut secondary_active_material_mass_fraction =
            fields.secondary_active_material_mass_fraction;
        let mut active_material_ratio = fields.active_material_ratio;

        if let (Some(secondary), Some(secondary_fraction)) = (
            secondary_active_material.take(),
            secondary_active_material_mass_fraction,
        ) {
            let blend = blend::canonicalize(
                blend::Component {
                    material: primary_active_material,
                    fraction: primary_active_material_mass_fraction,
                },
                blend::Component {
                    material: secondary,
                    fraction: secondary_fraction,
                },
                active_material_ratio.as_deref(),
                materials,
            )?;
            primary_active_material = blend.primary.material;
            primary_active_material_mass_fraction = blend.primary.fraction;
            secondary_active_material = Some(blend.secondary.material);
            secondary_active_material_mass_fraction = Some(blend.secondary.fraction);
            active_material_ratio = Some(blend.ratio);
        }

        let mut formulation = Self {
            name,
            primary_active_material,
            secondary_active_material,
            active_material_ratio,
            primary_binder,
            secondary_binder: fields.secondary_binder,
            primary_conductive_agent: fields.primary_conductive_agent,
            secondary_conductive_agent: fields.secondary_conductive_agent,
            primary_active_material_mass_fraction,
            secondary_active_material_mass_fraction,
            primary_binder_mass_fraction,
            secondary_binder_mass_fraction: fields.secondary_binder_mass_fraction,
            primary_conductive_agent_mass_fraction: fields.primary_conductive_agent_mass_fraction,
            secondary_conductive_agent_mass_fraction: fields
                .secondary_conductive_agent_mass_fraction,
            specific_capacity: 0.0,
            density: 0.0,
            nominal_voltage: 0.0,
            active_material_density: 0.0,
        };

        formulation.check_fractions()?;

        let reference = || known.reference_for(&formulation.primary_active_material, materials);
        formulation.specific_capacity = match fields.specific_capacity {
            Some(capacity) => capacity,
            None => reference()
                .and_then(|r| r.specific_capacity)
                .ok_or_else(|| FormulationError::NoReferenceValue {
                    field: FormulationFields::SPECIFIC_CAPACITY,
                    material: formulation.primary_active_material.clone(),
                })?,
        };
        formulation.nominal_voltage = match fields.nominal_voltage {
            Some(voltage) => voltage,
            None => reference()
                .and_then(|r| r.nominal_voltage)
                .ok_or_else(|| FormulationError::NoReferenceValue {
                    field: FormulationFields::NOMINAL_VOLTAGE,
                    material: formulation.primary_active_material.clone(),
                })?,
        };

        formulation.density = match fields.density {
            Some(supplied) => density::checked(supplied)?,
            None => density::formulation_density(&formulation, materials)?,
        };
        formulation.active_material_density = materials
            .material(&formulation.primary_active_material)?
            .density_g_cm3();

        Ok(formulation)
    }

    fn check_fractions(&self) -> Result<(), FormulationError> {
        let primary = self.primary_active_material_mass_fraction;
        if !(primary > 0.0 && primary <= 1.0) {
            return Err(FormulationError::FractionOutOfRange {
                component: "Primary active material",
                value: primary,
                range: "(0, 1]",
            });
        }
        for (component, value) in self.labelled_fractions().into_iter().skip(1) {
            if UnitInterval::new(value).is_err() {
                return Err(FormulationError::FractionOutOfRange {
                    component,
                    value,
                    range: "[0, 1]",
                });
            }
        }

        let total = self.sum_of_mass_fractions();
        if (total - 1.0).abs() > MASS_FRACTION_SUM_TOL {
            let breakdown = self
                .labelled_fractions()
                .into_iter()
                .filter(|(_, fraction)| *fraction > 0.0)
                .map(|(label, fraction)| format!("{label}: {fraction:.6}"))
                .collect::<Vec<_>>()
                .join(", ");
            return Err(FormulationError::MassFractionSum { total, breakdown });
        }
        Ok(())
    }

    /// Every component mass fraction, absent ones as zero, primary active first.
    #[must_use]
    pub fn labelled_fractions(&self) -> [(&'static str, f64); 6] {
        [
            (
                "Primary active material",
                self.primary_active_material_mass_fraction,
            ),
            (
                "Secondary active material",
                self.secondary_active_material_mass_fraction.unwrap_or(0.0),
            ),
            ("Primary binder", self.primary_binder_mass_fraction),
            (
                "Secondary binder",
                self.secondary_binder_mass_fraction.unwrap_or(0.0),
            ),
            (
                "Primary conductive agent",
                self.primary_conductive_agent_mass_fraction.unwrap_or(0.0),
            ),
            (
                "Secondary conductive agent",
                self.secondary_conductive_agent_mass_fraction.unwrap_or(0.0),
            ),
        ]
    }

    #[must_use]
    pub fn sum_of_mass_fractions(&self) -> f64 {
        self.labelled_fractions().iter().map(|(_, f)| f).sum()
    }

    /// Returns `true` if the name mentions the active material, ignoring case.
    ///
    /// Material names like `Si+C` are split on `+` and each part is checked,
    /// and a blend is accepted under either of its components.
    #[must_use]
    pub fn name_mentions_active_material(&self) -> bool {
        let name = self.name.to_lowercase();
        std::iter::once(self.primary_active_material.as_str())
            .chain(self.secondary_active_material.as_deref())
            .flat_map(|material| material.split('+'))
            .map(|part| part.trim().to_lowercase())
            .filter(|part| !part.is_empty())
            .any(|part| name.contains(&part))
    }

    /// Returns the record form, with every field present that this
    /// formulation defines.
    #[must_use]
    pub fn to_fields(&self) -> FormulationFields {
        FormulationFields {
            name: Some(self.name.clone()),
            primary_active_material: Some(self.primary_active_material.clone()),
            secondary_active_material: self.secondary_active_material.clone(),
            active_material_ratio: self.active_material_ratio.clone(),
            primary_binder: Some(self.primary_binder.clone()),
            secondary_binder: self.secondary_binder.clone(),
            primary_conductive_agent: self.primary_conductive_agent.clone(),
            secondary_conductive_agent: self.secondary_conductive_agent.clone(),
            primary_active_material_mass_fraction: Some(self.primary_active_material_mass_fraction),
            secondary_active_material_mass_fraction: self.secondary_active_material_mass_fraction,
            primary_binder_mass_fraction: Some(self.primary_binder_mass_fraction),
            secondary_binder_mass_fraction: self.secondary_binder_mass_fraction,
            primary_conductive_agent_mass_fraction: self.primary_conductive_agent_mass_fraction,
            secondary_conductive_agent_mass_fraction: self.secondary_conductive_agent_mass_fraction,
            specific_capacity: Some(self.specific_capacity),
            density: Some(self.density),
            nominal_voltage: Some(self.nominal_voltage),
        }
    }

    /// Alias-keyed map of every field, `Null` where absent.
    #[must_use]
    pub fn to_alias_map(&self) -> Map<String, Value> {
        self.to_fields().to_map()
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn primary_active_material(&self) -> &str {
        &self.primary_active_material
    }

    #[must_use]
    pub fn secondary_active_material(&self) -> Option<&str> {
        self.secondary_active_material.as_deref()
    }

    /// Canonical `"secondary:primary"` ratio of a blend.
    #[must_use]
    pub fn active_material_ratio(&self) -> Option<&str> {
        self.active_material_ratio.as_deref()
    }

    #[must_use]
    pub fn primary_binder(&self) -> &str {
        &self.primary_binder
    }

    #[must_use]
    pub fn primary_conductive_agent(&self) -> Option<&str> {
        self.primary_conductive_agent.as_deref()
    }

    #[must_use]
    pub fn primary_active_material_mass_fraction(&self) -> f64 {
        self.primary_active_material_mass_fraction
    }

    #[must_use]
    pub fn secondary_active_material_mass_fraction(&self) -> f64 {
        self.secondary_active_material_mass_fraction.unwrap_or(0.0)
    }

    /// Mass fraction of all active material, primary and secondary.
    #[must_use]
    pub fn active_material_mass_fraction(&self) -> f64 {
        self.primary_active_material_mass_fraction + self.secondary_active_material_mass_fraction()
    }

    /// Specific capacity in mAh/g of coating.
    #[must_use]
    pub fn specific_capacity_mah_g(&self) -> f64 {
        self.specific_capacity
    }

    /// Density of the dry coating mix in g/cm³.
    #[must_use]
    pub fn density_g_cm3(&self) -> f64 {
        self.density
    }

    /// Density of the primary active material in g/cm³.
    #[must_use]
    pub fn active_material_density_g_cm3(&self) -> f64 {
        self.active_material_density
    }

    #[must_use]
    pub fn nominal_voltage_v(&self) -> f64 {
        self.nominal_voltage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use serde_json::json;

    fn build(value: Value) -> Result<ElectrodeFormulation, FormulationError> {
        FormulationRegistry::standard().build(&value, &MaterialRegistry::standard())
    }

    #[test]
    fn standard_cathode() -> Result<(), FormulationError> {
        let nmc = build(json!("NMC811"))?;
        assert_eq!(nmc.primary_binder(), "PVDF");
        assert_eq!(nmc.specific_capacity_mah_g(), 200.0);
        assert_eq!(nmc.nominal_voltage_v(), 3.77);
        assert_relative_eq!(nmc.density_g_cm3(), 4.666);
        assert_relative_eq!(nmc.active_material_density_g_cm3(), 4.8);
        assert_relative_eq!(nmc.sum_of_mass_fractions(), 1.0);
        Ok(())
    }

    #[test]
    fn graphite_has_no_conductive_agent() -> Result<(), FormulationError> {
        let graphite = build(json!("Graphite"))?;
        assert_eq!(graphite.primary_conductive_agent(), None);
        assert_relative_eq!(graphite.density_g_cm3(), 2.22);
        let map = graphite.to_alias_map();
        assert_eq!(map["Primary conductive agent"], Value::Null);
        assert_eq!(map["Secondary binder"], json!("SBR"));
        Ok(())
    }

    #[test]
    fn fractions_must_sum_to_one() {
        let err = build(json!({
            "Name": "Custom",
            "Primary active material": "NMC811",
            "Primary binder": "PVDF",
            "Primary conductive agent": "Carbon",
            "Primary active material mass fraction": 0.9,
            "Primary binder mass fraction": 0.05,
            "Primary conductive agent mass fraction": 0.03,
            "Electrode specific capacity [mAh.g-1]": 190.0,
            "Electrode nominal voltage [V]": 3.7,
        }))
        .unwrap_err();
        let FormulationError::MassFractionSum { total, breakdown } = &err else {
            panic!("expected a mass fraction sum error, got {err}");
        };
        assert_relative_eq!(*total, 0.98, epsilon = 1e-12);
        assert_eq!(
            breakdown,
            "Primary active material: 0.900000, Primary binder: 0.050000, Primary conductive agent: 0.030000"
        );
        assert!(err.to_string().starts_with("Mass fractions must sum to exactly 1.0, but got 0.980000"));
    }

    #[test]
    fn active_fraction_must_be_positive() {
        let err = build(json!({
            "Name": "Empty",
            "Primary active material": "NMC811",
            "Primary binder": "PVDF",
            "Primary active material mass fraction": 0.0,
            "Primary binder mass fraction": 1.0,
        }))
        .unwrap_err();
        assert!(matches!(
            err,
            FormulationError::FractionOutOfRange { component: "Primary active material", .. }
        ));
    }

    #[test]
    fn missing_capacity_comes_from_matching_standard() -> Result<(), FormulationError> {
        let custom = build(json!({
            "Name": "LFP high binder",
            "Primary active material": "LiFePO4",
            "Primary binder": "PVDF",
            "Primary conductive agent": "Carbon",
            "Primary active material mass fraction": 0.9,
            "Primary binder mass fraction": 0.05,
            "Primary conductive agent mass fraction": 0.05,
        }))?;
        assert_eq!(custom.specific_capacity_mah_g(), 160.0);
        assert_eq!(custom.nominal_voltage_v(), 3.4);
        Ok(())
    }

    #[test]
    fn missing_capacity_without_reference_fails() {
        let err = build(json!({
            "Name": "Sodium",
            "Primary active material": "NaCrO2",
            "Primary binder": "PVDF",
            "Primary active material mass fraction": 0.95,
            "Primary binder mass fraction": 0.05,
        }))
        .unwrap_err();
        assert!(matches!(err, FormulationError::NoReferenceValue { .. }));
    }

    #[test]
    fn low_density_is_rejected() {
        let err = build(json!({
            "Name": "Foam",
            "Primary active material": "Hard Carbon",
            "Primary binder": "SBR",
            "Primary active material mass fraction": 0.5,
            "Primary binder mass fraction": 0.5,
            "Electrode specific capacity [mAh.g-1]": 300.0,
            "Electrode nominal voltage [V]": 0.2,
        }))
        .unwrap_err();
        assert!(matches!(err, FormulationError::DensityTooLow { .. }));
    }

    #[test]
    fn supplied_density_is_kept() -> Result<(), FormulationError> {
        let nmc = build(json!({"Name": "NMC811", "Electrode formulation density [g.cm-3]": 4.5}))?;
        assert_eq!(nmc.density_g_cm3(), 4.5);
        assert!(matches!(
            build(json!({"Name": "NMC811", "Electrode formulation density [g.cm-3]": 1.2})),
            Err(FormulationError::DensityTooLow { .. })
        ));
        Ok(())
    }

    #[test]
    fn name_consistency() -> Result<(), FormulationError> {
        assert!(build(json!("NMC811"))?.name_mentions_active_material());
        assert!(build(json!("Si10%+Graphite90%"))?.name_mentions_active_material());
        assert!(build(json!({"Name": "nmc811 thick", "Primary active material": "NMC811"}))?
            .name_mentions_active_material());
        let renamed = build(json!({"Name": "NMC811", "Primary active material": "LCO"}))?;
        assert!(!renamed.name_mentions_active_material());
        Ok(())
    }
}
