use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::FormulationError;

/// An alias-keyed, possibly partial electrode formulation record.
///
/// This is the shape formulations take at the edges of the engine: in
/// override maps, in the standard formulation table, and in the dump of a
/// finished design. Every field is optional here; the required ones are
/// enforced when an [`ElectrodeFormulation`](super::ElectrodeFormulation)
/// is built from it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormulationFields {
    #[serde(rename = "Name")]
    pub name: Option<String>,

    #[serde(rename = "Primary active material")]
    pub primary_active_material: Option<String>,

    #[serde(rename = "Secondary active material")]
    pub secondary_active_material: Option<String>,

    /// Written `"secondary:primary"`, e.g. `"5:95"`.
    #[serde(rename = "Secondary to primary active material mass ratio")]
    pub active_material_ratio: Option<String>,

    #[serde(rename = "Primary binder")]
    pub primary_binder: Option<String>,

    #[serde(rename = "Secondary binder")]
    pub secondary_binder: Option<String>,

    #[serde(rename = "Primary conductive agent")]
    pub primary_conductive_agent: Option<String>,

    #[serde(rename = "Secondary conductive agent")]
    pub secondary_conductive_agent: Option<String>,

    #[serde(rename = "Primary active material mass fraction")]
    pub primary_active_material_mass_fraction: Option<f64>,

    #[serde(rename = "Secondary active material mass fraction")]
    pub secondary_active_material_mass_fraction: Option<f64>,

    #[serde(rename = "Primary binder mass fraction")]
    pub primary_binder_mass_fraction: Option<f64>,

    #[serde(rename = "Secondary binder mass fraction")]
    pub secondary_binder_mass_fraction: Option<f64>,

    #[serde(rename = "Primary conductive agent mass fraction")]
    pub primary_conductive_agent_mass_fraction: Option<f64>,

    #[serde(rename = "Secondary conductive agent mass fraction")]
    pub secondary_conductive_agent_mass_fraction: Option<f64>,

    #[serde(rename = "Electrode specific capacity [mAh.g-1]")]
    pub specific_capacity: Option<f64>,

    #[serde(rename = "Electrode formulation density [g.cm-3]")]
    pub density: Option<f64>,

    #[serde(rename = "Electrode nominal voltage [V]")]
    pub nominal_voltage: Option<f64>,
}

impl FormulationFields {
    pub const NAME: &'static str = "Name";
    pub const PRIMARY_ACTIVE_MATERIAL: &'static str = "Primary active material";
    pub const PRIMARY_BINDER: &'static str = "Primary binder";
    pub const PRIMARY_ACTIVE_MATERIAL_MASS_FRACTION: &'static str =
        "Primary active material mass fraction";
    pub const PRIMARY_BINDER_MASS_FRACTION: &'static str = "Primary binder mass fraction";
    pub const SPECIFIC_CAPACITY: &'static str = "Electrode specific capacity [mAh.g-1]";
    pub const DENSITY: &'static str = "Electrode formulation density [g.cm-3]";
    pub const NOMINAL_VOLTAGE: &'static str = "Electrode nominal voltage [V]";

    /// Keys that change the composition, and therefore the derived density.
    pub const COMPOSITION_KEYS: [&'static str; 14] = [
        "Primary active material",
        "Secondary active material",
        "Secondary to primary active material mass ratio",
        "Primary binder",
        "Secondary binder",
        "Primary conductive agent",
        "Secondary conductive agent",
        "Primary active material mass fraction",
        "Secondary active material mass fraction",
        "Primary binder mass fraction",
        "Secondary binder mass fraction",
        "Primary conductive agent mass fraction",
        "Secondary conductive agent mass fraction",
        "Name",
    ];

    /// Parses an alias-keyed map. `Null` values are treated as absent.
    ///
    /// # Errors
    ///
    /// Returns [`FormulationError::Malformed`] for unrecognized keys or values
    /// of the wrong type.
    pub fn from_map(map: &Map<String, Value>) -> Result<Self, FormulationError> {
        let present: Map<String, Value> = map
            .iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        serde_json::from_value(Value::Object(present)).map_err(|e| FormulationError::Malformed {
            reason: e.to_string(),
        })
    }

    /// Returns the alias-keyed map, with `Null` for absent fields.
    #[must_use]
    pub fn to_map(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }

    /// Returns `self` with every field present in `other` replaced.
    #[must_use]
    pub fn overlay(self, other: Self) -> Self {
        Self {
            name: other.name.or(self.name),
            primary_active_material: other.primary_active_material.or(self.primary_active_material),
            secondary_active_material: other
                .secondary_active_material
                .or(self.secondary_active_material),
            active_material_ratio: other.active_material_ratio.or(self.active_material_ratio),
            primary_binder: other.primary_binder.or(self.primary_binder),
            secondary_binder: other.secondary_binder.or(self.secondary_binder),
            primary_conductive_agent: other
                .primary_conductive_agent
                .or(self.primary_conductive_agent),
            secondary_conductive_agent: other
                .secondary_conductive_agent
                .or(self.secondary_conductive_agent),
            primary_active_material_mass_fraction: other
                .primary_active_material_mass_fraction
                .or(self.primary_active_material_mass_fraction),
            secondary_active_material_mass_fraction: other
                .secondary_active_material_mass_fraction
                .or(self.secondary_active_material_mass_fraction),
            primary_binder_mass_fraction: other
                .primary_binder_mass_fraction
                .or(self.primary_binder_mass_fraction),
            secondary_binder_mass_fraction: other
                .secondary_binder_mass_fraction
                .or(self.secondary_binder_mass_fraction),
            primary_conductive_agent_mass_fraction: other
                .primary_conductive_agent_mass_fraction
                .or(self.primary_conductive_agent_mass_fraction),
            secondary_conductive_agent_mass_fraction: other
                .secondary_conductive_agent_mass_fraction
                .or(self.secondary_conductive_agent_mass_fraction),
            specific_capacity: other.specific_capacity.or(self.specific_capacity),
            density: other.density.or(self.density),
            nominal_voltage: other.nominal_voltage.or(self.nominal_voltage),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn nulls_are_absent() {
        let map = json!({"Name": "LFP", "Secondary binder": null});
        let fields = FormulationFields::from_map(map.as_object().unwrap()).unwrap();
        assert_eq!(fields.name.as_deref(), Some("LFP"));
        assert_eq!(fields.secondary_binder, None);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let map = json!({"Name": "LFP", "Binder": "PVDF"});
        let err = FormulationFields::from_map(map.as_object().unwrap()).unwrap_err();
        assert!(matches!(err, FormulationError::Malformed { .. }));
    }

    #[test]
    fn dump_lists_every_alias() {
        let map = FormulationFields::default().to_map();
        assert_eq!(map.len(), 17);
        assert!(map.values().all(Value::is_null));
        assert!(map.contains_key(FormulationFields::DENSITY));
    }

    #[test]
    fn overlay_prefers_present_fields() {
        let base = FormulationFields {
            name: Some("NMC811".into()),
            primary_binder: Some("PVDF".into()),
            ..FormulationFields::default()
        };
        let patch = FormulationFields {
            primary_binder: Some("CMC".into()),
            ..FormulationFields::default()
        };
        let merged = base.overlay(patch);
        assert_eq!(merged.name.as_deref(), Some("NMC811"));
        assert_eq!(merged.primary_binder.as_deref(), Some("CMC"));
    }
}
