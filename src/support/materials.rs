//! Material properties and alias resolution.
//!
//! A [`MaterialRegistry`] holds an immutable table of [`Material`]s together
//! with an index of synonyms, acronyms and trade names. Build one with
//! [`MaterialRegistry::standard`] (or [`MaterialRegistry::new`] for a reduced
//! table in tests) and pass it to whatever needs to resolve material names.
//!
//! ```
//! use twine_cell_design::support::materials::MaterialRegistry;
//!
//! let registry = MaterialRegistry::standard();
//! assert_eq!(registry.resolve("Cu foil").unwrap(), "Copper");
//! assert_eq!(registry.material("Kynar").unwrap().density_g_cm3(), 1.78);
//! ```

mod catalog;
mod registry;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use uom::si::{
    f64::{MassDensity, SpecificHeatCapacity, ThermalConductivity},
    mass_density::gram_per_cubic_centimeter,
    specific_heat_capacity::kilojoule_per_kilogram_kelvin,
    thermal_conductivity::watt_per_meter_kelvin,
};

use crate::support::constraint::{NonNegative, StrictlyPositive};

pub use registry::MaterialRegistry;

/// Errors raised while resolving or building a material.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MaterialError {
    /// No canonical name or alias matches the query.
    #[error("Unknown material '{query}'. Known materials: {known}.")]
    Unknown { query: String, known: String },

    /// A custom material is missing properties or has non-physical ones.
    #[error("Material '{name}' is not valid: {reason}")]
    InvalidProperties { name: String, reason: String },
}

/// Physical properties of a named material.
///
/// Values are stored in the units of their aliases and exposed as [`uom`]
/// quantities through the typed accessors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Material {
    #[serde(rename = "Name")]
    name: String,

    #[serde(rename = "Density [g.cm-3]")]
    density: f64,

    #[serde(rename = "Electrical conductivity [S.m-1]")]
    electrical_conductivity: f64,

    #[serde(rename = "Thermal conductivity [W.m-1.K-1]")]
    thermal_conductivity: f64,

    #[serde(rename = "Specific heat [J.g-1.K-1]")]
    specific_heat: f64,
}

impl Material {
    /// Creates a material from its properties.
    ///
    /// # Errors
    ///
    /// Returns [`MaterialError::InvalidProperties`] if the density is not
    /// strictly positive or any other property is negative.
    pub fn new(
        name: impl Into<String>,
        density: f64,
        electrical_conductivity: f64,
        thermal_conductivity: f64,
        specific_heat: f64,
    ) -> Result<Self, MaterialError> {
        let material = Self {
            name: name.into(),
            density,
            electrical_conductivity,
            thermal_conductivity,
            specific_heat,
        };
        material.validated()
    }

    fn validated(self) -> Result<Self, MaterialError> {
        let invalid = |reason: String| MaterialError::InvalidProperties {
            name: self.name.clone(),
            reason,
        };
        StrictlyPositive::new(self.density)
            .map_err(|e| invalid(format!("density {}: {e}", self.density)))?;
        for (label, value) in [
            ("electrical conductivity", self.electrical_conductivity),
            ("thermal conductivity", self.thermal_conductivity),
            ("specific heat", self.specific_heat),
        ] {
            NonNegative::new(value).map_err(|e| invalid(format!("{label} {value}: {e}")))?;
        }
        Ok(self)
    }

    /// Builds a material from an alias-keyed property map.
    ///
    /// `Null` values are treated as absent.
    ///
    /// # Errors
    ///
    /// Returns [`MaterialError::InvalidProperties`] if a property is missing,
    /// unrecognized, or non-physical.
    pub fn from_alias_map(map: &Map<String, Value>) -> Result<Self, MaterialError> {
        let name = map
            .get("Name")
            .and_then(Value::as_str)
            .unwrap_or("unnamed")
            .to_string();
        let present: Map<String, Value> = map
            .iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        let material: Self = serde_json::from_value(Value::Object(present))
            .map_err(|e| MaterialError::InvalidProperties {
                name,
                reason: e.to_string(),
            })?;
        material.validated()
    }

    /// Returns the alias-keyed property map.
    #[must_use]
    pub fn to_alias_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("Name".into(), Value::from(self.name.clone()));
        map.insert("Density [g.cm-3]".into(), Value::from(self.density));
        map.insert(
            "Electrical conductivity [S.m-1]".into(),
            Value::from(self.electrical_conductivity),
        );
        map.insert(
            "Thermal conductivity [W.m-1.K-1]".into(),
            Value::from(self.thermal_conductivity),
        );
        map.insert(
            "Specific heat [J.g-1.K-1]".into(),
            Value::from(self.specific_heat),
        );
        map
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Density in g/cm³.
    #[must_use]
    pub fn density_g_cm3(&self) -> f64 {
        self.density
    }

    /// Electrical conductivity in S/m.
    #[must_use]
    pub fn electrical_conductivity_s_m(&self) -> f64 {
        self.electrical_conductivity
    }

    #[must_use]
    pub fn density(&self) -> MassDensity {
        MassDensity::new::<gram_per_cubic_centimeter>(self.density)
    }

    #[must_use]
    pub fn thermal_conductivity(&self) -> ThermalConductivity {
        ThermalConductivity::new::<watt_per_meter_kelvin>(self.thermal_conductivity)
    }

    /// Specific heat; J/(g·K) and kJ/(kg·K) are numerically equal.
    #[must_use]
    pub fn specific_heat(&self) -> SpecificHeatCapacity {
        SpecificHeatCapacity::new::<kilojoule_per_kilogram_kelvin>(self.specific_heat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use serde_json::json;
    use uom::si::specific_heat_capacity::joule_per_kilogram_kelvin;

    #[test]
    fn typed_properties() {
        let copper = Material::new("Copper", 8.96, 5.96e7, 401.0, 0.385).unwrap();
        assert_relative_eq!(copper.density().value, 8960.0, epsilon = 1e-9);
        assert_relative_eq!(
            copper.specific_heat().get::<joule_per_kilogram_kelvin>(),
            385.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn alias_map_round_trip() -> Result<(), MaterialError> {
        let steel = Material::new("Steel", 7.85, 1.45e6, 50.2, 0.49)?;
        let map = steel.to_alias_map();
        assert_eq!(map["Density [g.cm-3]"], json!(7.85));
        assert_eq!(Material::from_alias_map(&map)?, steel);
        Ok(())
    }

    #[test]
    fn incomplete_map_is_rejected() {
        let map = json!({"Name": "Mystery", "Density [g.cm-3]": 3.0});
        let err = Material::from_alias_map(map.as_object().unwrap()).unwrap_err();
        assert!(matches!(err, MaterialError::InvalidProperties { ref name, .. } if name == "Mystery"));
    }

    #[test]
    fn non_physical_density_is_rejected() {
        assert!(matches!(
            Material::new("Void", 0.0, 0.0, 0.0, 0.0),
            Err(MaterialError::InvalidProperties { .. })
        ));
    }
}
