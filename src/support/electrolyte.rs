//! Liquid electrolyte composition.
//!
//! The composition is descriptive: it names up to three solvents, salts and
//! additives with their fractions or concentrations. Nothing in the design
//! computation depends on it beyond the electrolyte mass, which uses a
//! fixed density.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::support::constraint::{NonNegative, UnitInterval};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ElectrolyteError {
    #[error("Invalid electrolyte composition: {reason}")]
    Malformed { reason: String },

    #[error("Electrolyte {field} is {value} but must be {requirement}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        requirement: &'static str,
    },
}

/// Solvents, salts and additives of a liquid electrolyte.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ElectrolyteComposition {
    #[serde(rename = "name")]
    pub name: String,

    #[serde(rename = "Primary solvent")]
    pub primary_solvent: String,
    #[serde(rename = "Secondary solvent")]
    pub secondary_solvent: Option<String>,
    #[serde(rename = "Tertiary solvent")]
    pub tertiary_solvent: Option<String>,

    #[serde(rename = "Primary solvent volume fraction")]
    pub primary_solvent_volume_fraction: f64,
    #[serde(rename = "Secondary solvent volume fraction")]
    pub secondary_solvent_volume_fraction: Option<f64>,
    #[serde(rename = "Tertiary solvent volume fraction")]
    pub tertiary_solvent_volume_fraction: Option<f64>,

    #[serde(rename = "Primary salt")]
    pub primary_salt: String,
    #[serde(rename = "Secondary salt")]
    pub secondary_salt: Option<String>,
    #[serde(rename = "Tertiary salt")]
    pub tertiary_salt: Option<String>,

    #[serde(rename = "Primary salt concentration [mol.L-1]")]
    pub primary_salt_concentration: f64,
    #[serde(rename = "Secondary salt concentration [mol.L-1]")]
    pub secondary_salt_concentration: Option<f64>,
    #[serde(rename = "Tertiary salt concentration [mol.L-1]")]
    pub tertiary_salt_concentration: Option<f64>,

    #[serde(rename = "Primary additive")]
    pub primary_additive: Option<String>,
    #[serde(rename = "Secondary additive")]
    pub secondary_additive: Option<String>,
    #[serde(rename = "Tertiary additive")]
    pub tertiary_additive: Option<String>,

    #[serde(rename = "Primary additive mass fraction")]
    pub primary_additive_mass_fraction: Option<f64>,
    #[serde(rename = "Secondary additive mass fraction")]
    pub secondary_additive_mass_fraction: Option<f64>,
    #[serde(rename = "Tertiary additive mass fraction")]
    pub tertiary_additive_mass_fraction: Option<f64>,
}

impl Default for ElectrolyteComposition {
    /// 1 M LiPF6 in EC:EMC:DMC at 2:4:4 by volume.
    fn default() -> Self {
        Self {
            name: "EC:EMC:DMC (2:4:4)".into(),
            primary_solvent: "EC".into(),
            secondary_solvent: Some("EMC".into()),
            tertiary_solvent: Some("DMC".into()),
            primary_solvent_volume_fraction: 0.2,
            secondary_solvent_volume_fraction: Some(0.4),
            tertiary_solvent_volume_fraction: Some(0.4),
            primary_salt: "LiPF6".into(),
            secondary_salt: None,
            tertiary_salt: None,
            primary_salt_concentration: 1.0,
            secondary_salt_concentration: None,
            tertiary_salt_concentration: None,
            primary_additive: None,
            secondary_additive: None,
            tertiary_additive: None,
            primary_additive_mass_fraction: None,
            secondary_additive_mass_fraction: None,
            tertiary_additive_mass_fraction: None,
        }
    }
}

impl ElectrolyteComposition {
    /// Builds a composition from a bare name or an alias-keyed record.
    ///
    /// A name relabels the default composition. A record overlays the
    /// default, so only the fields that differ need to be given; `Null`
    /// values are treated as absent.
    ///
    /// # Errors
    ///
    /// Returns [`ElectrolyteError`] for unrecognized keys, wrongly typed
    /// values, fractions outside `[0, 1]` or negative concentrations.
    pub fn from_value(value: &Value) -> Result<Self, ElectrolyteError> {
        let composition = match value {
            Value::String(name) => Self {
                name: name.clone(),
                ..Self::default()
            },
            Value::Object(map) => {
                let present: Map<String, Value> = map
                    .iter()
                    .filter(|(_, v)| !v.is_null())
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect();
                serde_json::from_value(Value::Object(present)).map_err(|e| {
                    ElectrolyteError::Malformed {
                        reason: e.to_string(),
                    }
                })?
            }
            other => {
                return Err(ElectrolyteError::Malformed {
                    reason: format!("expected a name or a composition record, got {other}"),
                });
            }
        };
        composition.validated()
    }

    fn validated(self) -> Result<Self, ElectrolyteError> {
        let fractions = [
            ("primary solvent volume fraction", Some(self.primary_solvent_volume_fraction)),
            ("secondary solvent volume fraction", self.secondary_solvent_volume_fraction),
            ("tertiary solvent volume fraction", self.tertiary_solvent_volume_fraction),
            ("primary additive mass fraction", self.primary_additive_mass_fraction),
            ("secondary additive mass fraction", self.secondary_additive_mass_fraction),
            ("tertiary additive mass fraction", self.tertiary_additive_mass_fraction),
        ];
        for (field, value) in fractions {
            if let Some(value) = value {
                UnitInterval::new(value).map_err(|_| ElectrolyteError::OutOfRange {
                    field,
                    value,
                    requirement: "between 0 and 1",
                })?;
            }
        }

        let concentrations = [
            ("primary salt concentration", Some(self.primary_salt_concentration)),
            ("secondary salt concentration", self.secondary_salt_concentration),
            ("tertiary salt concentration", self.tertiary_salt_concentration),
        ];
        for (field, value) in concentrations {
            if let Some(value) = value {
                NonNegative::new(value).map_err(|_| ElectrolyteError::OutOfRange {
                    field,
                    value,
                    requirement: "non-negative",
                })?;
            }
        }
        Ok(self)
    }

    /// Alias-keyed map of every field, `Null` where absent.
    #[must_use]
    pub fn to_alias_map(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn name_relabels_default() -> Result<(), ElectrolyteError> {
        let electrolyte = ElectrolyteComposition::from_value(&json!("House blend"))?;
        assert_eq!(electrolyte.name, "House blend");
        assert_eq!(electrolyte.primary_salt, "LiPF6");
        assert_eq!(electrolyte.tertiary_solvent.as_deref(), Some("DMC"));
        Ok(())
    }

    #[test]
    fn record_overlays_default() -> Result<(), ElectrolyteError> {
        let electrolyte = ElectrolyteComposition::from_value(&json!({
            "name": "LiPF6 + VC",
            "Primary additive": "VC",
            "Primary additive mass fraction": 0.02,
            "Secondary salt": null,
        }))?;
        assert_eq!(electrolyte.primary_additive.as_deref(), Some("VC"));
        assert_eq!(electrolyte.primary_solvent_volume_fraction, 0.2);
        Ok(())
    }

    #[test]
    fn fractions_are_checked() {
        let err = ElectrolyteComposition::from_value(&json!({
            "Primary solvent volume fraction": 1.2,
        }))
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Electrolyte primary solvent volume fraction is 1.2 but must be between 0 and 1"
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(matches!(
            ElectrolyteComposition::from_value(&json!({"Solvent": "EC"})),
            Err(ElectrolyteError::Malformed { .. })
        ));
    }

    #[test]
    fn dump_uses_aliases() {
        let map = ElectrolyteComposition::default().to_alias_map();
        assert_eq!(map["name"], json!("EC:EMC:DMC (2:4:4)"));
        assert_eq!(map["Primary salt concentration [mol.L-1]"], json!(1.0));
        assert_eq!(map["Secondary salt"], Value::Null);
    }
}
