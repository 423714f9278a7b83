use serde_json::Value;
use tracing::debug;

use crate::support::materials::MaterialRegistry;

use super::{ElectrodeFormulation, FormulationError, FormulationFields, distribute};

/// Which electrode a formulation is made for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Cathode,
    Anode,
}

#[derive(Debug, Clone)]
struct Known {
    polarity: Polarity,
    fields: FormulationFields,
}

/// The named formulations a design may refer to.
#[derive(Debug, Clone)]
pub struct FormulationRegistry {
    known: Vec<Known>,
}

impl FormulationRegistry {
    /// Builds a registry from named records, in listing order.
    ///
    /// Records are stored as given and validated when built.
    pub fn new(entries: impl IntoIterator<Item = (Polarity, FormulationFields)>) -> Self {
        Self {
            known: entries
                .into_iter()
                .map(|(polarity, fields)| Known { polarity, fields })
                .collect(),
        }
    }

    /// Common lithium-ion cathode and anode recipes, plus silicon-graphite
    /// blends.
    #[must_use]
    pub fn standard() -> Self {
        let cathode = |name: &str, binder: &str, [active, other]: [f64; 2], capacity, voltage| {
            (
                Polarity::Cathode,
                FormulationFields {
                    name: Some(name.into()),
                    primary_active_material: Some(name.into()),
                    primary_binder: Some(binder.into()),
                    primary_conductive_agent: Some("Carbon".into()),
                    primary_active_material_mass_fraction: Some(active),
                    primary_binder_mass_fraction: Some(other),
                    primary_conductive_agent_mass_fraction: Some(other),
                    specific_capacity: Some(capacity),
                    nominal_voltage: Some(voltage),
                    ..FormulationFields::default()
                },
            )
        };

        let water_based_anode = |name: &str, capacity, voltage| FormulationFields {
            name: Some(name.into()),
            primary_active_material: Some(name.into()),
            primary_binder: Some("CMC".into()),
            secondary_binder: Some("SBR".into()),
            primary_active_material_mass_fraction: Some(0.98),
            primary_binder_mass_fraction: Some(0.01),
            secondary_binder_mass_fraction: Some(0.01),
            specific_capacity: Some(capacity),
            nominal_voltage: Some(voltage),
            ..FormulationFields::default()
        };

        let silicon_blend = |si_percent: u32| {
            let si = f64::from(si_percent) / 100.0;
            let graphite = 1.0 - si;
            let graphite_percent = 100 - si_percent;
            FormulationFields {
                name: Some(format!("Si{si_percent}%+Graphite{graphite_percent}%")),
                secondary_active_material: Some("Si".into()),
                active_material_ratio: Some(format!("{si_percent}:{graphite_percent}")),
                primary_active_material_mass_fraction: Some(0.98 * graphite),
                secondary_active_material_mass_fraction: Some(0.98 * si),
                specific_capacity: Some(355.0 * graphite + 2863.0 * si),
                nominal_voltage: Some(0.1 * graphite + 0.4 * si),
                ..water_based_anode("Graphite", 0.0, 0.0)
            }
        };

        let mut entries = vec![
            cathode("NMC811", "PVDF", [0.98, 0.01], 200.0, 3.77),
            cathode("NMC622", "PVDF", [0.98, 0.01], 180.0, 3.6),
            cathode("NMC523", "PVDF", [0.98, 0.01], 160.0, 3.5),
            cathode("NMC111", "PVDF", [0.98, 0.01], 180.0, 3.7),
            cathode("LFP", "PVDF", [0.94, 0.03], 160.0, 3.4),
            cathode("LCO", "PVDF", [0.98, 0.01], 150.0, 3.9),
            cathode("LNO", "PVDF", [0.98, 0.01], 180.0, 3.8),
            cathode("NCA", "PVDF", [0.98, 0.01], 200.0, 3.67),
            (Polarity::Anode, water_based_anode("Graphite", 355.0, 0.1)),
            (Polarity::Anode, water_based_anode("Si", 2863.0, 0.4)),
        ];
        // LTO is coated like a cathode but sits on the negative side.
        let (_, lto) = cathode("LTO", "CMC", [0.98, 0.01], 175.0, 1.55);
        entries.push((Polarity::Anode, lto));
        entries.extend([5, 10, 20, 40].map(|si| (Polarity::Anode, silicon_blend(si))));

        Self::new(entries)
    }

    /// Returns the record registered under a name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FormulationFields> {
        self.known
            .iter()
            .find(|k| k.fields.name.as_deref() == Some(name))
            .map(|k| &k.fields)
    }

    /// Registered names for one electrode, in listing order.
    #[must_use]
    pub fn names(&self, polarity: Polarity) -> Vec<&str> {
        self.known
            .iter()
            .filter(|k| k.polarity == polarity)
            .filter_map(|k| k.fields.name.as_deref())
            .collect()
    }

    /// Builds a named standard formulation.
    ///
    /// # Errors
    ///
    /// Returns [`FormulationError::UnknownFormulation`] with suggestions if
    /// the name is not registered.
    pub fn by_name(
        &self,
        name: &str,
        materials: &MaterialRegistry,
    ) -> Result<ElectrodeFormulation, FormulationError> {
        let fields = self.get(name).cloned().ok_or_else(|| self.unknown(name))?;
        ElectrodeFormulation::from_fields(fields, self, materials)
    }

    /// Builds a formulation from a name or an alias-keyed record.
    ///
    /// - A string must name a registered formulation.
    /// - A record whose `Name` is registered overlays that formulation.
    /// - Any other record stands alone. If it gives only the active material
    ///   fraction, the remainder is split between binder and conductive
    ///   agent first.
    ///
    /// # Errors
    ///
    /// Returns a [`FormulationError`] if the name is unknown or the
    /// resulting formulation is invalid.
    pub fn build(
        &self,
        value: &Value,
        materials: &MaterialRegistry,
    ) -> Result<ElectrodeFormulation, FormulationError> {
        match value {
            Value::String(name) => self.by_name(name, materials),
            Value::Object(map) => {
                let fields = FormulationFields::from_map(map)?;
                let base = fields.name.as_deref().and_then(|name| self.get(name)).cloned();
                let fields = match base {
                    Some(base) => {
                        debug!(name = base.name.as_deref(), "overlaying standard formulation");
                        base.overlay(fields)
                    }
                    None => {
                        let polarity = fields
                            .primary_active_material
                            .as_deref()
                            .map_or(Polarity::Cathode, |m| self.polarity_of(m));
                        distribute::distribute_mass_fractions(fields, polarity)
                    }
                };
                ElectrodeFormulation::from_fields(fields, self, materials)
            }
            other => Err(FormulationError::Malformed {
                reason: format!("expected a formulation name or record, got {other}"),
            }),
        }
    }

    /// Guesses the electrode from the active material name.
    ///
    /// A material containing a registered cathode name is a cathode, else one
    /// containing an anode name is an anode. Blends are not considered, and
    /// anything unrecognized is treated as a cathode.
    #[must_use]
    pub fn polarity_of(&self, material: &str) -> Polarity {
        let mentions = |polarity| {
            self.known
                .iter()
                .filter(|k| k.polarity == polarity && k.fields.secondary_active_material.is_none())
                .filter_map(|k| k.fields.name.as_deref())
                .any(|name| material.contains(name))
        };
        if mentions(Polarity::Cathode) {
            Polarity::Cathode
        } else if mentions(Polarity::Anode) {
            Polarity::Anode
        } else {
            Polarity::Cathode
        }
    }

    /// First registered record whose primary active material resolves to the
    /// same material as `material`.
    pub(super) fn reference_for(
        &self,
        material: &str,
        materials: &MaterialRegistry,
    ) -> Option<&FormulationFields> {
        let target = materials.resolve(material).ok()?;
        self.known
            .iter()
            .map(|k| &k.fields)
            .find(|fields| {
                fields
                    .primary_active_material
                    .as_deref()
                    .and_then(|m| materials.resolve(m).ok())
                    == Some(target)
            })
    }

    fn unknown(&self, name: &str) -> FormulationError {
        let lower = name.to_lowercase();
        let owned = |names: Vec<&str>| names.into_iter().map(String::from).collect::<Vec<_>>();
        let suggestions = self
            .known
            .iter()
            .filter_map(|k| k.fields.name.as_deref())
            .filter(|known| {
                let known = known.to_lowercase();
                known.contains(&lower) || lower.contains(&known)
            })
            .map(String::from)
            .collect();
        FormulationError::UnknownFormulation {
            name: name.to_string(),
            suggestions,
            cathodes: owned(self.names(Polarity::Cathode)),
            anodes: owned(self.names(Polarity::Anode)),
        }
    }
}

impl Default for FormulationRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use serde_json::json;

    #[test]
    fn standard_names_by_electrode() {
        let registry = FormulationRegistry::standard();
        assert_eq!(
            registry.names(Polarity::Cathode),
            ["NMC811", "NMC622", "NMC523", "NMC111", "LFP", "LCO", "LNO", "NCA"]
        );
        assert_eq!(
            registry.names(Polarity::Anode),
            [
                "Graphite",
                "Si",
                "LTO",
                "Si5%+Graphite95%",
                "Si10%+Graphite90%",
                "Si20%+Graphite80%",
                "Si40%+Graphite60%"
            ]
        );
    }

    #[test]
    fn every_standard_formulation_is_valid() {
        let registry = FormulationRegistry::standard();
        let materials = MaterialRegistry::standard();
        for polarity in [Polarity::Cathode, Polarity::Anode] {
            for name in registry.names(polarity) {
                let formulation = registry.by_name(name, &materials).unwrap();
                assert_relative_eq!(formulation.sum_of_mass_fractions(), 1.0, epsilon = 1e-9);
                assert!(formulation.name_mentions_active_material(), "{name}");
            }
        }
    }

    #[test]
    fn unknown_name_suggests_close_matches() {
        let registry = FormulationRegistry::standard();
        let err = registry
            .by_name("nmc", &MaterialRegistry::standard())
            .unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Unknown formulation 'nmc'."));
        assert!(message.contains("Did you mean: NMC811, NMC622, NMC523, NMC111?"));
        assert!(message.contains("Anode materials: Graphite, Si, LTO, Si5%+Graphite95%"));
    }

    #[test]
    fn unknown_name_without_suggestions() {
        let registry = FormulationRegistry::standard();
        let err = registry
            .by_name("Unobtainium", &MaterialRegistry::standard())
            .unwrap_err();
        assert!(!err.to_string().contains("Did you mean"));
    }

    #[test]
    fn record_with_known_name_overlays() -> Result<(), FormulationError> {
        let registry = FormulationRegistry::standard();
        let lfp = registry.build(
            &json!({
                "Name": "LFP",
                "Electrode specific capacity [mAh.g-1]": 155.0,
                "Primary binder": null,
            }),
            &MaterialRegistry::standard(),
        )?;
        assert_eq!(lfp.specific_capacity_mah_g(), 155.0);
        assert_eq!(lfp.primary_binder(), "PVDF");
        assert_eq!(lfp.nominal_voltage_v(), 3.4);
        Ok(())
    }

    #[test]
    fn active_only_record_is_completed() -> Result<(), FormulationError> {
        let registry = FormulationRegistry::standard();
        let custom = registry.build(
            &json!({
                "Name": "Dense NMC",
                "Primary active material": "NMC811",
                "Primary active material mass fraction": 0.96,
            }),
            &MaterialRegistry::standard(),
        )?;
        assert_eq!(custom.primary_binder(), "PVDF");
        assert_eq!(custom.primary_conductive_agent(), Some("Carbon"));
        assert_eq!(custom.specific_capacity_mah_g(), 200.0);
        Ok(())
    }

    #[test]
    fn polarity_from_material_name() {
        let registry = FormulationRegistry::standard();
        assert_eq!(registry.polarity_of("NMC811"), Polarity::Cathode);
        assert_eq!(registry.polarity_of("Graphite"), Polarity::Anode);
        assert_eq!(registry.polarity_of("LTO"), Polarity::Anode);
        assert_eq!(registry.polarity_of("NaCrO2"), Polarity::Cathode);
    }
}
