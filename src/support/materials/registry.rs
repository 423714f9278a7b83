use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use super::{Material, MaterialError, catalog::MATERIALS};

/// Queries shorter than this only match exactly.
const MIN_PARTIAL_QUERY_LEN: usize = 3;

/// An immutable table of materials with alias resolution.
///
/// Resolution of a name or alias runs these steps in order and stops at the
/// first hit:
///
/// 1. exact match against the alias index,
/// 2. match of the lowercased query against the alias index,
/// 3. canonical-name match (case-insensitive),
/// 4. for queries longer than two characters, a partial match: the query
///    must be contained in an alias as its prefix, its suffix, or a whole
///    word. Among several partial hits the shortest alias wins, and equal
///    lengths go to the earlier registry entry.
///
/// The alias index stores each alias as written, lowercased and uppercased.
/// When two materials share an alias the later entry wins.
#[derive(Debug, Clone)]
pub struct MaterialRegistry {
    materials: Vec<Material>,
    aliases: Vec<Vec<String>>,
    index: HashMap<String, usize>,
}

impl MaterialRegistry {
    /// Builds a registry from materials and their aliases, in registry order.
    pub fn new(entries: impl IntoIterator<Item = (Material, Vec<String>)>) -> Self {
        let (materials, aliases): (Vec<_>, Vec<_>) = entries.into_iter().unzip();

        let mut index = HashMap::new();
        for (position, names) in aliases.iter().enumerate() {
            for alias in names {
                index.insert(alias.clone(), position);
                index.insert(alias.to_lowercase(), position);
                index.insert(alias.to_uppercase(), position);
            }
        }

        Self {
            materials,
            aliases,
            index,
        }
    }

    /// The standard table of casing metals, active materials, binders,
    /// conductive additives and salts.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(MATERIALS.iter().map(|entry| {
            let material = Material {
                name: entry.name.to_string(),
                density: entry.density,
                electrical_conductivity: entry.electrical_conductivity,
                thermal_conductivity: entry.thermal_conductivity,
                specific_heat: entry.specific_heat,
            };
            let aliases = entry.aliases.iter().map(ToString::to_string).collect();
            (material, aliases)
        }))
    }

    /// Resolves a name or alias to its canonical material name.
    ///
    /// # Errors
    ///
    /// Returns [`MaterialError::Unknown`] if nothing matches.
    pub fn resolve(&self, query: &str) -> Result<&str, MaterialError> {
        let position = self
            .resolve_position(query)
            .ok_or_else(|| self.unknown(query))?;
        Ok(&self.materials[position].name)
    }

    fn resolve_position(&self, query: &str) -> Option<usize> {
        let query = query.trim();
        if let Some(&position) = self.index.get(query) {
            return Some(position);
        }

        let lower = query.to_lowercase();
        if let Some(&position) = self.index.get(&lower) {
            return Some(position);
        }

        if let Some(position) = self.materials.iter().position(|m| m.name == query) {
            return Some(position);
        }
        if let Some(position) = self
            .materials
            .iter()
            .position(|m| m.name.to_lowercase() == lower)
        {
            return Some(position);
        }

        if lower.chars().count() < MIN_PARTIAL_QUERY_LEN {
            return None;
        }

        let word = format!(" {lower} ");
        let hit = self
            .aliases
            .iter()
            .enumerate()
            .flat_map(|(position, names)| names.iter().map(move |alias| (position, alias)))
            .filter(|(_, alias)| {
                let alias = alias.to_lowercase();
                alias.contains(&lower)
                    && (alias.starts_with(&lower)
                        || alias.ends_with(&lower)
                        || format!(" {alias} ").contains(&word))
            })
            .min_by_key(|(_, alias)| alias.chars().count());

        if let Some((position, alias)) = hit {
            debug!(query, alias = alias.as_str(), "material resolved by partial alias match");
            return Some(position);
        }
        None
    }

    /// Looks up a material by its canonical name.
    ///
    /// # Errors
    ///
    /// Returns [`MaterialError::Unknown`] if no material has that name.
    pub fn lookup(&self, canonical_name: &str) -> Result<&Material, MaterialError> {
        self.materials
            .iter()
            .find(|m| m.name == canonical_name)
            .ok_or_else(|| self.unknown(canonical_name))
    }

    /// Resolves a name or alias and returns the material.
    ///
    /// # Errors
    ///
    /// Returns [`MaterialError::Unknown`] if nothing matches.
    pub fn material(&self, name_or_alias: &str) -> Result<&Material, MaterialError> {
        self.resolve_position(name_or_alias)
            .map(|position| &self.materials[position])
            .ok_or_else(|| self.unknown(name_or_alias))
    }

    /// Returns the aliases registered for a material.
    ///
    /// # Errors
    ///
    /// Returns [`MaterialError::Unknown`] if the name does not resolve.
    pub fn aliases(&self, name_or_alias: &str) -> Result<&[String], MaterialError> {
        self.resolve_position(name_or_alias)
            .map(|position| self.aliases[position].as_slice())
            .ok_or_else(|| self.unknown(name_or_alias))
    }

    /// Canonical names whose name or any alias contains the query
    /// (case-insensitive), in registry order.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&str> {
        let lower = query.trim().to_lowercase();
        self.materials
            .iter()
            .zip(&self.aliases)
            .filter(|(material, aliases)| {
                material.name.to_lowercase().contains(&lower)
                    || aliases.iter().any(|a| a.to_lowercase().contains(&lower))
            })
            .map(|(material, _)| material.name.as_str())
            .collect()
    }

    /// Builds a material from a name or a partial alias-keyed property map.
    ///
    /// A string must resolve to a known material. A map whose `Name`
    /// resolves uses the known material as a base and overlays the given
    /// properties, keeping the canonical name. A map with an unknown name
    /// must supply every property.
    ///
    /// # Errors
    ///
    /// Returns [`MaterialError::Unknown`] for an unresolvable string and
    /// [`MaterialError::InvalidProperties`] for an incomplete or non-physical
    /// custom material.
    pub fn snapshot(&self, value: &Value) -> Result<Material, MaterialError> {
        match value {
            Value::String(name) => self.material(name).cloned(),
            Value::Object(map) => {
                let known = map
                    .get("Name")
                    .and_then(Value::as_str)
                    .and_then(|name| self.resolve_position(name));
                match known {
                    Some(position) => {
                        let base = &self.materials[position];
                        let mut merged = base.to_alias_map();
                        for (key, v) in map.iter().filter(|(_, v)| !v.is_null()) {
                            merged.insert(key.clone(), v.clone());
                        }
                        merged.insert("Name".into(), Value::from(base.name.clone()));
                        Material::from_alias_map(&merged)
                    }
                    None => Material::from_alias_map(map),
                }
            }
            other => Err(MaterialError::InvalidProperties {
                name: other.to_string(),
                reason: "expected a material name or a property map".into(),
            }),
        }
    }

    /// Iterates over materials in registry order.
    pub fn iter(&self) -> impl Iterator<Item = &Material> {
        self.materials.iter()
    }

    fn unknown(&self, query: &str) -> MaterialError {
        let known: Vec<&str> = self.materials.iter().map(|m| m.name.as_str()).collect();
        MaterialError::Unknown {
            query: query.to_string(),
            known: known.join(", "),
        }
    }
}

impl Default for MaterialRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

/// Convenience for building reduced registries in tests and examples.
impl FromIterator<Material> for MaterialRegistry {
    fn from_iter<I: IntoIterator<Item = Material>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(|m| (m, Vec::new())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    fn registry() -> MaterialRegistry {
        MaterialRegistry::standard()
    }

    #[test]
    fn exact_and_case_insensitive_aliases() {
        let registry = registry();
        assert_eq!(registry.resolve("Cu").unwrap(), "Copper");
        assert_eq!(registry.resolve("copper foil").unwrap(), "Copper");
        assert_eq!(registry.resolve("LIFEPO4").unwrap(), "LFP");
        assert_eq!(registry.resolve("Kynar").unwrap(), "PVDF");
    }

    #[test]
    fn later_entries_win_alias_collisions() {
        let registry = registry();
        assert_eq!(registry.resolve("C").unwrap(), "Carbon");
        assert_eq!(registry.resolve("AL").unwrap(), "Aluminum");
        assert_eq!(registry.resolve("Li metal").unwrap(), "Lithium Metal");
        assert_eq!(registry.resolve("NCO").unwrap(), "NaCoO2");
    }

    #[test]
    fn canonical_names_resolve_without_aliases() {
        let registry = registry();
        assert_eq!(registry.resolve("Graphite").unwrap(), "Graphite");
        assert_eq!(registry.resolve("NMC622").unwrap(), "NMC622");
        assert_eq!(registry.resolve("steel").unwrap(), "Steel");
        assert_eq!(registry.resolve("hard carbon").unwrap(), "Hard Carbon");
    }

    #[test]
    fn partial_matches_prefer_the_shortest_alias() {
        let registry = registry();
        // "Ti alloy" beats "Steel alloy", "Titanium alloy" and "Stainless steel alloy".
        assert_eq!(registry.resolve("alloy").unwrap(), "Titanium");
        assert_eq!(registry.resolve("mild").unwrap(), "Steel");
        assert_eq!(registry.resolve("resistant").unwrap(), "Stainless Steel");
        assert_eq!(registry.resolve("butadiene").unwrap(), "SBR");
    }

    #[test]
    fn partial_matches_need_a_word_boundary() {
        let registry = registry();
        // "phosph" is inside "phosphate" but is neither a prefix, suffix nor word.
        assert!(registry.resolve("phosph").is_err());
        // Two-letter queries never match partially.
        assert!(registry.resolve("zz").is_err());
    }

    #[test]
    fn unknown_material_lists_known_names() {
        let err = registry().resolve("Unobtainium").unwrap_err();
        let MaterialError::Unknown { query, known } = err else {
            panic!("expected an unknown material error");
        };
        assert_eq!(query, "Unobtainium");
        assert!(known.contains("Graphite"));
    }

    #[test]
    fn lookup_requires_canonical_name() {
        let registry = registry();
        assert!(registry.lookup("Copper").is_ok());
        assert!(registry.lookup("Cu").is_err());
    }

    #[test]
    fn search_matches_names_and_aliases() {
        let registry = registry();
        let hits = registry.search("titanate");
        assert_eq!(hits, vec!["LTO"]);
        assert!(registry.search("sodium").contains(&"NaPF6"));
    }

    #[test]
    fn snapshot_overlays_known_material() -> Result<(), MaterialError> {
        let registry = registry();
        let custom = registry.snapshot(&json!({"Name": "Al", "Density [g.cm-3]": 2.8}))?;
        assert_eq!(custom.name(), "Aluminum");
        assert_eq!(custom.density_g_cm3(), 2.8);
        assert_eq!(custom.electrical_conductivity_s_m(), 3.77e7);

        let steel = registry.snapshot(&json!("Steel"))?;
        assert_eq!(steel.density_g_cm3(), 7.85);
        Ok(())
    }

    #[test]
    fn reduced_registry_for_tests() {
        let registry: MaterialRegistry = [Material::new("Foo", 1.0, 0.0, 0.0, 0.0).unwrap()]
            .into_iter()
            .collect();
        assert_eq!(registry.resolve("foo").unwrap(), "Foo");
        assert!(registry.resolve("Copper").is_err());
    }
}
