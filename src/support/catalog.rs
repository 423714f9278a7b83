//! The reference data a cell design is resolved against.

use once_cell::sync::Lazy;
use serde_json::Value;

use crate::support::{
    formulation::{ElectrodeFormulation, FormulationError, FormulationRegistry},
    materials::{Material, MaterialError, MaterialRegistry},
};

static STANDARD: Lazy<Catalog> = Lazy::new(|| Catalog {
    materials: MaterialRegistry::standard(),
    formulations: FormulationRegistry::standard(),
});

/// Materials and formulations, immutable once built.
///
/// Designs never reach for global tables; everything that needs reference
/// data takes a `&Catalog`. [`Catalog::standard`] is a shared instance of
/// the built-in tables.
#[derive(Debug, Clone)]
pub struct Catalog {
    materials: MaterialRegistry,
    formulations: FormulationRegistry,
}

impl Catalog {
    #[must_use]
    pub fn new(materials: MaterialRegistry, formulations: FormulationRegistry) -> Self {
        Self {
            materials,
            formulations,
        }
    }

    /// The built-in tables, built on first use.
    #[must_use]
    pub fn standard() -> &'static Self {
        &STANDARD
    }

    #[must_use]
    pub fn materials(&self) -> &MaterialRegistry {
        &self.materials
    }

    #[must_use]
    pub fn formulations(&self) -> &FormulationRegistry {
        &self.formulations
    }

    /// Builds a material from a name or property record.
    ///
    /// # Errors
    ///
    /// See [`MaterialRegistry::snapshot`].
    pub fn material(&self, value: &Value) -> Result<Material, MaterialError> {
        self.materials.snapshot(value)
    }

    /// Builds a formulation from a name or alias-keyed record.
    ///
    /// # Errors
    ///
    /// See [`FormulationRegistry::build`].
    pub fn formulation(&self, value: &Value) -> Result<ElectrodeFormulation, FormulationError> {
        self.formulations.build(value, &self.materials)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard().clone()
    }
}
