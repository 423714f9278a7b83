use crate::support::{materials::MaterialRegistry, units::Rounding};

use super::{ElectrodeFormulation, FormulationError};

/// Density assumed for a component slot that names no material.
const ABSENT_COMPONENT_DENSITY: f64 = 1.0;

/// Coating mixes at or below this density (g/cm³) are rejected.
const MIN_FORMULATION_DENSITY: f64 = 1.5;

/// Density of the dry coating mix in g/cm³, rounded to three decimals.
///
/// The mix is treated as an ideal mixture: the specific volume is the
/// mass-fraction-weighted sum of the component specific volumes.
pub(super) fn formulation_density(
    formulation: &ElectrodeFormulation,
    materials: &MaterialRegistry,
) -> Result<f64, FormulationError> {
    let components = [
        Some(formulation.primary_active_material.as_str()),
        formulation.secondary_active_material.as_deref(),
        Some(formulation.primary_binder.as_str()),
        formulation.secondary_binder.as_deref(),
        formulation.primary_conductive_agent.as_deref(),
        formulation.secondary_conductive_agent.as_deref(),
    ];

    let mut volume = 0.0;
    for (material, (_, fraction)) in components.into_iter().zip(formulation.labelled_fractions()) {
        let density = match material {
            Some(name) => materials.material(name)?.density_g_cm3(),
            None => ABSENT_COMPONENT_DENSITY,
        };
        volume += fraction / density;
    }

    if volume == 0.0 {
        return Err(FormulationError::DensityUndefined);
    }

    checked((1.0 / volume).round3())
}

/// Rejects mixes too light to be a coating.
pub(super) fn checked(density: f64) -> Result<f64, FormulationError> {
    if density > MIN_FORMULATION_DENSITY {
        Ok(density)
    } else {
        Err(FormulationError::DensityTooLow { density })
    }
}
