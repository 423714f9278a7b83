//! Cell design computation and validation.
//!
//! A design starts from the defaults of its form factor. Overrides keyed by
//! field alias replace inputs, then the design runs through a fixed
//! pipeline:
//!
//! 1. per-field checks of every input,
//! 2. coating thickness optimization (unless disabled),
//! 3. cross-field checks of the derived quantities.
//!
//! Derived quantities are never stored. They are computed from the inputs
//! whenever they are read, and rounded to three decimals.

mod config;
mod derived;
mod design;
mod dump;
mod error;
mod fields;
mod form_factor;
mod limits;
mod optimize;
mod overrides;
mod target_capacity;
mod validate;

#[cfg(test)]
mod test_support;

pub use config::DesignConfig;
pub use design::{CellDesign, Electrode, Separator, Side};
pub use dump::CellSummary;
pub use error::{DesignError, Violation};
pub use fields::{Field, FieldKind, Scope};
pub use form_factor::{FormFactor, Geometry, UnknownFormFactor};
pub use optimize::{AdjustmentOutcome, CoatingAdjustment, OptimizationReport};
pub use overrides::{Overrides, assemble, expand_dotted};
pub use target_capacity::{CapacityMatch, TargetCapacityConfig, TargetCapacityError};

pub(crate) use limits::{CAPACITY_TOLERANCE, mass_loading as mass_loading_limits};

use tracing::debug;
use uom::si::f64::ElectricCharge;

use crate::support::{
    catalog::Catalog,
    constraint::{Constrained, StrictlyPositive},
};

impl CellDesign {
    /// Builds, optimizes and validates a design from alias-keyed overrides.
    ///
    /// # Errors
    ///
    /// Returns [`DesignError::UnrecognizedParameter`] for unknown keys,
    /// [`DesignError::UnknownMaterial`] or [`DesignError::InvalidFormulation`]
    /// when a nested record cannot be built, and
    /// [`DesignError::InvalidDesign`] for the first broken design rule.
    pub fn from_overrides(
        catalog: &Catalog,
        overrides: &Overrides,
        config: &DesignConfig,
    ) -> Result<Self, DesignError> {
        let design = refine(assemble(catalog, overrides)?, config)?;
        validate::cross_field(&design)?;
        debug!(
            form_factor = %design.form_factor(),
            capacity = design.nominal_capacity(),
            "cell design validated"
        );
        Ok(design)
    }

    /// Runs the per-field checks and the optimizer, leaving the cross-field
    /// checks to the caller.
    ///
    /// # Errors
    ///
    /// Returns the first input outside its limits.
    pub fn refined(self, config: &DesignConfig) -> Result<Self, DesignError> {
        refine(self, config)
    }

    /// Finds the positive mass loading that gives a target capacity, keeping
    /// every other input of this design.
    ///
    /// # Errors
    ///
    /// Returns a [`TargetCapacityError`] if the target is out of reach or the
    /// solver does not converge.
    pub fn match_capacity(
        &self,
        target: Constrained<ElectricCharge, StrictlyPositive>,
        config: TargetCapacityConfig,
        design_config: &DesignConfig,
    ) -> Result<CapacityMatch, TargetCapacityError> {
        target_capacity::target_capacity(self, target, config, design_config)
    }

    /// Runs the cross-field checks on an already refined design.
    ///
    /// # Errors
    ///
    /// Returns the first broken rule.
    pub fn check(&self) -> Result<(), DesignError> {
        Ok(validate::cross_field(self)?)
    }
}

fn refine(design: CellDesign, config: &DesignConfig) -> Result<CellDesign, DesignError> {
    validate::per_field(&design)?;
    Ok(if config.optimize_coating_thickness {
        optimize::optimize(design, config)
    } else {
        design
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use serde_json::json;

    use test_support::overrides;

    fn build(value: serde_json::Value) -> Result<CellDesign, DesignError> {
        CellDesign::from_overrides(Catalog::standard(), &overrides(value), &DesignConfig::default())
    }

    #[test]
    fn defaults_validate_for_every_form_factor() {
        for form_factor in FormFactor::ALL {
            let design = build(json!({ "Form factor": form_factor.as_str() }))
                .unwrap_or_else(|err| panic!("{form_factor}: {err}"));
            assert_eq!(design.form_factor(), form_factor);
        }
    }

    #[test]
    fn dump_rebuilds_the_same_design() {
        for form_factor in FormFactor::ALL {
            let design = build(json!({
                "Form factor": form_factor.as_str(),
                "Cell height [mm]": 90.0,
                "Positive electrode coating thickness [um]": 35.0,
            }))
            .expect("design should validate");
            let rebuilt = CellDesign::from_overrides(
                Catalog::standard(),
                &design.dump_by_alias(),
                &DesignConfig::default(),
            )
            .expect("dump should rebuild");
            assert_eq!(rebuilt.canonical_json(), design.canonical_json());
        }
    }

    #[test]
    fn switching_form_factor_changes_volume() {
        let prismatic = build(json!({})).unwrap();
        let cylindrical = build(json!({"Form factor": "Cylindrical"})).unwrap();
        assert_relative_eq!(prismatic.cell_volume(), 0.49);
        assert_relative_eq!(cylindrical.cell_volume(), 0.024);
    }

    #[test]
    fn optimization_can_be_disabled() {
        let value = json!({
            "Form factor": "Pouch",
            "Positive electrode coating thickness [um]": 35.0,
        });
        assert!(build(value.clone()).is_ok());

        let config = DesignConfig {
            optimize_coating_thickness: false,
            ..DesignConfig::default()
        };
        let err = CellDesign::from_overrides(Catalog::standard(), &overrides(value), &config)
            .unwrap_err();
        let DesignError::InvalidDesign(violation) = err else {
            panic!("expected a design violation, got {err:?}");
        };
        assert_eq!(violation.parameter, "Positive electrode porosity");
    }

    #[test]
    fn per_field_violation_stops_before_optimization() {
        let err = build(json!({"Cell volume packing ratio": 0.5})).unwrap_err();
        assert!(matches!(
            err,
            DesignError::InvalidDesign(Violation { ref parameter, .. })
                if parameter == "Cell volume packing ratio"
        ));
    }
}
