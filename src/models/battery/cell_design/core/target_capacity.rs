//! Iterative solver for a target nominal capacity.
//!
//! Capacity grows linearly with the positive mass loading, so bisection over
//! the allowed mass loading range finds the loading that gives the target.

mod config;
mod error;
mod problem;

pub use config::TargetCapacityConfig;
pub use error::TargetCapacityError;

use twine_core::Model;
use twine_solvers::equation::bisection;
use uom::si::{electric_charge::ampere_hour, f64::ElectricCharge};

use crate::support::constraint::{Constrained, StrictlyPositive};

use super::{CellDesign, DesignConfig, Side, limits};

use problem::{CapacityModel, CapacityProblem};

/// A design whose capacity matches a target.
#[derive(Debug, Clone, PartialEq)]
pub struct CapacityMatch {
    /// Positive mass loading in mg/cm².
    pub mass_loading: f64,

    /// The base design at that mass loading, refined but not cross-checked.
    pub design: CellDesign,
}

/// Finds the positive mass loading that gives `target` capacity.
///
/// # Errors
///
/// Returns [`TargetCapacityError::Unreachable`] when the target is outside
/// what the mass loading limits allow, and
/// [`TargetCapacityError::MaxIters`] if the solve does not converge.
pub(super) fn target_capacity(
    base: &CellDesign,
    target: Constrained<ElectricCharge, StrictlyPositive>,
    config: TargetCapacityConfig,
    design_config: &DesignConfig,
) -> Result<CapacityMatch, TargetCapacityError> {
    let target = target.into_inner();
    let model = CapacityModel::new(base, design_config);
    let problem = CapacityProblem::new(target);
    let limits = limits::mass_loading(Side::Positive);

    let lowest = model.call(&limits.min())?.nominal_capacity();
    let highest = model.call(&limits.max())?.nominal_capacity();
    if !(lowest..=highest).contains(&target.get::<ampere_hour>()) {
        return Err(TargetCapacityError::Unreachable {
            target,
            lowest: ElectricCharge::new::<ampere_hour>(lowest),
            highest: ElectricCharge::new::<ampere_hour>(highest),
        });
    }

    let solution = bisection::solve(
        &model,
        &problem,
        [limits.min(), limits.max()],
        &config.bisection(),
        |event: &bisection::Event<'_, _, _>| {
            // A rejected design sits past the feasible loadings.
            if event.result().is_err() {
                return Some(bisection::Action::assume_positive());
            }
            None
        },
    )?;

    if solution.status != bisection::Status::Converged {
        return Err(TargetCapacityError::MaxIters {
            residual: ElectricCharge::new::<ampere_hour>(solution.residual),
            iters: solution.iters,
        });
    }

    let design = solution.snapshot.output;
    Ok(CapacityMatch {
        mass_loading: design.positive().mass_loading,
        design,
    })
}
