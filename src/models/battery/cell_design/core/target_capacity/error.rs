use thiserror::Error;
use twine_solvers::equation::bisection;
use uom::si::f64::ElectricCharge;

use crate::models::battery::cell_design::core::DesignError;

/// Errors that can occur while matching a target capacity.
#[derive(Debug, Error)]
pub enum TargetCapacityError {
    /// The design could not be refined at some mass loading.
    #[error("design rejected while matching capacity")]
    Design(#[from] DesignError),

    /// The target is outside the capacities the mass loading limits allow.
    #[error("target capacity {target:?} is outside {lowest:?}..={highest:?}")]
    Unreachable {
        target: ElectricCharge,
        lowest: ElectricCharge,
        highest: ElectricCharge,
    },

    /// The bisection solver encountered an error.
    #[error("bisection solver error")]
    Bisection(#[from] bisection::Error),

    /// The solver reached the iteration limit without converging.
    #[error("solver hit iteration limit: residual={residual:?}")]
    MaxIters {
        /// Smallest capacity residual reached.
        residual: ElectricCharge,

        iters: usize,
    },
}
