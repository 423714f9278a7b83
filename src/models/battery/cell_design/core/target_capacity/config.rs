use twine_solvers::equation::bisection;
use uom::si::{electric_charge::ampere_hour, f64::ElectricCharge};

/// Solver configuration for matching a target capacity.
#[derive(Debug, Clone, Copy)]
pub struct TargetCapacityConfig {
    /// Maximum iteration count for the bisection solve.
    pub max_iters: usize,

    /// Absolute tolerance on the positive mass loading, in mg/cm².
    pub mass_loading_tol: f64,

    /// Absolute tolerance for the capacity residual (achieved - target).
    pub capacity_tol: ElectricCharge,
}

impl Default for TargetCapacityConfig {
    fn default() -> Self {
        Self {
            max_iters: 100,
            mass_loading_tol: 1e-9,
            capacity_tol: ElectricCharge::new::<ampere_hour>(1e-9),
        }
    }
}

impl TargetCapacityConfig {
    /// Converts this configuration into a bisection solver configuration.
    pub(super) fn bisection(&self) -> bisection::Config {
        bisection::Config {
            max_iters: self.max_iters,
            x_abs_tol: self.mass_loading_tol,
            x_rel_tol: 0.0,
            residual_tol: self.capacity_tol.get::<ampere_hour>(),
        }
    }
}
