//! Problem formulation for capacity matching.

use std::convert::Infallible;

use twine_core::{EquationProblem, Model};
use uom::si::{electric_charge::ampere_hour, f64::ElectricCharge};

use crate::models::battery::cell_design::core::{CellDesign, DesignConfig, DesignError};

/// Model adapter exposing the positive mass loading as the only input.
///
/// Each call refines a copy of the base design, so the coating thickness
/// follows the mass loading through the optimizer.
pub(super) struct CapacityModel<'a> {
    base: &'a CellDesign,
    config: &'a DesignConfig,
}

impl<'a> CapacityModel<'a> {
    pub(super) fn new(base: &'a CellDesign, config: &'a DesignConfig) -> Self {
        Self { base, config }
    }
}

impl Model for CapacityModel<'_> {
    /// Positive mass loading in mg/cm².
    type Input = f64;
    type Output = CellDesign;
    type Error = DesignError;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        self.base
            .with_positive_mass_loading(*input)
            .refined(self.config)
    }
}

/// Residual is `achieved - target` capacity in A·h.
pub(super) struct CapacityProblem {
    target: ElectricCharge,
}

impl CapacityProblem {
    pub(super) fn new(target: ElectricCharge) -> Self {
        Self { target }
    }
}

impl EquationProblem<1> for CapacityProblem {
    type Input = f64;
    type Output = CellDesign;
    type Error = Infallible;

    fn input(&self, x: &[f64; 1]) -> Result<Self::Input, Self::Error> {
        Ok(x[0])
    }

    fn residuals(
        &self,
        _input: &Self::Input,
        output: &Self::Output,
    ) -> Result<[f64; 1], Self::Error> {
        Ok([output.nominal_capacity() - self.target.get::<ampere_hour>()])
    }
}
