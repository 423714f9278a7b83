//! Units and rounding used by the cell design models.
//!
//! Design parameters travel through the engine as plain `f64` values in the
//! battery-engineering units their aliases name (mm, µm, mg/cm², g/cm³,
//! A·h), because every derived value is rounded to three decimals in those
//! units. This module provides the two bridges around that choice:
//!
//! - [`Rounding`] reproduces the three-decimal rounding applied to every
//!   derived field.
//! - [`ArealMassDensity`] and [`coating_thickness`] express coating
//!   arithmetic with [`uom`] quantities so mass loadings, densities and
//!   thicknesses cannot be mixed up.
//!
//! ```
//! use twine_cell_design::support::units::Rounding;
//!
//! assert_eq!(94.86832980505137_f64.round3(), 94.868);
//! assert_eq!(0.15427_f64.round_to(2), 0.15);
//! ```

mod quantities;
mod rounding;

pub use quantities::{ArealMassDensity, areal_mass_density, coating_thickness};
pub use rounding::Rounding;
