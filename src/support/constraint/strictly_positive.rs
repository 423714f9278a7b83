use std::cmp::Ordering;

use num_traits::Zero;

use super::{Constrained, Constraint, ConstraintError};

/// Marker type enforcing that a value is strictly positive (greater than zero).
///
/// Cell dimensions, sheet counts, mass loadings and coating thicknesses all
/// carry this invariant: a zero would collapse the geometry and divide by zero
/// further down the derived-field graph.
///
/// # Examples
///
/// ```
/// use twine_cell_design::support::constraint::StrictlyPositive;
///
/// assert_eq!(StrictlyPositive::new(70.0).unwrap().into_inner(), 70.0);
/// assert!(StrictlyPositive::new(0_u32).is_err());
/// assert!(StrictlyPositive::new(f64::NAN).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct StrictlyPositive;

impl StrictlyPositive {
    /// Constructs a [`Constrained<T, StrictlyPositive>`] if the value is strictly positive.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is zero, negative, or not a number (`NaN`).
    pub fn new<T: PartialOrd + Zero>(
        value: T,
    ) -> Result<Constrained<T, StrictlyPositive>, ConstraintError> {
        Constrained::<T, StrictlyPositive>::new(value)
    }
}

impl<T: PartialOrd + Zero> Constraint<T> for StrictlyPositive {
    fn check(value: &T) -> Result<(), ConstraintError> {
        match value.partial_cmp(&T::zero()) {
            Some(Ordering::Greater) => Ok(()),
            Some(Ordering::Equal) => Err(ConstraintError::Zero),
            Some(Ordering::Less) => Err(ConstraintError::Negative),
            None => Err(ConstraintError::NotANumber),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use uom::si::{f64::Length, length::millimeter};

    #[test]
    fn sheet_counts() {
        assert_eq!(StrictlyPositive::new(1_u32).unwrap().into_inner(), 1);
        assert_eq!(StrictlyPositive::new(0_u32), Err(ConstraintError::Zero));
    }

    #[test]
    fn dimensions() {
        assert!(StrictlyPositive::new(0.15).is_ok());
        assert_eq!(StrictlyPositive::new(-21.0), Err(ConstraintError::Negative));
        assert_eq!(
            StrictlyPositive::new(f64::NAN),
            Err(ConstraintError::NotANumber)
        );

        let height = Length::new::<millimeter>(70.0);
        assert!(StrictlyPositive::new(height).is_ok());
        assert!(StrictlyPositive::new(Length::new::<millimeter>(0.0)).is_err());
    }
}
