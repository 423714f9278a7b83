use std::fmt;

use thiserror::Error;

/// A named closed interval `[min, max]` that a design parameter must fall in.
///
/// The name and unit are carried along so a violation can be reported in
/// terms a user recognizes, e.g. `Mass loading is 30 but must be between 15
/// and 25 mg.cm-2`. An unbounded upper end is written as `f64::INFINITY`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DesignRange {
    name: &'static str,
    min: f64,
    max: f64,
    unit: &'static str,
}

impl DesignRange {
    /// Creates a unitless range.
    #[must_use]
    pub const fn new(name: &'static str, min: f64, max: f64) -> Self {
        Self {
            name,
            min,
            max,
            unit: "",
        }
    }

    /// Attaches a unit label used in violation messages.
    #[must_use]
    pub const fn with_unit(self, unit: &'static str) -> Self {
        Self { unit, ..self }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn min(&self) -> f64 {
        self.min
    }

    #[must_use]
    pub fn max(&self) -> f64 {
        self.max
    }

    #[must_use]
    pub fn unit(&self) -> &'static str {
        self.unit
    }

    /// Midpoint of the range, infinite when the range is unbounded.
    #[must_use]
    pub fn mean(&self) -> f64 {
        0.5 * (self.min + self.max)
    }

    /// Returns `true` if `min ≤ value ≤ max`. `NaN` is never contained.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }

    /// Returns the value unchanged if it lies in the range.
    ///
    /// # Errors
    ///
    /// Returns a [`RangeViolation`] describing the value and the bounds.
    pub fn check(&self, value: f64) -> Result<f64, RangeViolation> {
        if self.contains(value) {
            Ok(value)
        } else {
            Err(RangeViolation {
                range: *self,
                value,
            })
        }
    }
}

impl fmt::Display for DesignRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = if self.unit.is_empty() {
            String::new()
        } else {
            format!(" {}", self.unit)
        };
        if self.max.is_infinite() {
            write!(f, "at least {}{unit}", self.min)
        } else {
            write!(f, "between {} and {}{unit}", self.min, self.max)
        }
    }
}

/// A value that fell outside its [`DesignRange`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("{} is {value} but must be {range}", .range.name)]
pub struct RangeViolation {
    pub range: DesignRange,
    pub value: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_bounds() {
        let packing = DesignRange::new("Cell volume packing ratio", 0.75, 0.99);
        assert!(packing.contains(0.75));
        assert!(packing.contains(0.99));
        assert!(!packing.contains(0.995));
        assert!(!packing.contains(f64::NAN));
        assert_eq!(packing.check(0.9), Ok(0.9));
    }

    #[test]
    fn violation_message_names_the_bounds() {
        let loading = DesignRange::new("Mass loading", 15.0, 25.0).with_unit("mg.cm-2");
        let err = loading.check(30.0).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Mass loading is 30 but must be between 15 and 25 mg.cm-2"
        );
    }

    #[test]
    fn unbounded_above() {
        let foil = DesignRange::new("Foil thickness", 5.0, f64::INFINITY).with_unit("um");
        assert!(foil.contains(1e6));
        assert_eq!(
            foil.check(4.0).unwrap_err().to_string(),
            "Foil thickness is 4 but must be at least 5 um"
        );
    }
}
