/// Extension trait for decimal rounding of design values.
pub trait Rounding {
    /// Rounds half away from zero to `digits` decimal places.
    #[must_use]
    fn round_to(self, digits: i32) -> Self;

    /// Rounds to three decimal places, the precision of every derived field.
    #[must_use]
    fn round3(self) -> Self;
}

impl Rounding for f64 {
    fn round_to(self, digits: i32) -> Self {
        if !self.is_finite() {
            return self;
        }
        let scale = 10_f64.powi(digits);
        (self * scale).round() / scale
    }

    fn round3(self) -> Self {
        self.round_to(3)
    }
}
