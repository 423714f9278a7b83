use uom::{
    si::{
        ISQ, Quantity, SI,
        area::square_centimeter,
        f64::{Area, Length, Mass, MassDensity},
        length::micrometer,
        mass::milligram,
        mass_density::gram_per_cubic_centimeter,
    },
    typenum::{N2, P1, Z0},
};

/// Areal mass density, kg/m² in SI.
///
/// Electrode mass loadings are quoted in mg/cm²; use [`areal_mass_density`]
/// to build one from that unit.
pub type ArealMassDensity = Quantity<ISQ<N2, P1, Z0, Z0, Z0, Z0, Z0>, SI<f64>, f64>;

/// Converts a mass loading in mg/cm² into an [`ArealMassDensity`].
#[must_use]
pub fn areal_mass_density(mg_per_cm2: f64) -> ArealMassDensity {
    Mass::new::<milligram>(mg_per_cm2) / Area::new::<square_centimeter>(1.0)
}

/// Coating thickness, in µm, that packs a mass loading (mg/cm²) at a given
/// coating density (g/cm³).
#[must_use]
pub fn coating_thickness(mass_loading: f64, coating_density: f64) -> f64 {
    let loading = areal_mass_density(mass_loading);
    let density = MassDensity::new::<gram_per_cubic_centimeter>(coating_density);
    let thickness: Length = loading / density;
    thickness.get::<micrometer>()
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn mass_loading_conversion() {
        // 10 mg/cm² is 0.1 kg/m².
        let loading = areal_mass_density(10.0);
        assert_relative_eq!(loading.value, 0.1, epsilon = 1e-15);
    }

    #[test]
    fn thickness_from_loading_and_density() {
        // 15 mg/cm² at 3 g/cm³ is a 50 µm coating.
        assert_relative_eq!(coating_thickness(15.0, 3.0), 50.0, epsilon = 1e-9);
    }
}
