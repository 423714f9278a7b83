use serde::Deserialize;

/// Settings for the design pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DesignConfig {
    /// Whether coating thicknesses are moved into the density band before
    /// the cross-field checks run.
    pub optimize_coating_thickness: bool,

    /// Lowest coating density, as a fraction of the formulation density.
    pub min_coating_density_ratio: f64,

    /// Highest coating density, as a fraction of the formulation density.
    pub max_coating_density_ratio: f64,

    /// Relative distance kept from a band edge when moving a thickness.
    pub band_edge_inset: f64,
}

impl Default for DesignConfig {
    fn default() -> Self {
        Self {
            optimize_coating_thickness: true,
            min_coating_density_ratio: 0.63,
            max_coating_density_ratio: 0.85,
            band_edge_inset: 0.005,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config: DesignConfig =
            serde_json::from_str(r#"{"optimize_coating_thickness": false}"#).unwrap();
        assert!(!config.optimize_coating_thickness);
        assert_eq!(config.max_coating_density_ratio, 0.85);
    }
}
